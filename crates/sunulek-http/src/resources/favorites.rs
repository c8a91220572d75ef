use serde::Serialize;
use tracing::instrument;

use sunulek_core::models::{Count, Favorite, FavoriteToggle, Page};
use sunulek_core::{OutboundRequest, Result};

use crate::client::ApiClient;
use crate::endpoints;

#[derive(Debug, Serialize)]
struct ToggleRequest {
    ad_id: u64,
}

/// Favorite endpoints. All require a session.
#[derive(Debug, Clone, Copy)]
pub struct Favorites<'a> {
    client: &'a ApiClient,
}

impl<'a> Favorites<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Page<Favorite>> {
        self.client.get_json(endpoints::FAVORITES).await
    }

    /// Add the listing to favorites, or remove it if already there.
    #[instrument(skip(self))]
    pub async fn toggle(&self, ad_id: u64) -> Result<FavoriteToggle> {
        let request =
            OutboundRequest::post(endpoints::FAVORITES_TOGGLE).json(&ToggleRequest { ad_id })?;
        self.client.send_json(request).await
    }

    pub async fn count(&self) -> Result<u64> {
        let count: Count = self.client.get_json(endpoints::FAVORITES_COUNT).await?;
        Ok(count.count)
    }
}
