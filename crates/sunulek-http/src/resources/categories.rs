use sunulek_core::Result;
use sunulek_core::models::{Category, Page};

use crate::client::ApiClient;
use crate::endpoints;

/// Category endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Categories<'a> {
    client: &'a ApiClient,
}

impl<'a> Categories<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        let page: Page<Category> = self.client.get_json(endpoints::CATEGORIES).await?;
        Ok(page.results)
    }

    pub async fn get(&self, slug: &str) -> Result<Category> {
        self.client.get_json(&endpoints::category(slug)).await
    }
}
