use tracing::{debug, instrument};

use sunulek_core::models::{Listing, ListingFilter, Page};
use sunulek_core::{MultipartForm, OutboundRequest, Result};

use crate::client::ApiClient;
use crate::endpoints;

/// Listing endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Listings<'a> {
    client: &'a ApiClient,
}

impl<'a> Listings<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Search listings. `page` starts at 1.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: &ListingFilter, page: u32) -> Result<Page<Listing>> {
        debug!("Listing annonces");
        let mut request = OutboundRequest::get(endpoints::LISTINGS).query("page", page.to_string());
        for (key, value) in filter.to_query() {
            request = request.query(key, value);
        }
        self.client.send_json(request).await
    }

    /// A single listing by slug.
    pub async fn get(&self, slug: &str) -> Result<Listing> {
        self.client.get_json(&endpoints::listing(slug)).await
    }

    /// The current user's listings, optionally by status
    /// (`active`, `pending`, `deleted`).
    pub async fn mine(&self, status: Option<&str>) -> Result<Vec<Listing>> {
        let mut request = OutboundRequest::get(endpoints::MY_LISTINGS);
        if let Some(status) = status {
            request = request.query("status", status);
        }
        self.client.send_json(request).await
    }

    /// Publish a listing; images go in the form as file parts.
    #[instrument(skip(self, form))]
    pub async fn create(&self, form: MultipartForm) -> Result<Listing> {
        self.client
            .send_json(OutboundRequest::post(endpoints::LISTINGS).multipart(form))
            .await
    }

    #[instrument(skip(self, form))]
    pub async fn update(&self, slug: &str, form: MultipartForm) -> Result<Listing> {
        self.client
            .send_json(OutboundRequest::patch(endpoints::listing(slug)).multipart(form))
            .await
    }

    /// Move a listing to the trash.
    pub async fn soft_delete(&self, slug: &str) -> Result<()> {
        self.client
            .request(OutboundRequest::post(endpoints::listing_action(slug, "soft_delete")))
            .await
            .map(|_| ())
    }

    /// Restore a trashed listing.
    pub async fn restore(&self, slug: &str) -> Result<()> {
        self.client
            .request(OutboundRequest::post(endpoints::listing_action(slug, "restore")))
            .await
            .map(|_| ())
    }

    pub async fn permanent_delete(&self, slug: &str) -> Result<()> {
        self.client
            .request(OutboundRequest::delete(endpoints::listing_action(
                slug,
                "permanent_delete",
            )))
            .await
            .map(|_| ())
    }
}
