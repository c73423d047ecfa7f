//! Listing client: browse, create, update, and photo upload.
//!
//! Single-listing reads go through an in-memory cache (5-minute TTL);
//! mutations invalidate the cached entry. List views always hit the server.

use std::sync::Arc;

use tracing::{debug, instrument};

use hopeflow_core::{ListingId, UserId};

use crate::client::ClientInner;
use crate::error::ApiError;
use crate::types::{Listing, ListingDraft, ListingPhoto};

/// Listings collection endpoint.
const LISTINGS_PATH: &str = "/api/v1/listings/";
/// Listing photos collection endpoint.
const PHOTOS_PATH: &str = "/api/v1/listing-photos";

/// Filter for listing list views.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingFilter {
    /// Only listings posted by this seller.
    pub user_id: Option<UserId>,
    /// Only listings purchased by this user.
    pub purchased_by: Option<UserId>,
}

impl ListingFilter {
    /// All listings.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            user_id: None,
            purchased_by: None,
        }
    }

    /// Listings posted by a seller.
    #[must_use]
    pub const fn by_seller(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            purchased_by: None,
        }
    }

    /// Listings purchased by a user.
    #[must_use]
    pub const fn by_purchaser(user_id: UserId) -> Self {
        Self {
            user_id: None,
            purchased_by: Some(user_id),
        }
    }

    fn to_query(self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(user_id) = self.user_id {
            query.push(("userId", user_id.to_string()));
        }
        if let Some(purchased_by) = self.purchased_by {
            query.push(("purchasedBy", purchased_by.to_string()));
        }
        query
    }
}

/// Client for listing operations.
pub struct ListingClient {
    inner: Arc<ClientInner>,
}

impl ListingClient {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Fetch listings matching the filter. Always hits the server.
    ///
    /// # Errors
    ///
    /// Returns any transport/server error.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: ListingFilter) -> Result<Vec<Listing>, ApiError> {
        let token = self.inner.bearer_opt();
        self.inner
            .transport
            .get(LISTINGS_PATH, &filter.to_query(), token.as_ref())
            .await
    }

    /// Fetch a single listing, served through the cache when warm.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Server` with status 404 for an unknown listing, or
    /// any transport/server error.
    #[instrument(skip(self))]
    pub async fn get(&self, listing_id: ListingId) -> Result<Listing, ApiError> {
        if let Some(listing) = self.inner.listing_cache.get(&listing_id).await {
            debug!("cache hit for listing");
            return Ok(listing);
        }

        let token = self.inner.bearer_opt();
        let listing: Listing = self
            .inner
            .transport
            .get(
                &format!("/api/v1/listings/{listing_id}"),
                &[],
                token.as_ref(),
            )
            .await?;

        self.inner
            .listing_cache
            .insert(listing_id, listing.clone())
            .await;

        Ok(listing)
    }

    /// Create a listing.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotLoggedIn` or any transport/server error.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create(&self, draft: &ListingDraft) -> Result<Listing, ApiError> {
        let token = self.inner.bearer()?;
        self.inner
            .transport
            .post("/api/v1/listings", draft, Some(&token))
            .await
    }

    /// Update a listing and invalidate its cached entry.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotLoggedIn` or any transport/server error.
    #[instrument(skip(self, draft))]
    pub async fn update(
        &self,
        listing_id: ListingId,
        draft: &ListingDraft,
    ) -> Result<Listing, ApiError> {
        let token = self.inner.bearer()?;
        let listing: Listing = self
            .inner
            .transport
            .put(
                &format!("/api/v1/listings/{listing_id}"),
                draft,
                Some(&token),
            )
            .await?;

        self.inner.listing_cache.invalidate(&listing_id).await;
        Ok(listing)
    }

    /// Delete a listing and invalidate its cached entry.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotLoggedIn` or any transport/server error.
    #[instrument(skip(self))]
    pub async fn delete(&self, listing_id: ListingId) -> Result<(), ApiError> {
        let token = self.inner.bearer()?;
        self.inner
            .transport
            .delete(&format!("/api/v1/listings/{listing_id}"), &[], Some(&token))
            .await?;

        self.inner.listing_cache.invalidate(&listing_id).await;
        Ok(())
    }

    /// Fetch the photos attached to a listing.
    ///
    /// # Errors
    ///
    /// Returns any transport/server error.
    #[instrument(skip(self))]
    pub async fn photos(&self, listing_id: ListingId) -> Result<Vec<ListingPhoto>, ApiError> {
        let token = self.inner.bearer_opt();
        self.inner
            .transport
            .get(
                PHOTOS_PATH,
                &[("listingId", listing_id.to_string())],
                token.as_ref(),
            )
            .await
    }

    /// Upload a photo for a listing (multipart).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotLoggedIn` or any transport/server error.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_photo(
        &self,
        listing_id: ListingId,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ListingPhoto, ApiError> {
        let token = self.inner.bearer()?;

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .text("listingId", listing_id.to_string())
            .part("file", part);

        self.inner
            .transport
            .post_multipart(&format!("{PHOTOS_PATH}/upload"), form, Some(&token))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_all_is_empty_query() {
        assert!(ListingFilter::all().to_query().is_empty());
    }

    #[test]
    fn test_filter_by_seller() {
        let query = ListingFilter::by_seller(UserId::new(3)).to_query();
        assert_eq!(query, vec![("userId", "3".to_string())]);
    }

    #[test]
    fn test_filter_by_purchaser() {
        let query = ListingFilter::by_purchaser(UserId::new(4)).to_query();
        assert_eq!(query, vec![("purchasedBy", "4".to_string())]);
    }
}
