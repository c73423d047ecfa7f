//! Basket client: get-or-create, line mutations, and reconciliation.
//!
//! The server owns the basket; the client caches the active basket and its
//! denormalized lines until explicitly cleared. Refresh resolves each line
//! item's listing with an individual request (O(n), no batching) and drops
//! lines whose listing cannot be fetched rather than failing the refresh.

use std::sync::{Arc, PoisonError};

use tracing::{debug, instrument, warn};

use hopeflow_core::{BasketItemId, ListingId};

use crate::client::ClientInner;
use crate::error::ApiError;
use crate::types::{Basket, BasketDetail, BasketItem, BasketLine, Listing, NewBasketItem};

/// Cached basket state shared by all `BasketClient` handles.
#[derive(Default)]
pub(crate) struct BasketState {
    basket: Option<Basket>,
    lines: Vec<BasketLine>,
}

impl BasketState {
    pub(crate) fn clear(&mut self) {
        self.basket = None;
        self.lines.clear();
    }
}

/// Client for basket operations.
pub struct BasketClient {
    inner: Arc<ClientInner>,
}

impl BasketClient {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Fetch the user's active basket, creating one server-side if absent.
    ///
    /// The result is cached; a second call without an intervening
    /// [`clear`](Self::clear) returns the cached basket with no network
    /// round trip.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotLoggedIn` without a session, or any
    /// transport/server error.
    #[instrument(skip(self))]
    pub async fn get_or_create(&self) -> Result<Basket, ApiError> {
        let user = self.inner.require_user()?;

        if let Some(basket) = self.cached_basket() {
            debug!(basket = %basket.id, "using cached basket");
            return Ok(basket);
        }

        let token = self.inner.bearer()?;
        let basket: Basket = self
            .inner
            .transport
            .get(
                &format!("/api/v1/baskets/user/{}/get-or-create", user.id),
                &[],
                Some(&token),
            )
            .await?;

        self.inner
            .basket
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .basket = Some(basket.clone());

        Ok(basket)
    }

    /// Add a listing to the basket, then re-fetch the full line list.
    ///
    /// A listing already present in the cached lines is rejected locally
    /// with `ApiError::DuplicateItem`. The check is not atomic: two adds for
    /// the same listing in flight at once can both pass it, and the server
    /// does not guarantee uniqueness either. The post-add refresh is the
    /// reconciliation point.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotLoggedIn`, `ApiError::DuplicateItem`, or any
    /// transport/server error.
    #[instrument(skip(self))]
    pub async fn add_item(&self, listing_id: ListingId) -> Result<Vec<BasketLine>, ApiError> {
        let basket = self.get_or_create().await?;

        if self.contains(listing_id) {
            return Err(ApiError::DuplicateItem(listing_id));
        }

        let token = self.inner.bearer()?;
        let item: BasketItem = self
            .inner
            .transport
            .post(
                &format!("/api/v1/baskets/{}/items", basket.id),
                &NewBasketItem { listing_id },
                Some(&token),
            )
            .await?;
        debug!(item = %item.id, listing = %listing_id, "added basket item");

        // Full re-fetch rather than an incremental update
        self.refresh().await
    }

    /// Remove a line item server-side, then drop it from the local cache
    /// optimistically without a re-fetch.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotLoggedIn` or any transport/server error; on
    /// error the local cache is left untouched.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, item_id: BasketItemId) -> Result<(), ApiError> {
        let basket = self.get_or_create().await?;
        let token = self.inner.bearer()?;

        self.inner
            .transport
            .delete(
                &format!("/api/v1/baskets/{}/items/{item_id}", basket.id),
                &[],
                Some(&token),
            )
            .await?;

        self.inner
            .basket
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .lines
            .retain(|line| line.item.id != item_id);

        Ok(())
    }

    /// Re-fetch the basket detail and resolve each line's listing.
    ///
    /// Listings are resolved one request per item, sequentially. A failed
    /// listing fetch drops that line from the result (logged at warn level);
    /// the refresh itself still succeeds, so the view can be missing items
    /// the server still holds.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotLoggedIn` or an error from the basket-detail
    /// fetch itself. Per-listing failures are absorbed.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Vec<BasketLine>, ApiError> {
        let basket = self.get_or_create().await?;
        let token = self.inner.bearer()?;

        let detail: BasketDetail = self
            .inner
            .transport
            .get(&format!("/api/v1/baskets/{}", basket.id), &[], Some(&token))
            .await?;

        let mut lines = Vec::with_capacity(detail.items.len());
        for item in detail.items {
            let listing: Result<Listing, ApiError> = self
                .inner
                .transport
                .get(
                    &format!("/api/v1/listings/{}", item.listing_id),
                    &[],
                    Some(&token),
                )
                .await;

            match listing {
                Ok(listing) => lines.push(BasketLine { item, listing }),
                Err(e) => {
                    warn!(
                        item = %item.id,
                        listing = %item.listing_id,
                        error = %e,
                        "dropping basket line, listing fetch failed"
                    );
                }
            }
        }

        let mut state = self
            .inner
            .basket
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        state.basket = Some(detail.basket);
        state.lines = lines.clone();
        drop(state);

        Ok(lines)
    }

    /// Snapshot of the cached lines (stale until the next refresh).
    #[must_use]
    pub fn items(&self) -> Vec<BasketLine> {
        self.inner
            .basket
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .lines
            .clone()
    }

    /// Whether the cached lines contain the listing.
    #[must_use]
    pub fn contains(&self, listing_id: ListingId) -> bool {
        self.inner
            .basket
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .lines
            .iter()
            .any(|line| line.item.listing_id == listing_id)
    }

    /// Drop the cached basket and lines; the next access re-fetches.
    pub fn clear(&self) {
        self.inner
            .basket
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn cached_basket(&self) -> Option<Basket> {
        self.inner
            .basket
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .basket
            .clone()
    }
}
