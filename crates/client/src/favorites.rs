//! Favorites client: a local mirror of the user's bookmarked listings.
//!
//! The in-memory set is rebuilt wholesale on fetch and mutated only after
//! the server confirms an add or remove. Membership checks are O(1) and
//! stale until the next fetch.

use std::sync::{Arc, PoisonError};

use tracing::{debug, instrument};

use hopeflow_core::ListingId;

use crate::client::ClientInner;
use crate::error::ApiError;
use crate::types::{Favorite, NewFavorite};

/// Favorites collection endpoint.
const FAVORITES_PATH: &str = "/api/v1/user-favorite/";

/// Client for favorite operations.
pub struct FavoritesClient {
    inner: Arc<ClientInner>,
}

impl FavoritesClient {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// O(1) membership check against the local set.
    ///
    /// Stale until the next [`fetch`](Self::fetch).
    #[must_use]
    pub fn is_favorite(&self, listing_id: ListingId) -> bool {
        self.inner
            .favorites
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&listing_id)
    }

    /// Sorted snapshot of the local set.
    #[must_use]
    pub fn ids(&self) -> Vec<ListingId> {
        let mut ids: Vec<ListingId> = self
            .inner
            .favorites
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Replace the entire local set with the server's view.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotLoggedIn` or any transport/server error; on
    /// error the local set is left untouched.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<Vec<ListingId>, ApiError> {
        let user = self.inner.require_user()?;
        let token = self.inner.bearer()?;

        let favorites: Vec<Favorite> = self
            .inner
            .transport
            .get(
                FAVORITES_PATH,
                &[("userId", user.id.to_string())],
                Some(&token),
            )
            .await?;

        let ids: Vec<ListingId> = favorites.iter().map(|f| f.listing_id).collect();

        let mut set = self
            .inner
            .favorites
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        set.clear();
        set.extend(ids.iter().copied());
        drop(set);

        debug!(count = ids.len(), "favorites replaced from server");
        Ok(ids)
    }

    /// Bookmark a listing. The local set is updated only after the server
    /// confirms.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotLoggedIn` or any transport/server error.
    #[instrument(skip(self))]
    pub async fn add(&self, listing_id: ListingId) -> Result<(), ApiError> {
        let user = self.inner.require_user()?;
        let token = self.inner.bearer()?;

        let _favorite: Favorite = self
            .inner
            .transport
            .post(
                FAVORITES_PATH,
                &NewFavorite {
                    user_id: user.id,
                    listing_id,
                },
                Some(&token),
            )
            .await?;

        self.inner
            .favorites
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(listing_id);

        Ok(())
    }

    /// Remove a bookmark. The local set is updated only after the server
    /// confirms.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotLoggedIn` or any transport/server error.
    #[instrument(skip(self))]
    pub async fn remove(&self, listing_id: ListingId) -> Result<(), ApiError> {
        let user = self.inner.require_user()?;
        let token = self.inner.bearer()?;

        self.inner
            .transport
            .delete(
                FAVORITES_PATH,
                &[
                    ("userId", user.id.to_string()),
                    ("listingId", listing_id.to_string()),
                ],
                Some(&token),
            )
            .await?;

        self.inner
            .favorites
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&listing_id);

        Ok(())
    }
}
