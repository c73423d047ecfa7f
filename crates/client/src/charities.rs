//! Charity client.

use std::sync::Arc;

use tracing::instrument;

use crate::client::ClientInner;
use crate::error::ApiError;
use crate::types::Charity;

/// Charities collection endpoint.
const CHARITIES_PATH: &str = "/api/v1/charities/";

/// Client for charity operations.
pub struct CharityClient {
    inner: Arc<ClientInner>,
}

impl CharityClient {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Fetch all charities.
    ///
    /// # Errors
    ///
    /// Returns any transport/server error.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Charity>, ApiError> {
        let token = self.inner.bearer_opt();
        self.inner
            .transport
            .get(CHARITIES_PATH, &[], token.as_ref())
            .await
    }
}
