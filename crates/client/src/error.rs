//! Error type for HopeFlow API operations.

use hopeflow_core::ListingId;
use thiserror::Error;

/// Errors that can occur when talking to the HopeFlow API.
///
/// Errors are never retried by the client; callers decide what to surface.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL or a derived request URL is invalid.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP transport failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("server error {status}: {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// An authenticated operation was attempted without a session.
    #[error("not logged in")]
    NotLoggedIn,

    /// The listing is already in the basket (client-side pre-check).
    #[error("listing {0} is already in the basket")]
    DuplicateItem(ListingId),

    /// Reading or writing the persisted token failed.
    #[error("token store error: {0}")]
    TokenStore(#[from] std::io::Error),
}

impl ApiError {
    /// Whether this error is the server rejecting the bearer token.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Server { status: 401, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::Server {
            status: 404,
            message: "listing not found".to_string(),
        };
        assert_eq!(err.to_string(), "server error 404: listing not found");

        let err = ApiError::DuplicateItem(ListingId::new(7));
        assert_eq!(err.to_string(), "listing 7 is already in the basket");

        assert_eq!(ApiError::NotLoggedIn.to_string(), "not logged in");
    }

    #[test]
    fn test_is_unauthorized() {
        let err = ApiError::Server {
            status: 401,
            message: "invalid token".to_string(),
        };
        assert!(err.is_unauthorized());

        let err = ApiError::Server {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(!err.is_unauthorized());
        assert!(!ApiError::NotLoggedIn.is_unauthorized());
    }
}
