//! JSON REST transport over `reqwest`.
//!
//! One verb helper per HTTP method, all funneling through the same response
//! handling: read the body as text first for diagnostics, map any non-2xx
//! status to [`ApiError::Server`] with a message extracted from the body,
//! then decode. No retries, no backoff.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::HopeFlowConfig;
use crate::error::ApiError;

/// Shared HTTP transport for all service clients.
pub(crate) struct Transport {
    http: reqwest::Client,
    base: String,
}

impl Transport {
    /// Build the transport from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying `reqwest` client cannot be built.
    pub fn new(config: &HopeFlowConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base: config.api_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// GET a JSON resource.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        token: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        let request = apply_auth(self.http.get(self.url(path)).query(query), token);
        decode_response(request.send().await?).await
    }

    /// POST a JSON body, expecting a JSON response.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        let request = apply_auth(self.http.post(self.url(path)).json(body), token);
        decode_response(request.send().await?).await
    }

    /// POST a form-encoded body, expecting a JSON response.
    ///
    /// Used by the login endpoint, which speaks OAuth2-password-grant style
    /// form fields rather than JSON.
    pub async fn post_form<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        form: &B,
    ) -> Result<T, ApiError> {
        let request = self.http.post(self.url(path)).form(form);
        decode_response(request.send().await?).await
    }

    /// POST a multipart form, expecting a JSON response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        token: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        let request = apply_auth(self.http.post(self.url(path)).multipart(form), token);
        decode_response(request.send().await?).await
    }

    /// PUT a JSON body, expecting a JSON response.
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        let request = apply_auth(self.http.put(self.url(path)).json(body), token);
        decode_response(request.send().await?).await
    }

    /// DELETE a resource; the response body, if any, is discarded.
    pub async fn delete(
        &self,
        path: &str,
        query: &[(&str, String)],
        token: Option<&SecretString>,
    ) -> Result<(), ApiError> {
        let request = apply_auth(self.http.delete(self.url(path)).query(query), token);
        check_response(request.send().await?).await
    }
}

fn apply_auth(
    request: reqwest::RequestBuilder,
    token: Option<&SecretString>,
) -> reqwest::RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token.expose_secret()),
        None => request,
    }
}

/// Check the status and decode the body as JSON.
async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();

    // Get response body as text first for better error diagnostics
    let text = response.text().await?;

    if !status.is_success() {
        tracing::error!(
            status = %status,
            body = %truncate(&text, 500),
            "HopeFlow API returned non-success status"
        );
        return Err(ApiError::Server {
            status: status.as_u16(),
            message: extract_message(&text),
        });
    }

    serde_json::from_str(&text).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %truncate(&text, 500),
            "Failed to decode HopeFlow API response"
        );
        ApiError::Decode(e)
    })
}

/// Check the status of a response with no interesting body.
async fn check_response(response: reqwest::Response) -> Result<(), ApiError> {
    let status = response.status();

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        tracing::error!(
            status = %status,
            body = %truncate(&text, 500),
            "HopeFlow API returned non-success status"
        );
        return Err(ApiError::Server {
            status: status.as_u16(),
            message: extract_message(&text),
        });
    }

    Ok(())
}

/// Pull a human-readable message out of an error body.
///
/// The API wraps errors as `{"detail": "..."}`; anything else is passed
/// through truncated.
fn extract_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        detail: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map_or_else(|_| truncate(body, 200), |parsed| parsed.detail)
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_detail() {
        assert_eq!(
            extract_message(r#"{"detail": "listing not found"}"#),
            "listing not found"
        );
    }

    #[test]
    fn test_extract_message_raw_body() {
        assert_eq!(extract_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_extract_message_truncates_long_bodies() {
        let body = "x".repeat(400);
        assert_eq!(extract_message(&body).len(), 200);
    }

    #[test]
    fn test_truncate_multibyte() {
        // char-based, so multi-byte input never splits a code point
        assert_eq!(truncate("héllo", 2), "hé");
    }
}
