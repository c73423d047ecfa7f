//! Session and authentication client.
//!
//! Holds the process-wide session (current user + bearer token) and mirrors
//! the token to disk so a restart can resume without re-entering credentials.
//! There is no token refresh flow; a stale token is simply discarded on the
//! next restore.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use crate::client::ClientInner;
use crate::error::ApiError;
use crate::types::{NewUser, Session, TokenResponse, User};

/// Endpoint for credential exchange.
const LOGIN_PATH: &str = "/auth/login";
/// Endpoint returning the user behind a token.
const ME_PATH: &str = "/api/v1/users/me";
/// Endpoint for account creation.
const USERS_PATH: &str = "/api/v1/users/";

/// Client for session and authentication operations.
pub struct SessionClient {
    inner: Arc<ClientInner>,
}

impl SessionClient {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Exchange credentials for a bearer token and install a session.
    ///
    /// The login endpoint speaks OAuth2-password-grant form fields; the user
    /// object is resolved with a follow-up `/users/me` call. Any mid-flow
    /// failure clears partial session state before surfacing the error.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Server` with status 401 for bad credentials, or any
    /// transport/decode error. A token-persistence failure also fails the
    /// login (and leaves no session installed).
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let form = [("username", email), ("password", password)];
        let token_response: TokenResponse = match self
            .inner
            .transport
            .post_form(LOGIN_PATH, &form)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                self.inner.set_session(None);
                return Err(e);
            }
        };

        let token = SecretString::from(token_response.access_token);

        let user: User = match self.inner.transport.get(ME_PATH, &[], Some(&token)).await {
            Ok(user) => user,
            Err(e) => {
                self.inner.set_session(None);
                return Err(e);
            }
        };

        if let Err(e) = self.inner.token_store.save(&token) {
            self.inner.set_session(None);
            return Err(e.into());
        }

        self.inner.set_session(Some(Session {
            user: user.clone(),
            token,
        }));

        debug!(user = %user.id, "logged in");
        Ok(user)
    }

    /// Create a new account.
    ///
    /// Does not log the new user in; call [`login`](Self::login) afterwards.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Server` if the email is already registered, or any
    /// transport/decode error.
    pub async fn register(&self, new_user: &NewUser) -> Result<User, ApiError> {
        self.inner.transport.post(USERS_PATH, new_user, None).await
    }

    /// Clear the session, the persisted token, and all per-user caches.
    ///
    /// Local-only: no server call is made, so logout succeeds regardless of
    /// network state. The token remains valid server-side until it expires
    /// or is revoked there.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::TokenStore` if the persisted token file exists but
    /// cannot be removed; the in-memory session is cleared regardless.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), ApiError> {
        self.inner.set_session(None);
        self.inner.clear_user_state();
        self.inner.token_store.clear()?;
        debug!("logged out");
        Ok(())
    }

    /// Resume a session from the persisted token, if any.
    ///
    /// Validates the token by fetching the current user. A token the server
    /// no longer accepts is silently discarded (the file is cleared) and
    /// `Ok(None)` is returned; only token-store I/O failures are errors.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> Result<Option<User>, ApiError> {
        let Some(token) = self.inner.token_store.load()? else {
            return Ok(None);
        };

        match self
            .inner
            .transport
            .get::<User>(ME_PATH, &[], Some(&token))
            .await
        {
            Ok(user) => {
                self.inner.set_session(Some(Session {
                    user: user.clone(),
                    token,
                }));
                debug!(user = %user.id, "session restored");
                Ok(Some(user))
            }
            Err(e) => {
                debug!(error = %e, "persisted token rejected, clearing");
                self.inner.token_store.clear()?;
                self.inner.set_session(None);
                Ok(None)
            }
        }
    }

    /// The currently logged-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.inner.require_user().ok()
    }

    /// Whether a session is installed.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.current_user().is_some()
    }
}

/// File-backed persistence for the bearer token.
///
/// Missing file on load is `None`, not an error. Parent directories are
/// created on save; on Unix the file is chmod'd to 0600.
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Create a store backed by the given path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the persisted token.
    ///
    /// # Errors
    ///
    /// Returns any I/O error other than the file not existing.
    pub fn load(&self) -> io::Result<Option<SecretString>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let trimmed = contents.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(SecretString::from(trimmed.to_string())))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Persist the token, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from directory creation or the write.
    pub fn save(&self, token: &SecretString) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token.expose_secret())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Remove the persisted token. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns any I/O error other than the file not existing.
    pub fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> TokenStore {
        let path = std::env::temp_dir()
            .join(format!("hopeflow-test-{}-{name}", std::process::id()))
            .join("token");
        TokenStore::new(path)
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let store = temp_store("missing");
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_load_clear_roundtrip() {
        let store = temp_store("roundtrip");
        store.save(&SecretString::from("tok-123")).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.expose_secret(), "tok-123");

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());

        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_load_empty_file_is_none() {
        let store = temp_store("empty");
        store.save(&SecretString::from("  \n")).unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_save_sets_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let store = temp_store("perms");
        store.save(&SecretString::from("tok")).unwrap();

        let mode = std::fs::metadata(&store.path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        store.clear().unwrap();
    }
}
