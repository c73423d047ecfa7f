//! The `HopeFlow` root handle and shared client state.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use moka::future::Cache;
use secrecy::SecretString;

use hopeflow_core::ListingId;

use crate::basket::{BasketClient, BasketState};
use crate::charities::CharityClient;
use crate::config::HopeFlowConfig;
use crate::error::ApiError;
use crate::favorites::FavoritesClient;
use crate::http::Transport;
use crate::listings::ListingClient;
use crate::session::{SessionClient, TokenStore};
use crate::types::{Listing, Session, User};

/// Listing cache capacity.
const LISTING_CACHE_CAPACITY: u64 = 1000;
/// Listing cache TTL (5 minutes).
const LISTING_CACHE_TTL: Duration = Duration::from_secs(300);

/// Root handle for the HopeFlow API.
///
/// Cheaply cloneable via `Arc`; all service clients obtained from the same
/// handle share one HTTP connection pool, one session slot, and one set of
/// caches.
#[derive(Clone)]
pub struct HopeFlow {
    inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) transport: Transport,
    pub(crate) token_store: TokenStore,
    pub(crate) session: RwLock<Option<Session>>,
    pub(crate) basket: RwLock<BasketState>,
    pub(crate) favorites: RwLock<HashSet<ListingId>>,
    pub(crate) listing_cache: Cache<ListingId, Listing>,
}

impl HopeFlow {
    /// Create a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: HopeFlowConfig) -> Result<Self, ApiError> {
        let transport = Transport::new(&config)?;
        let token_store = TokenStore::new(config.token_file.clone());
        let listing_cache = Cache::builder()
            .max_capacity(LISTING_CACHE_CAPACITY)
            .time_to_live(LISTING_CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(ClientInner {
                transport,
                token_store,
                session: RwLock::new(None),
                basket: RwLock::new(BasketState::default()),
                favorites: RwLock::new(HashSet::new()),
                listing_cache,
            }),
        })
    }

    /// Session and authentication operations.
    #[must_use]
    pub fn session(&self) -> SessionClient {
        SessionClient::new(Arc::clone(&self.inner))
    }

    /// Basket operations.
    #[must_use]
    pub fn baskets(&self) -> BasketClient {
        BasketClient::new(Arc::clone(&self.inner))
    }

    /// Favorites operations.
    #[must_use]
    pub fn favorites(&self) -> FavoritesClient {
        FavoritesClient::new(Arc::clone(&self.inner))
    }

    /// Listing operations.
    #[must_use]
    pub fn listings(&self) -> ListingClient {
        ListingClient::new(Arc::clone(&self.inner))
    }

    /// Charity operations.
    #[must_use]
    pub fn charities(&self) -> CharityClient {
        CharityClient::new(Arc::clone(&self.inner))
    }
}

impl ClientInner {
    /// Current bearer token, or `NotLoggedIn`.
    ///
    /// Returns a clone so no guard is held across an await point.
    pub(crate) fn bearer(&self) -> Result<SecretString, ApiError> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|session| session.token.clone())
            .ok_or(ApiError::NotLoggedIn)
    }

    /// Current bearer token if a session exists.
    ///
    /// Public reads (listings, charities) attach the token opportunistically
    /// so the server can personalize responses, but work without one.
    pub(crate) fn bearer_opt(&self) -> Option<SecretString> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|session| session.token.clone())
    }

    /// Current user, or `NotLoggedIn`.
    pub(crate) fn require_user(&self) -> Result<User, ApiError> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|session| session.user.clone())
            .ok_or(ApiError::NotLoggedIn)
    }

    /// Install a session in the shared slot.
    pub(crate) fn set_session(&self, session: Option<Session>) {
        *self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner) = session;
    }

    /// Wipe per-user caches. Called on logout so a subsequent login cannot
    /// observe the previous account's basket or favorites.
    pub(crate) fn clear_user_state(&self) {
        self.basket
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.favorites
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
