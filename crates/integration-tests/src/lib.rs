//! Integration test harness for the HopeFlow client.
//!
//! Spins up an in-process mock of the HopeFlow REST API (axum, ephemeral
//! port) and hands out a [`HopeFlow`] client pointed at it. Tests drive the
//! real client over real HTTP; the mock's state is reachable through
//! [`TestContext::state`] for seeding and fault injection (revoking tokens,
//! removing listings out from under a basket).
//!
//! The mock intentionally does **not** enforce basket-item uniqueness: the
//! real server's behavior there is unknown, and the client's pre-check is
//! what is under test.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Form, Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use hopeflow_client::{
    Basket, BasketItem, Charity, Favorite, HopeFlow, HopeFlowConfig, Listing, ListingPhoto, User,
};
use hopeflow_core::{
    Availability, BasketId, BasketItemId, CategoryId, CharityId, CurrencyCode, Email, FavoriteId,
    ListingId, PhotoId, Price, UserId,
};

static TOKEN_FILE_SEQ: AtomicUsize = AtomicUsize::new(0);

// ============================================================================
// Mock State
// ============================================================================

struct Account {
    user: User,
    password: String,
}

/// Shared state behind the mock API.
pub struct MockState {
    next_id: AtomicI64,
    accounts: Mutex<Vec<Account>>,
    tokens: Mutex<HashMap<String, UserId>>,
    listings: Mutex<HashMap<i64, Listing>>,
    baskets: Mutex<HashMap<i64, Basket>>,
    items: Mutex<Vec<BasketItem>>,
    favorites: Mutex<Vec<Favorite>>,
    photos: Mutex<Vec<ListingPhoto>>,
    charities: Mutex<Vec<Charity>>,
    get_or_create_calls: AtomicUsize,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            accounts: Mutex::new(Vec::new()),
            tokens: Mutex::new(HashMap::new()),
            listings: Mutex::new(HashMap::new()),
            baskets: Mutex::new(HashMap::new()),
            items: Mutex::new(Vec::new()),
            favorites: Mutex::new(Vec::new()),
            photos: Mutex::new(Vec::new()),
            charities: Mutex::new(Vec::new()),
            get_or_create_calls: AtomicUsize::new(0),
        }
    }
}

impl MockState {
    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Register an account directly in mock state.
    pub fn seed_user(&self, email: &str, password: &str, name: &str) -> User {
        let user = User {
            id: UserId::new(self.next_id()),
            email: Email::parse(email).expect("valid seed email"),
            full_name: name.to_string(),
            created_at: Utc::now(),
        };
        self.accounts.lock().unwrap().push(Account {
            user: user.clone(),
            password: password.to_string(),
        });
        user
    }

    /// Add a listing directly in mock state.
    pub fn seed_listing(&self, seller: UserId, title: &str, price_cents: i64) -> Listing {
        let listing = Listing {
            id: ListingId::new(self.next_id()),
            title: title.to_string(),
            description: String::new(),
            price: Price::from_minor_units(price_cents, CurrencyCode::USD),
            category_id: CategoryId::new(1),
            user_id: seller,
            charity_id: CharityId::new(1),
            images: Vec::new(),
            availability: Availability::Available,
        };
        self.listings
            .lock()
            .unwrap()
            .insert(listing.id.as_i64(), listing.clone());
        listing
    }

    /// Add a charity directly in mock state.
    pub fn seed_charity(&self, name: &str, description: &str) -> Charity {
        let charity = Charity {
            id: CharityId::new(self.next_id()),
            name: name.to_string(),
            description: description.to_string(),
            logo_url: None,
        };
        self.charities.lock().unwrap().push(charity.clone());
        charity
    }

    /// Delete a listing out from under any basket items referencing it.
    pub fn remove_listing(&self, listing_id: ListingId) {
        self.listings.lock().unwrap().remove(&listing_id.as_i64());
    }

    /// Invalidate every issued token (simulates server-side revocation).
    pub fn revoke_all_tokens(&self) {
        self.tokens.lock().unwrap().clear();
    }

    /// How many times the get-or-create endpoint was hit.
    pub fn get_or_create_calls(&self) -> usize {
        self.get_or_create_calls.load(Ordering::Relaxed)
    }

    /// Server-side item count for a basket.
    pub fn basket_item_count(&self, basket_id: BasketId) -> usize {
        self.items
            .lock()
            .unwrap()
            .iter()
            .filter(|item| item.basket_id == basket_id)
            .count()
    }
}

// ============================================================================
// Test Context
// ============================================================================

/// A running mock API plus a client pointed at it.
pub struct TestContext {
    /// Client under test.
    pub hopeflow: HopeFlow,
    /// Mock state, for seeding and fault injection.
    pub state: Arc<MockState>,
    /// Base URL of the mock API.
    pub base_url: String,
    /// Token file backing this context's client.
    pub token_file: PathBuf,
}

impl TestContext {
    /// Start a mock server on an ephemeral port and build a client for it.
    pub async fn new() -> Self {
        let state = Arc::new(MockState::default());
        let app = router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock listener");
        let addr = listener.local_addr().expect("mock local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server");
        });

        let base_url = format!("http://{addr}");
        let token_file = std::env::temp_dir()
            .join(format!(
                "hopeflow-it-{}-{}",
                std::process::id(),
                TOKEN_FILE_SEQ.fetch_add(1, Ordering::Relaxed)
            ))
            .join("token");

        let config = HopeFlowConfig::new(base_url.clone(), token_file.clone(), None)
            .expect("mock config");
        let hopeflow = HopeFlow::new(config).expect("client");

        Self {
            hopeflow,
            state,
            base_url,
            token_file,
        }
    }

    /// A fresh client sharing this context's API and token file, as if the
    /// process restarted.
    pub fn restarted_client(&self) -> HopeFlow {
        let config = HopeFlowConfig::new(self.base_url.clone(), self.token_file.clone(), None)
            .expect("mock config");
        HopeFlow::new(config).expect("client")
    }
}

// ============================================================================
// Router & Handlers
// ============================================================================

type AppState = State<Arc<MockState>>;

/// Build the mock API router.
pub fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/api/v1/users/me", get(me))
        .route("/api/v1/users/", post(create_user))
        .route("/api/v1/listings/", get(listings_index))
        .route("/api/v1/listings", post(listing_create))
        .route(
            "/api/v1/listings/{id}",
            get(listing_show).put(listing_update).delete(listing_delete),
        )
        .route("/api/v1/listing-photos", get(photos_index))
        .route("/api/v1/listing-photos/upload", post(photos_upload))
        .route(
            "/api/v1/baskets/user/{user_id}/get-or-create",
            get(basket_get_or_create),
        )
        .route("/api/v1/baskets/{id}", get(basket_show))
        .route("/api/v1/baskets/{id}/items", post(basket_add_item))
        .route(
            "/api/v1/baskets/{id}/items/{item_id}",
            delete(basket_remove_item),
        )
        .route(
            "/api/v1/user-favorite/",
            get(favorites_index)
                .post(favorites_create)
                .delete(favorites_delete),
        )
        .route("/api/v1/charities/", get(charities_index))
        .with_state(state)
}

fn api_error(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

fn authed_user(state: &MockState, headers: &HeaderMap) -> Result<User, Response> {
    let token = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = token else {
        return Err(api_error(StatusCode::UNAUTHORIZED, "missing bearer token"));
    };

    let user_id = state.tokens.lock().unwrap().get(token).copied();
    let Some(user_id) = user_id else {
        return Err(api_error(StatusCode::UNAUTHORIZED, "invalid token"));
    };

    state
        .accounts
        .lock()
        .unwrap()
        .iter()
        .find(|account| account.user.id == user_id)
        .map(|account| account.user.clone())
        .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "unknown user"))
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(State(state): AppState, Form(form): Form<LoginForm>) -> Response {
    let user = state
        .accounts
        .lock()
        .unwrap()
        .iter()
        .find(|account| {
            account.user.email.as_str() == form.username && account.password == form.password
        })
        .map(|account| account.user.clone());

    let Some(user) = user else {
        return api_error(StatusCode::UNAUTHORIZED, "invalid credentials");
    };

    let token = format!("tok-{}", state.next_id());
    state.tokens.lock().unwrap().insert(token.clone(), user.id);

    Json(json!({ "accessToken": token, "tokenType": "bearer" })).into_response()
}

async fn me(State(state): AppState, headers: HeaderMap) -> Response {
    match authed_user(&state, &headers) {
        Ok(user) => Json(user).into_response(),
        Err(response) => response,
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewUserBody {
    email: String,
    password: String,
    full_name: String,
}

async fn create_user(State(state): AppState, Json(body): Json<NewUserBody>) -> Response {
    let exists = state
        .accounts
        .lock()
        .unwrap()
        .iter()
        .any(|account| account.user.email.as_str() == body.email);
    if exists {
        return api_error(StatusCode::CONFLICT, "email already registered");
    }

    let user = state.seed_user(&body.email, &body.password, &body.full_name);
    (StatusCode::CREATED, Json(user)).into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingQuery {
    user_id: Option<i64>,
    purchased_by: Option<i64>,
}

async fn listings_index(State(state): AppState, Query(query): Query<ListingQuery>) -> Response {
    let listings = state.listings.lock().unwrap();
    let mut result: Vec<Listing> = listings
        .values()
        .filter(|listing| {
            query
                .user_id
                .is_none_or(|user_id| listing.user_id == UserId::new(user_id))
        })
        .cloned()
        .collect();

    // The mock does not track purchases; a purchaser filter matches nothing
    if query.purchased_by.is_some() {
        result.clear();
    }

    result.sort_by_key(|listing| listing.id);
    Json(result).into_response()
}

async fn listing_show(State(state): AppState, Path(id): Path<i64>) -> Response {
    state.listings.lock().unwrap().get(&id).map_or_else(
        || api_error(StatusCode::NOT_FOUND, "listing not found"),
        |listing| Json(listing.clone()).into_response(),
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DraftBody {
    title: String,
    description: String,
    price: Price,
    category_id: CategoryId,
    charity_id: CharityId,
}

async fn listing_create(
    State(state): AppState,
    headers: HeaderMap,
    Json(body): Json<DraftBody>,
) -> Response {
    let user = match authed_user(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let listing = Listing {
        id: ListingId::new(state.next_id()),
        title: body.title,
        description: body.description,
        price: body.price,
        category_id: body.category_id,
        user_id: user.id,
        charity_id: body.charity_id,
        images: Vec::new(),
        availability: Availability::Available,
    };
    state
        .listings
        .lock()
        .unwrap()
        .insert(listing.id.as_i64(), listing.clone());

    (StatusCode::CREATED, Json(listing)).into_response()
}

async fn listing_update(
    State(state): AppState,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<DraftBody>,
) -> Response {
    if let Err(response) = authed_user(&state, &headers) {
        return response;
    }

    let mut listings = state.listings.lock().unwrap();
    let Some(listing) = listings.get_mut(&id) else {
        return api_error(StatusCode::NOT_FOUND, "listing not found");
    };

    listing.title = body.title;
    listing.description = body.description;
    listing.price = body.price;
    listing.category_id = body.category_id;
    listing.charity_id = body.charity_id;

    Json(listing.clone()).into_response()
}

async fn listing_delete(
    State(state): AppState,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = authed_user(&state, &headers) {
        return response;
    }

    if state.listings.lock().unwrap().remove(&id).is_none() {
        return api_error(StatusCode::NOT_FOUND, "listing not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhotoQuery {
    listing_id: i64,
}

async fn photos_index(State(state): AppState, Query(query): Query<PhotoQuery>) -> Response {
    let photos: Vec<ListingPhoto> = state
        .photos
        .lock()
        .unwrap()
        .iter()
        .filter(|photo| photo.listing_id == ListingId::new(query.listing_id))
        .cloned()
        .collect();
    Json(photos).into_response()
}

async fn photos_upload(
    State(state): AppState,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if let Err(response) = authed_user(&state, &headers) {
        return response;
    }

    let mut listing_id = None;
    let mut file_name = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some("listingId") => {
                listing_id = field.text().await.ok().and_then(|text| text.parse().ok());
            }
            Some("file") => {
                file_name = field.file_name().map(ToString::to_string);
                // Drain the body; the mock does not store image bytes
                let _ = field.bytes().await;
            }
            _ => {}
        }
    }

    let (Some(listing_id), Some(file_name)) = (listing_id, file_name) else {
        return api_error(StatusCode::BAD_REQUEST, "listingId and file are required");
    };

    let photo = ListingPhoto {
        id: PhotoId::new(state.next_id()),
        listing_id: ListingId::new(listing_id),
        url: format!("https://cdn.hopeflow.test/{file_name}"),
    };
    state.photos.lock().unwrap().push(photo.clone());

    (StatusCode::CREATED, Json(photo)).into_response()
}

async fn basket_get_or_create(
    State(state): AppState,
    Path(user_id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let user = match authed_user(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    if user.id != UserId::new(user_id) {
        return api_error(StatusCode::FORBIDDEN, "basket belongs to another user");
    }

    state.get_or_create_calls.fetch_add(1, Ordering::Relaxed);

    let mut baskets = state.baskets.lock().unwrap();
    let basket = baskets.entry(user_id).or_insert_with(|| Basket {
        id: BasketId::new(state.next_id()),
        user_id: user.id,
        is_active: true,
    });

    Json(basket.clone()).into_response()
}

async fn basket_show(State(state): AppState, Path(id): Path<i64>, headers: HeaderMap) -> Response {
    if let Err(response) = authed_user(&state, &headers) {
        return response;
    }

    let basket = state
        .baskets
        .lock()
        .unwrap()
        .values()
        .find(|basket| basket.id == BasketId::new(id))
        .cloned();
    let Some(basket) = basket else {
        return api_error(StatusCode::NOT_FOUND, "basket not found");
    };

    let items: Vec<BasketItem> = state
        .items
        .lock()
        .unwrap()
        .iter()
        .filter(|item| item.basket_id == basket.id)
        .cloned()
        .collect();

    Json(json!({ "basket": basket, "items": items })).into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewItemBody {
    listing_id: i64,
}

async fn basket_add_item(
    State(state): AppState,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<NewItemBody>,
) -> Response {
    if let Err(response) = authed_user(&state, &headers) {
        return response;
    }

    // No uniqueness check: mirrors the open question about the real server
    let item = BasketItem {
        id: BasketItemId::new(state.next_id()),
        basket_id: BasketId::new(id),
        listing_id: ListingId::new(body.listing_id),
        created_at: Utc::now(),
    };
    state.items.lock().unwrap().push(item.clone());

    (StatusCode::CREATED, Json(item)).into_response()
}

async fn basket_remove_item(
    State(state): AppState,
    Path((id, item_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = authed_user(&state, &headers) {
        return response;
    }

    let mut items = state.items.lock().unwrap();
    let before = items.len();
    items.retain(|item| {
        !(item.basket_id == BasketId::new(id) && item.id == BasketItemId::new(item_id))
    });

    if items.len() == before {
        return api_error(StatusCode::NOT_FOUND, "basket item not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FavoriteQuery {
    user_id: i64,
    listing_id: Option<i64>,
}

async fn favorites_index(
    State(state): AppState,
    Query(query): Query<FavoriteQuery>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = authed_user(&state, &headers) {
        return response;
    }

    let favorites: Vec<Favorite> = state
        .favorites
        .lock()
        .unwrap()
        .iter()
        .filter(|favorite| favorite.user_id == UserId::new(query.user_id))
        .cloned()
        .collect();
    Json(favorites).into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewFavoriteBody {
    user_id: i64,
    listing_id: i64,
}

async fn favorites_create(
    State(state): AppState,
    headers: HeaderMap,
    Json(body): Json<NewFavoriteBody>,
) -> Response {
    if let Err(response) = authed_user(&state, &headers) {
        return response;
    }

    let favorite = Favorite {
        id: FavoriteId::new(state.next_id()),
        user_id: UserId::new(body.user_id),
        listing_id: ListingId::new(body.listing_id),
    };
    state.favorites.lock().unwrap().push(favorite.clone());

    (StatusCode::CREATED, Json(favorite)).into_response()
}

async fn favorites_delete(
    State(state): AppState,
    Query(query): Query<FavoriteQuery>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = authed_user(&state, &headers) {
        return response;
    }

    let Some(listing_id) = query.listing_id else {
        return api_error(StatusCode::BAD_REQUEST, "listingId is required");
    };

    let mut favorites = state.favorites.lock().unwrap();
    let before = favorites.len();
    favorites.retain(|favorite| {
        !(favorite.user_id == UserId::new(query.user_id)
            && favorite.listing_id == ListingId::new(listing_id))
    });

    if favorites.len() == before {
        return api_error(StatusCode::NOT_FOUND, "favorite not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn charities_index(State(state): AppState) -> Response {
    let charities: Vec<Charity> = state.charities.lock().unwrap().clone();
    Json(charities).into_response()
}
