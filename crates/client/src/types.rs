//! Wire types for the HopeFlow API.
//!
//! These types mirror the JSON the server speaks (camelCase field names).
//! The server owns all of them; the client treats listings as read-mostly
//! and mutates basket/favorite state only through the service clients.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use hopeflow_core::{
    Availability, BasketId, BasketItemId, CategoryId, CharityId, Email, FavoriteId, ListingId,
    PhotoId, Price, UserId,
};

// =============================================================================
// Session & User
// =============================================================================

/// An authenticated session: the current user plus the bearer token.
///
/// Held in process memory only; the token is mirrored to disk by
/// [`TokenStore`](crate::TokenStore) for restart continuity.
#[derive(Clone)]
pub struct Session {
    /// The logged-in user.
    pub user: User,
    /// Bearer token for authenticated calls.
    pub token: SecretString,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// A HopeFlow user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Account email.
    pub email: Email,
    /// Display name.
    pub full_name: String,
    /// Account creation time.
    pub created_at: DateTime<Utc>,
}

/// Token payload returned by `POST /auth/login`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// The bearer token.
    pub access_token: String,
    /// Token type; the server always answers `bearer`.
    pub token_type: String,
}

/// Body for `POST /api/v1/users/`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Account email.
    pub email: Email,
    /// Plaintext password (sent over TLS, hashed server-side).
    pub password: String,
    /// Display name.
    pub full_name: String,
}

// =============================================================================
// Basket
// =============================================================================

/// A per-user basket of listings pending checkout.
///
/// At most one active basket exists per user; `get-or-create` semantics are
/// decided server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Basket {
    /// Basket ID.
    pub id: BasketId,
    /// Owning user.
    pub user_id: UserId,
    /// Whether this basket is the user's active one.
    pub is_active: bool,
}

/// A line item in a basket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketItem {
    /// Item ID.
    pub id: BasketItemId,
    /// Basket this item belongs to.
    pub basket_id: BasketId,
    /// The listing in the basket.
    pub listing_id: ListingId,
    /// When the item was added.
    pub created_at: DateTime<Utc>,
}

/// Raw basket view as the server returns it from `GET /api/v1/baskets/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketDetail {
    /// The basket itself.
    pub basket: Basket,
    /// Line items, listing IDs only.
    pub items: Vec<BasketItem>,
}

/// Denormalized basket line: the item joined with its resolved listing.
///
/// Produced by basket refresh; lines whose listing could not be fetched are
/// dropped rather than failing the refresh.
#[derive(Debug, Clone)]
pub struct BasketLine {
    /// The raw line item.
    pub item: BasketItem,
    /// The resolved listing.
    pub listing: Listing,
}

/// Body for `POST /api/v1/baskets/{id}/items`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewBasketItem {
    pub listing_id: ListingId,
}

// =============================================================================
// Listing
// =============================================================================

/// A donated or sellable item posted by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Listing ID.
    pub id: ListingId,
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Asking price.
    pub price: Price,
    /// Category.
    pub category_id: CategoryId,
    /// Seller.
    pub user_id: UserId,
    /// Charity the proceeds go to.
    pub charity_id: CharityId,
    /// Image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Server-owned availability state.
    #[serde(default)]
    pub availability: Availability,
}

/// Body for creating or updating a listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Asking price.
    pub price: Price,
    /// Category.
    pub category_id: CategoryId,
    /// Charity the proceeds go to.
    pub charity_id: CharityId,
}

/// A photo attached to a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPhoto {
    /// Photo ID.
    pub id: PhotoId,
    /// Listing the photo belongs to.
    pub listing_id: ListingId,
    /// Public URL of the stored image.
    pub url: String,
}

// =============================================================================
// Favorites
// =============================================================================

/// A user-specific bookmark on a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    /// Favorite row ID.
    pub id: FavoriteId,
    /// Owning user.
    pub user_id: UserId,
    /// Bookmarked listing.
    pub listing_id: ListingId,
}

/// Body for `POST /api/v1/user-favorite/`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewFavorite {
    pub user_id: UserId,
    pub listing_id: ListingId,
}

// =============================================================================
// Charity
// =============================================================================

/// A charitable cause listings can donate proceeds to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charity {
    /// Charity ID.
    pub id: CharityId,
    /// Display name.
    pub name: String,
    /// Short description of the cause.
    pub description: String,
    /// Logo image URL.
    pub logo_url: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_debug_redacts_token() {
        let session = Session {
            user: User {
                id: UserId::new(1),
                email: Email::parse("donor@example.com").unwrap(),
                full_name: "Donor".to_string(),
                created_at: Utc::now(),
            },
            token: SecretString::from("super-secret-token"),
        };

        let debug_output = format!("{session:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret-token"));
    }

    #[test]
    fn test_listing_decodes_camel_case() {
        let json = r#"{
            "id": 10,
            "title": "Winter coat",
            "description": "Barely worn",
            "price": {"amount": "25.00", "currencyCode": "USD"},
            "categoryId": 3,
            "userId": 1,
            "charityId": 2,
            "images": ["https://img.example/1.jpg"],
            "availability": "available"
        }"#;

        let listing: Listing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.id, ListingId::new(10));
        assert_eq!(listing.category_id, CategoryId::new(3));
        assert!(listing.availability.is_purchasable());
    }

    #[test]
    fn test_listing_defaults_optional_fields() {
        // Older server versions omit images and availability
        let json = r#"{
            "id": 10,
            "title": "Lamp",
            "description": "",
            "price": {"amount": "5.00", "currencyCode": "USD"},
            "categoryId": 1,
            "userId": 1,
            "charityId": 1
        }"#;

        let listing: Listing = serde_json::from_str(json).unwrap();
        assert!(listing.images.is_empty());
        assert_eq!(listing.availability, Availability::Available);
    }

    #[test]
    fn test_basket_detail_decodes() {
        let json = r#"{
            "basket": {"id": 1, "userId": 2, "isActive": true},
            "items": [
                {"id": 5, "basketId": 1, "listingId": 9,
                 "createdAt": "2026-01-01T00:00:00Z"}
            ]
        }"#;

        let detail: BasketDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.basket.id, BasketId::new(1));
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].listing_id, ListingId::new(9));
    }
}
