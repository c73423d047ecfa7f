//! HopeFlow REST client.
//!
//! Typed client for the HopeFlow charity-marketplace API: sessions, baskets,
//! favorites, listings, and charities over JSON/HTTP with bearer-token auth.
//!
//! # Architecture
//!
//! - One [`HopeFlow`] handle per API host, cheaply cloneable via `Arc`
//! - Service clients ([`SessionClient`], [`BasketClient`], [`FavoritesClient`],
//!   [`ListingClient`], [`CharityClient`]) share the handle's transport,
//!   session slot, and caches
//! - The server is the source of truth; local state (basket lines, favorite
//!   set, listing cache) is a display-oriented mirror, reconciled on fetch
//! - No retries, no backoff, no token refresh
//!
//! # Example
//!
//! ```rust,ignore
//! use hopeflow_client::{HopeFlow, HopeFlowConfig};
//!
//! let config = HopeFlowConfig::from_env()?;
//! let hopeflow = HopeFlow::new(config)?;
//!
//! hopeflow.session().login("donor@example.com", "hunter2").await?;
//!
//! let basket = hopeflow.baskets().get_or_create().await?;
//! let lines = hopeflow.baskets().add_item(listing_id).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod basket;
mod charities;
mod client;
mod config;
mod error;
mod favorites;
mod http;
mod listings;
mod session;
pub mod types;

pub use basket::BasketClient;
pub use charities::CharityClient;
pub use client::HopeFlow;
pub use config::{ConfigError, HopeFlowConfig};
pub use error::ApiError;
pub use favorites::FavoritesClient;
pub use listings::{ListingClient, ListingFilter};
pub use session::{SessionClient, TokenStore};
pub use types::*;
