//! CLI command implementations, one module per command group.

pub mod auth;
pub mod basket;
pub mod charities;
pub mod favorites;
pub mod listings;
