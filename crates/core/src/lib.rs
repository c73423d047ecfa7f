//! HopeFlow Core - Shared types library.
//!
//! This crate provides common types used across all HopeFlow components:
//! - `client` - REST client for the HopeFlow API
//! - `cli` - Command-line tool built on the client
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and
//!   listing availability

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
