//! Status enums for listings.

use serde::{Deserialize, Serialize};

/// Availability of a listing.
///
/// Server-owned; the client treats it as read-only display state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// Listed and purchasable.
    #[default]
    Available,
    /// In someone's basket pending checkout.
    Reserved,
    /// Purchased; kept for order history views.
    Sold,
}

impl Availability {
    /// Whether the listing can still be added to a basket.
    #[must_use]
    pub const fn is_purchasable(self) -> bool {
        matches!(self, Self::Available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchasable() {
        assert!(Availability::Available.is_purchasable());
        assert!(!Availability::Reserved.is_purchasable());
        assert!(!Availability::Sold.is_purchasable());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Availability::Reserved).unwrap();
        assert_eq!(json, "\"reserved\"");
    }
}
