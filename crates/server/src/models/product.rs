//! Product model.

use core::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use shoplark_core::{OwnerId, ProductId};

/// A product listed by a seller.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub user_id: OwnerId,
    pub product_name: String,
    pub product_description: Option<String>,
    pub product_price: Decimal,
    pub product_category: Option<String>,
    pub product_status: String,
    pub product_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle status of a product listing.
///
/// Stored as text; [`ProductStatus::parse`] is the single place the accepted
/// values live, used to validate writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductStatus {
    Active,
    Inactive,
    OutOfStock,
}

impl ProductStatus {
    /// Parse a client-supplied status string.
    ///
    /// Returns `None` for anything outside the accepted set.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "out_of_stock" => Some(Self::OutOfStock),
            _ => None,
        }
    }

    /// The storage/wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::OutOfStock => "out_of_stock",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepted_values() {
        assert_eq!(ProductStatus::parse("active"), Some(ProductStatus::Active));
        assert_eq!(
            ProductStatus::parse("inactive"),
            Some(ProductStatus::Inactive)
        );
        assert_eq!(
            ProductStatus::parse("out_of_stock"),
            Some(ProductStatus::OutOfStock)
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(ProductStatus::parse("archived"), None);
        assert_eq!(ProductStatus::parse("Active"), None);
        assert_eq!(ProductStatus::parse(""), None);
    }

    #[test]
    fn test_roundtrip() {
        for status in [
            ProductStatus::Active,
            ProductStatus::Inactive,
            ProductStatus::OutOfStock,
        ] {
            assert_eq!(ProductStatus::parse(status.as_str()), Some(status));
        }
    }
}
