//! Subdomain type.
//!
//! The subdomain is the public short identifier a storefront is published
//! under, reachable either as `{subdomain}.{base-domain}` or via the
//! path-based form `/store/{subdomain}`.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Subdomain`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SubdomainError {
    /// The input string is empty (after trimming).
    #[error("subdomain cannot be empty")]
    Empty,
    /// The input string is longer than a DNS label allows.
    #[error("subdomain must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `a-z`, `0-9`, `-`.
    #[error("subdomain may only contain lowercase letters, digits, and hyphens")]
    InvalidCharacter,
    /// The input starts or ends with a hyphen.
    #[error("subdomain cannot start or end with a hyphen")]
    HyphenAtEdge,
}

/// A validated storefront subdomain.
///
/// Parsing trims surrounding whitespace and lowercases the input. The
/// accepted alphabet is the DNS label alphabet `[a-z0-9-]`, at most 63
/// characters, with no leading or trailing hyphen.
///
/// Reserved labels (`www`, `api`, `admin`, the product name) are a routing
/// concern, not a validity concern; they are rejected by the tenant
/// extractor, not here.
///
/// ## Examples
///
/// ```
/// use shoplark_core::Subdomain;
///
/// let sub = Subdomain::parse(" Acme-Shop ").unwrap();
/// assert_eq!(sub.as_str(), "acme-shop");
///
/// assert!(Subdomain::parse("").is_err());
/// assert!(Subdomain::parse("has space").is_err());
/// assert!(Subdomain::parse("-edge").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Subdomain(String);

impl Subdomain {
    /// Maximum length of a subdomain (DNS label limit).
    pub const MAX_LENGTH: usize = 63;

    /// Parse and normalize a `Subdomain` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, too long, contains characters
    /// outside `[a-z0-9-]`, or starts/ends with a hyphen.
    pub fn parse(s: &str) -> Result<Self, SubdomainError> {
        let normalized = s.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(SubdomainError::Empty);
        }

        if normalized.len() > Self::MAX_LENGTH {
            return Err(SubdomainError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(SubdomainError::InvalidCharacter);
        }

        if normalized.starts_with('-') || normalized.ends_with('-') {
            return Err(SubdomainError::HyphenAtEdge);
        }

        Ok(Self(normalized))
    }

    /// Returns the subdomain as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Subdomain` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Subdomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Subdomain {
    type Err = SubdomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Subdomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Subdomain {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Subdomain {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Subdomain {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Subdomain::parse("acme").unwrap().as_str(), "acme");
        assert_eq!(
            Subdomain::parse("acme-shop-2").unwrap().as_str(),
            "acme-shop-2"
        );
        assert_eq!(Subdomain::parse("123").unwrap().as_str(), "123");
    }

    #[test]
    fn test_parse_normalizes() {
        assert_eq!(Subdomain::parse("  ACME ").unwrap().as_str(), "acme");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Subdomain::parse(""), Err(SubdomainError::Empty));
        assert_eq!(Subdomain::parse("   "), Err(SubdomainError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(64);
        assert!(matches!(
            Subdomain::parse(&long),
            Err(SubdomainError::TooLong { .. })
        ));
        assert!(Subdomain::parse(&"a".repeat(63)).is_ok());
    }

    #[test]
    fn test_parse_invalid_characters() {
        assert_eq!(
            Subdomain::parse("has space"),
            Err(SubdomainError::InvalidCharacter)
        );
        assert_eq!(
            Subdomain::parse("under_score"),
            Err(SubdomainError::InvalidCharacter)
        );
        assert_eq!(
            Subdomain::parse("dot.ted"),
            Err(SubdomainError::InvalidCharacter)
        );
    }

    #[test]
    fn test_parse_hyphen_at_edge() {
        assert_eq!(Subdomain::parse("-acme"), Err(SubdomainError::HyphenAtEdge));
        assert_eq!(Subdomain::parse("acme-"), Err(SubdomainError::HyphenAtEdge));
    }

    #[test]
    fn test_serde_roundtrip() {
        let sub = Subdomain::parse("acme").unwrap();
        let json = serde_json::to_string(&sub).unwrap();
        assert_eq!(json, "\"acme\"");

        let parsed: Subdomain = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sub);
    }
}
