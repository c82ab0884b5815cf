//! Store (tenant) names.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`StoreName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreNameError {
    /// The input is empty after trimming.
    #[error("store name cannot be empty")]
    Empty,
}

/// The grouping key products are filed under.
///
/// Store names are matched case-insensitively, which is enforced here by
/// lower-casing at construction. Every read and write path goes through this
/// type, so `BrickExchange` and `brickexchange` address the same catalogue.
///
/// ```
/// use brickexchange_core::StoreName;
///
/// let a = StoreName::parse("BrickExchange").unwrap();
/// let b = StoreName::parse("brickexchange").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "brickexchange");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StoreName(String);

impl StoreName {
    /// Parse and normalize a store name.
    ///
    /// # Errors
    ///
    /// Returns `StoreNameError::Empty` if the input is blank.
    pub fn parse(s: &str) -> Result<Self, StoreNameError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(StoreNameError::Empty);
        }
        Ok(Self(s.to_lowercase()))
    }

    /// Returns the normalized (lower-case) name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for StoreName {
    type Err = StoreNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StoreName {
    type Error = StoreNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StoreName> for String {
    fn from(name: StoreName) -> Self {
        name.0
    }
}

impl AsRef<str> for StoreName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for StoreName {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for StoreName {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for StoreName {
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
    fn test_parse_lowercases() {
        let name = StoreName::parse("  BRICKexchange ").unwrap();
        assert_eq!(name.as_str(), "brickexchange");
    }

    #[test]
    fn test_parse_blank() {
        assert_eq!(StoreName::parse(""), Err(StoreNameError::Empty));
        assert_eq!(StoreName::parse(" \t"), Err(StoreNameError::Empty));
    }

    #[test]
    fn test_deserialize_normalizes() {
        let name: StoreName = serde_json::from_str("\"BrickExchange\"").unwrap();
        assert_eq!(name.to_string(), "brickexchange");
    }
}
