//! Stock and purchase quantities.

use core::fmt;
use core::num::IntErrorKind;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The input is not an integer.
    #[error("quantity must be a whole number")]
    NotAnInteger,
    /// The value is below zero.
    #[error("quantity cannot be negative")]
    Negative,
    /// A whole number too large to store.
    #[error("quantity cannot exceed {}", i32::MAX)]
    TooLarge,
}

/// A non-negative count of units.
///
/// Used both for stored stock and for the per-line amounts of a purchase.
/// Stock never drops below zero: [`Quantity::saturating_sub`] floors at zero
/// the same way the storage-level decrement does.
///
/// ```
/// use brickexchange_core::Quantity;
///
/// let stock = Quantity::new(3).unwrap();
/// let bought = Quantity::new(5).unwrap();
/// assert_eq!(stock.saturating_sub(bought), Quantity::ZERO);
/// assert!(Quantity::new(-1).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "i32", into = "i32")]
pub struct Quantity(i32);

impl Quantity {
    /// No units.
    pub const ZERO: Self = Self(0);

    /// Wrap a count.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::Negative` if `count` is below zero.
    pub const fn new(count: i32) -> Result<Self, QuantityError> {
        if count < 0 {
            return Err(QuantityError::Negative);
        }
        Ok(Self(count))
    }

    /// Parse a quantity from its textual form (e.g. a form field).
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::NotAnInteger` for non-integer input,
    /// `QuantityError::Negative` for counts below zero and
    /// `QuantityError::TooLarge` for whole numbers beyond `i32`.
    pub fn parse(s: &str) -> Result<Self, QuantityError> {
        let count = s.trim().parse::<i32>().map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow => QuantityError::TooLarge,
            IntErrorKind::NegOverflow => QuantityError::Negative,
            _ => QuantityError::NotAnInteger,
        })?;
        Self::new(count)
    }

    /// Returns the underlying count.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Subtract `other`, flooring the result at zero.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        if other.0 >= self.0 {
            Self::ZERO
        } else {
            Self(self.0 - other.0)
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<i32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for i32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Quantity {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i32 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Quantity {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let count = <i32 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(count)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Quantity {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i32 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Quantity::parse(" 5 ").unwrap().as_i32(), 5);
        assert_eq!(Quantity::parse("0").unwrap(), Quantity::ZERO);
        assert_eq!(Quantity::parse("-2"), Err(QuantityError::Negative));
        assert_eq!(Quantity::parse("2.5"), Err(QuantityError::NotAnInteger));
        assert_eq!(Quantity::parse("lots"), Err(QuantityError::NotAnInteger));
    }

    #[test]
    fn test_parse_out_of_range() {
        assert_eq!(Quantity::parse("3000000000"), Err(QuantityError::TooLarge));
        assert_eq!(Quantity::parse("-3000000000"), Err(QuantityError::Negative));
        assert_eq!(Quantity::parse("2147483647").unwrap().as_i32(), i32::MAX);
    }

    #[test]
    fn test_saturating_sub_clamps_at_zero() {
        let three = Quantity::new(3).unwrap();
        assert_eq!(three.saturating_sub(Quantity::new(1).unwrap()).as_i32(), 2);
        assert_eq!(three.saturating_sub(three), Quantity::ZERO);
        assert_eq!(three.saturating_sub(Quantity::new(5).unwrap()), Quantity::ZERO);
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Quantity>("-1").is_err());
        assert_eq!(serde_json::from_str::<Quantity>("4").unwrap().as_i32(), 4);
    }
}
