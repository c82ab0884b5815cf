//! Non-negative product prices using decimal arithmetic.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price must be a number")]
    NotANumber,
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// More than [`Price::MAX_SCALE`] digits after the decimal point.
    #[error("price cannot have more than two decimal places")]
    TooPrecise,
    /// Above [`Price::MAX`].
    #[error("price cannot exceed 99999999.99")]
    TooLarge,
}

/// A unit price in the store's currency.
///
/// Serialized as a plain JSON number so client scripts can do arithmetic on
/// it directly.
///
/// ```
/// use brickexchange_core::Price;
///
/// let price = Price::parse("249.99").unwrap();
/// assert_eq!(price.to_string(), "249.99");
/// assert!(Price::parse("-1").is_err());
/// assert!(Price::parse("a lot").is_err());
/// assert!(Price::parse("1.999").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Zero, the lowest representable price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Digits allowed after the decimal point; matches the `NUMERIC(10, 2)` column.
    pub const MAX_SCALE: u32 = 2;

    /// Highest storable price, 99999999.99.
    pub const MAX: Self = Self(Decimal::from_parts(1_410_065_407, 2, 0, false, 2));

    /// Wrap a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero,
    /// `PriceError::TooPrecise` if it has more than two decimal places and
    /// `PriceError::TooLarge` if it exceeds [`Price::MAX`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        let amount = amount.normalize();
        if amount.scale() > Self::MAX_SCALE {
            return Err(PriceError::TooPrecise);
        }
        if amount > Self::MAX.0 {
            return Err(PriceError::TooLarge);
        }
        Ok(Self(amount))
    }

    /// Parse a price from its textual form (e.g. a form field).
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotANumber` for non-numeric input and
    /// `PriceError::Negative` for amounts below zero.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(s.trim())
            .or_else(|_| Decimal::from_scientific(s.trim()))
            .map_err(|_| PriceError::NotANumber)?;
        Self::new(amount)
    }

    /// Returns the underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_and_fractional() {
        assert_eq!(Price::parse("400").unwrap().to_string(), "400");
        assert_eq!(Price::parse(" 34.50 ").unwrap().to_string(), "34.5");
    }

    #[test]
    fn test_zero_is_allowed() {
        assert_eq!(Price::parse("0").unwrap(), Price::ZERO);
        assert_eq!(Price::parse("-0").unwrap(), Price::ZERO);
    }

    #[test]
    fn test_negative_rejected() {
        assert_eq!(Price::parse("-0.01"), Err(PriceError::Negative));
    }

    #[test]
    fn test_fits_the_price_column() {
        assert_eq!(Price::MAX.to_string(), "99999999.99");
        assert!(Price::parse("99999999.99").is_ok());
        assert!(Price::parse("1.990").is_ok());
        assert_eq!(Price::parse("1.999"), Err(PriceError::TooPrecise));
        assert_eq!(Price::parse("123456789.99"), Err(PriceError::TooLarge));
        assert_eq!(Price::parse("100000000"), Err(PriceError::TooLarge));
    }

    #[test]
    fn test_not_a_number() {
        assert_eq!(Price::parse(""), Err(PriceError::NotANumber));
        assert_eq!(Price::parse("12 dollars"), Err(PriceError::NotANumber));
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_value(Price::parse("155").unwrap()).unwrap();
        assert!(json.is_number());
        assert_eq!(json.as_f64(), Some(155.0));
    }
}
