//! Client-resident shopping cart submitted at checkout.

use serde_json::Value;

use brickexchange_core::{ProductId, Quantity};

/// One product and the number of units bought.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: Quantity,
}

/// A cart: product id to desired quantity.
///
/// Not a reservation. Stock is only checked when the purchase is applied,
/// where each decrement is clamped at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

/// The cart value could not be read as `{ "<product id>": <quantity>, ... }`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cart must be an object of product ids to non-negative whole quantities")]
pub struct CartParseError;

impl Cart {
    /// Read a cart from a parameter value.
    ///
    /// Accepts either a JSON object or a string containing one, since page
    /// scripts send the cart through `FormData` as serialized JSON.
    ///
    /// # Errors
    ///
    /// Returns `CartParseError` for anything other than an object whose keys
    /// are integer ids and whose values are non-negative integers.
    pub fn from_value(value: &Value) -> Result<Self, CartParseError> {
        match value {
            Value::Object(_) => Self::from_object(value),
            Value::String(raw) => {
                let parsed: Value = serde_json::from_str(raw).map_err(|_| CartParseError)?;
                Self::from_object(&parsed)
            }
            _ => Err(CartParseError),
        }
    }

    fn from_object(value: &Value) -> Result<Self, CartParseError> {
        let Value::Object(entries) = value else {
            return Err(CartParseError);
        };

        let lines = entries
            .iter()
            .map(|(id, quantity)| {
                let product_id = id.parse::<ProductId>().map_err(|_| CartParseError)?;
                let quantity = quantity
                    .as_i64()
                    .and_then(|q| i32::try_from(q).ok())
                    .and_then(|q| Quantity::new(q).ok())
                    .ok_or(CartParseError)?;
                Ok(CartLine {
                    product_id,
                    quantity,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { lines })
    }

    /// The cart lines, one per product.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl FromIterator<CartLine> for Cart {
    fn from_iter<I: IntoIterator<Item = CartLine>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_object_cart() {
        let cart = Cart::from_value(&json!({ "7": 5, "12": 1 })).unwrap();
        assert_eq!(cart.lines().len(), 2);
        assert!(cart.lines().contains(&CartLine {
            product_id: ProductId::new(7),
            quantity: Quantity::new(5).unwrap(),
        }));
    }

    #[test]
    fn test_string_encoded_cart() {
        let cart = Cart::from_value(&json!("{\"3\":2}")).unwrap();
        assert_eq!(
            cart.lines(),
            &[CartLine {
                product_id: ProductId::new(3),
                quantity: Quantity::new(2).unwrap(),
            }]
        );
    }

    #[test]
    fn test_empty_cart_is_valid() {
        assert!(Cart::from_value(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_unparseable_carts() {
        for bad in [
            json!("not json"),
            json!("[1, 2]"),
            json!([{ "7": 1 }]),
            json!({ "seven": 1 }),
            json!({ "7": -1 }),
            json!({ "7": 1.5 }),
            json!({ "7": "2" }),
            json!(42),
        ] {
            assert_eq!(Cart::from_value(&bad), Err(CartParseError), "{bad}");
        }
    }
}
