//! Request parameters and their validation.
//!
//! [`Params`] collects the parameters of a request into one bag: the query
//! string for `GET`, the body for everything else (`application/json`,
//! `application/x-www-form-urlencoded` or `multipart/form-data`). Handlers
//! then pull typed values out of it; every accessor fails fast with a
//! [`ParamError`] whose message goes back to the client verbatim.
//!
//! A parameter is *present* when it is not `null` and, for text, not empty
//! after trimming. `quantity=0` is present.

use std::collections::HashMap;

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{Method, header};
use serde_json::Value;

use brickexchange_core::{Price, PriceError, ProductId, Quantity, QuantityError, StoreName};

use crate::error::AppError;
use crate::models::Cart;

/// A client-side parameter problem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    /// One or more required parameters are absent.
    #[error("{0}")]
    Missing(&'static str),

    /// A parameter is present but malformed.
    #[error("{0}")]
    Invalid(&'static str),

    /// A quantity below zero.
    #[error("Quantity of product should not be negative.")]
    NegativeQuantity,

    /// A price below zero.
    #[error("Price of product should not be negative.")]
    NegativePrice,

    /// The body could not be decoded for its declared content type.
    #[error("Malformed request body.")]
    MalformedBody,
}

/// The parameter bag of one request.
#[derive(Debug, Clone, Default)]
pub struct Params {
    fields: HashMap<String, Value>,
}

impl Params {
    /// Build a bag from text pairs (query strings, forms).
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        }
    }

    /// Build a bag from a JSON object body. Anything but an object is rejected.
    ///
    /// # Errors
    ///
    /// Returns `ParamError::MalformedBody` if `value` is not an object.
    pub fn from_json(value: Value) -> Result<Self, ParamError> {
        match value {
            Value::Object(map) => Ok(Self {
                fields: map.into_iter().collect(),
            }),
            _ => Err(ParamError::MalformedBody),
        }
    }

    /// The raw value of a present parameter.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|value| is_present(value))
    }

    /// The trimmed text of a present parameter.
    ///
    /// Numbers and booleans are rendered as JSON text; objects and arrays as
    /// serialized JSON.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        self.value(key).map(|value| match value {
            Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        })
    }

    /// Fail with `message` unless every key is present.
    ///
    /// # Errors
    ///
    /// Returns `ParamError::Missing(message)` if any key is absent.
    pub fn require(&self, keys: &[&str], message: &'static str) -> Result<(), ParamError> {
        if keys.iter().all(|key| self.value(key).is_some()) {
            Ok(())
        } else {
            Err(ParamError::Missing(message))
        }
    }

    /// Trimmed text of a required parameter.
    ///
    /// # Errors
    ///
    /// Returns `ParamError::Missing(message)` if the key is absent.
    pub fn required_text(&self, key: &str, message: &'static str) -> Result<String, ParamError> {
        self.text(key).ok_or(ParamError::Missing(message))
    }

    /// The `store_name` parameter, normalized.
    ///
    /// # Errors
    ///
    /// Returns `ParamError::Missing(message)` if it is absent.
    pub fn store_name(&self, message: &'static str) -> Result<StoreName, ParamError> {
        let raw = self.required_text("store_name", message)?;
        StoreName::parse(&raw).map_err(|_| ParamError::Missing(message))
    }

    /// The `product_id` parameter.
    ///
    /// # Errors
    ///
    /// Returns `ParamError::Missing(missing)` if absent and
    /// `ParamError::Invalid(invalid)` if it is not an integer.
    pub fn product_id(
        &self,
        missing: &'static str,
        invalid: &'static str,
    ) -> Result<ProductId, ParamError> {
        self.required_text("product_id", missing)?
            .parse::<ProductId>()
            .map_err(|_| ParamError::Invalid(invalid))
    }

    /// An optional quantity parameter.
    ///
    /// # Errors
    ///
    /// Returns `ParamError::NegativeQuantity` for values below zero and
    /// `ParamError::Invalid` for non-integers or counts beyond `i32`.
    pub fn quantity(&self, key: &str) -> Result<Option<Quantity>, ParamError> {
        self.text(key)
            .map(|raw| {
                Quantity::parse(&raw).map_err(|e| match e {
                    QuantityError::Negative => ParamError::NegativeQuantity,
                    QuantityError::NotAnInteger => {
                        ParamError::Invalid("Quantity of product should be a whole number.")
                    }
                    QuantityError::TooLarge => {
                        ParamError::Invalid("Quantity of product is out of range.")
                    }
                })
            })
            .transpose()
    }

    /// An optional price parameter.
    ///
    /// # Errors
    ///
    /// Returns `ParamError::NegativePrice` for values below zero and
    /// `ParamError::Invalid` for non-numbers, sub-cent amounts or amounts
    /// too large to store.
    pub fn price(&self, key: &str) -> Result<Option<Price>, ParamError> {
        self.text(key)
            .map(|raw| {
                Price::parse(&raw).map_err(|e| match e {
                    PriceError::Negative => ParamError::NegativePrice,
                    PriceError::NotANumber => {
                        ParamError::Invalid("Price of product should be a number.")
                    }
                    PriceError::TooPrecise => ParamError::Invalid(
                        "Price of product should have at most two decimal places.",
                    ),
                    PriceError::TooLarge => {
                        ParamError::Invalid("Price of product is out of range.")
                    }
                })
            })
            .transpose()
    }

    /// The `cart` parameter.
    ///
    /// # Errors
    ///
    /// Returns `ParamError::Missing` if absent and `ParamError::Invalid` if
    /// it is not a cart object (or a string holding one).
    pub fn cart(&self) -> Result<Cart, ParamError> {
        let value = self
            .value("cart")
            .ok_or(ParamError::Missing("Missing POST parameter: cart."))?;
        Cart::from_value(value).map_err(|_| ParamError::Invalid("Invalid POST parameter: cart."))
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

impl<S> FromRequest<S> for Params
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if matches!(*req.method(), Method::GET | Method::HEAD) {
            let pairs = req
                .uri()
                .query()
                .map(|query| {
                    axum::extract::Query::<Vec<(String, String)>>::try_from_uri(req.uri())
                        .map(|q| q.0)
                        .map_err(|_| {
                            tracing::debug!(query, "unparseable query string");
                            ParamError::MalformedBody
                        })
                })
                .transpose()?
                .unwrap_or_default();
            return Ok(Self::from_pairs(pairs));
        }

        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let axum::Json(value) = axum::Json::<Value>::from_request(req, state)
                .await
                .map_err(|_| ParamError::MalformedBody)?;
            return Ok(Self::from_json(value)?);
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let axum::Form(pairs) = axum::Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|_| ParamError::MalformedBody)?;
            return Ok(Self::from_pairs(pairs));
        }

        if content_type.starts_with("multipart/form-data") {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(|_| ParamError::MalformedBody)?;
            let mut pairs = Vec::new();
            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|_| ParamError::MalformedBody)?
            {
                let Some(name) = field.name().map(ToString::to_string) else {
                    continue;
                };
                let text = field.text().await.map_err(|_| ParamError::MalformedBody)?;
                pairs.push((name, text));
            }
            return Ok(Self::from_pairs(pairs));
        }

        // No body we understand: every parameter is missing.
        Ok(Self::default())
    }
}
