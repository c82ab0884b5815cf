//! Frequently asked questions, per registered store.

use axum::Json;
use serde::{Serialize, Serializer};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::params::Params;

/// Question/answer pairs of one store, in display order.
#[derive(Debug, Clone, Copy)]
pub struct Faq(&'static [(&'static str, &'static str)]);

impl Faq {
    /// The question/answer pairs.
    #[must_use]
    pub const fn entries(&self) -> &'static [(&'static str, &'static str)] {
        self.0
    }
}

/// Serialized as a JSON object of question to answer, keeping the order.
impl Serialize for Faq {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().copied())
    }
}

const BRICKEXCHANGE: Faq = Faq(&[
    (
        "How long does delivery typically take?",
        "The expected delivery time is 2-3 weeks.",
    ),
    (
        "Where do the used LEGO sets come from?",
        "They come from exchanged LEGO sets from users.",
    ),
    (
        "What if there's a set I want that is out of stock?",
        "You'll have to wait for it to either come back or simply use another site, like BrickLink.",
    ),
    (
        "How do I sell my set(s) on BrickExchange?",
        "Please use our contact form and we'll be in touch.",
    ),
    (
        "Why can't I log in?",
        "Currently, the login feature is only open to administrators who add new products / update inventory.",
    ),
    (
        "Are you affiliated with LEGO?",
        "No. This website is not actually a real storefront at the moment.",
    ),
]);

/// Stores with an FAQ, by normalized store name.
const REGISTRY: &[(&str, Faq)] = &[("brickexchange", BRICKEXCHANGE)];

/// Look up the FAQ of a normalized store name.
#[must_use]
pub fn faq_for(store: &str) -> Option<Faq> {
    REGISTRY
        .iter()
        .find(|(name, _)| *name == store)
        .map(|(_, faq)| *faq)
}

/// FAQ of a store.
///
/// GET /faq?store_name=...
#[instrument(skip(params))]
pub async fn show(params: Params) -> Result<Json<Faq>> {
    let store = params.store_name("Missing GET parameter: store name.")?;
    faq_for(store.as_str())
        .map(Json)
        .ok_or_else(|| AppError::BadRequest("Invalid store name!".to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_in_display_order() {
        let json = serde_json::to_string(&faq_for("brickexchange").unwrap()).unwrap();
        let first = json.find("How long does delivery").unwrap();
        let last = json.find("Are you affiliated with LEGO?").unwrap();
        assert!(first < last);
        assert!(json.starts_with('{'));
    }

    #[test]
    fn test_unknown_store() {
        assert!(faq_for("legoland").is_none());
        assert_eq!(faq_for("brickexchange").unwrap().entries().len(), 6);
    }
}
