//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::db::Datastore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Handlers reach storage only through the
/// [`Datastore`] it holds.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    datastore: Arc<dyn Datastore>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, datastore: Arc<dyn Datastore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, datastore }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the datastore.
    #[must_use]
    pub fn datastore(&self) -> &dyn Datastore {
        self.inner.datastore.as_ref()
    }
}
