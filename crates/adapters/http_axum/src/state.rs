//! Shared application state for axum handlers.

use std::sync::Arc;

use homepanel_app::ports::StateStore;

/// Application state shared across all axum handlers.
///
/// Generic over the store to avoid dynamic dispatch. `Clone` is implemented
/// manually so `S` itself does not need to be `Clone`.
pub struct AppState<S> {
    pub store: Arc<S>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: StateStore + 'static> AppState<S> {
    pub fn new(store: S) -> Self {
        Self::from_arc(Arc::new(store))
    }

    /// Use this when the store is shared with something other than the router.
    pub fn from_arc(store: Arc<S>) -> Self {
        Self { store }
    }
}
