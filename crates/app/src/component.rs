//! The component contract.
//!
//! Anything that implements [`Component`] can take part in the dashboard.
//! The trait is the whole contract: it carries no shared behaviour, only the
//! shape every smart-home widget must have.

use std::sync::Arc;

use homepanel_domain::component::ComponentKind;
use homepanel_domain::name::ComponentName;

use crate::ports::{StatePublisher, StateStore};
use crate::view::{Element, Pending};

/// A self-contained UI and state unit representing one smart-home device.
pub trait Component: Send + Sync {
    fn name(&self) -> &ComponentName;

    fn kind(&self) -> ComponentKind;

    /// Build this component's fragment, bind its event handlers and append
    /// it to `container`. Returns the fragment's root element
    /// (id `{name}_div`).
    ///
    /// Rendering twice yields two independent fragments whose handlers act
    /// on the same component.
    fn render(self: Arc<Self>, container: &Element) -> Element;

    /// Start fetching the persisted state and return immediately.
    ///
    /// When the response arrives the value is applied through the same
    /// update path as a user edit, so every mounted fragment is refreshed
    /// by the state-change listener.
    fn fetch_state(self: Arc<Self>, container: &Element) -> Pending;
}

/// How a component reconciles its optimistic local state with the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPolicy {
    /// Restore the pre-edit value when persisting an edit fails.
    ///
    /// Off by default: a failed write is logged and the optimistic value
    /// stays on screen.
    pub rollback_on_write_failure: bool,
    /// Drop a fetched value when a local edit happened after the fetch was
    /// issued, so a slow response cannot overwrite a newer edit.
    pub discard_superseded_fetches: bool,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            rollback_on_write_failure: false,
            discard_superseded_fetches: true,
        }
    }
}

/// Collaborators every component is constructed with.
///
/// Cheap to clone: the store and publisher are shared behind `Arc`s.
pub struct ComponentContext<S> {
    pub store: Arc<S>,
    pub publisher: Arc<dyn StatePublisher>,
    pub policy: SyncPolicy,
}

impl<S> Clone for ComponentContext<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            publisher: Arc::clone(&self.publisher),
            policy: self.policy,
        }
    }
}

impl<S: StateStore + 'static> ComponentContext<S> {
    pub fn new(store: Arc<S>, publisher: Arc<dyn StatePublisher>, policy: SyncPolicy) -> Self {
        Self {
            store,
            publisher,
            policy,
        }
    }
}
