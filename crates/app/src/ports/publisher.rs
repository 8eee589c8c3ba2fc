//! State publisher port: announce component state changes.

use std::sync::Arc;

use homepanel_domain::announcement::StateChange;

/// Broadcasts [`StateChange`] announcements to interested listeners.
///
/// Publishing is synchronous: it runs inside event handlers, and listeners
/// observe the change before the handler returns.
pub trait StatePublisher: Send + Sync {
    fn publish(&self, change: StateChange);
}

impl<T: StatePublisher + ?Sized> StatePublisher for Arc<T> {
    fn publish(&self, change: StateChange) {
        (**self).publish(change);
    }
}
