//! In-process state-change bus backed by observers and a tokio broadcast channel.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::broadcast;

use homepanel_domain::announcement::StateChange;

use crate::ports::StatePublisher;

type Observer = Arc<dyn Fn(&StateChange) + Send + Sync>;

/// State-change bus owned by the dashboard.
///
/// Observers registered with [`observe`](Self::observe) run synchronously,
/// in registration order, on every publish. Async consumers use
/// [`subscribe`](Self::subscribe) and get a tokio [`broadcast`] receiver that
/// is fed after the observers ran.
///
/// Publishing succeeds even when there are no active subscribers
/// (the announcement is simply dropped).
pub struct StateChangeBus {
    observers: RwLock<Vec<Observer>>,
    sender: broadcast::Sender<StateChange>,
}

impl StateChangeBus {
    /// Create a new bus with the given broadcast channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            observers: RwLock::new(Vec::new()),
            sender,
        }
    }

    /// Register a synchronous observer for every future announcement.
    pub fn observe(&self, observer: impl Fn(&StateChange) + Send + Sync + 'static) {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(observer));
    }

    /// Subscribe to announcements on this bus.
    ///
    /// Returns a receiver that will get all announcements published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.sender.subscribe()
    }
}

impl Default for StateChangeBus {
    fn default() -> Self {
        Self::new(64)
    }
}

impl StatePublisher for StateChangeBus {
    fn publish(&self, change: StateChange) {
        tracing::debug!(name = %change.name(), kind = %change.kind(), "state changed");
        // observers may publish in turn, never call them under the lock
        let observers = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in &observers {
            observer(&change);
        }
        // fails only when nobody subscribed
        let _ = self.sender.send(change);
    }
}
