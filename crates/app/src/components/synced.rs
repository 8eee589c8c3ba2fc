//! Optimistic local state mirrored to a JSON resource.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use homepanel_domain::announcement::StateChange;
use homepanel_domain::error::PayloadError;
use homepanel_domain::name::ComponentName;
use homepanel_domain::payload::{HeatingPayload, LightingPayload};

use crate::component::ComponentContext;
use crate::ports::StateStore;
use crate::view::Pending;

/// A value that lives in a component and in its `data/{name}.json` resource.
pub(crate) trait ResourceState: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    fn decode(document: serde_json::Value) -> Result<Self, PayloadError>;

    fn encode(self) -> serde_json::Value;

    fn announcement(self, name: &ComponentName) -> StateChange;
}

impl ResourceState for HeatingPayload {
    fn decode(document: serde_json::Value) -> Result<Self, PayloadError> {
        Self::from_value(document)
    }

    fn encode(self) -> serde_json::Value {
        self.to_value()
    }

    fn announcement(self, name: &ComponentName) -> StateChange {
        StateChange::Heating {
            name: name.clone(),
            temperature: self.temperature,
        }
    }
}

impl ResourceState for LightingPayload {
    fn decode(document: serde_json::Value) -> Result<Self, PayloadError> {
        Self::from_value(document)
    }

    fn encode(self) -> serde_json::Value {
        self.to_value()
    }

    fn announcement(self, name: &ComponentName) -> StateChange {
        StateChange::Lighting {
            name: name.clone(),
            lighting_state: self.lighting_state,
        }
    }
}

/// Current value and the revision of the last local edit.
struct Entry<T> {
    value: T,
    revision: u64,
}

/// Component state kept in sync with the store.
///
/// Every local edit bumps the revision. Fetches and failed writes compare the
/// revision they started from with the current one to detect that a newer
/// edit superseded them. The comparison, the store and the announcement all
/// happen under one lock, so announcements reach the view in the order the
/// values were stored.
pub(crate) struct Synced<T, S> {
    name: ComponentName,
    entry: Arc<Mutex<Entry<T>>>,
    ctx: ComponentContext<S>,
}

impl<T, S> Clone for Synced<T, S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            entry: Arc::clone(&self.entry),
            ctx: self.ctx.clone(),
        }
    }
}

impl<T: ResourceState, S: StateStore + 'static> Synced<T, S> {
    pub(crate) fn new(name: ComponentName, initial: T, ctx: ComponentContext<S>) -> Self {
        Self {
            name,
            entry: Arc::new(Mutex::new(Entry {
                value: initial,
                revision: 0,
            })),
            ctx,
        }
    }

    pub(crate) fn name(&self) -> &ComponentName {
        &self.name
    }

    pub(crate) fn get(&self) -> T {
        self.lock().value
    }

    /// Announce the current value again without changing it.
    ///
    /// Puts every mounted fragment back in line with the model after the
    /// view was edited with a value the component refused.
    pub(crate) fn reannounce(&self) {
        let entry = self.lock();
        self.announce(&entry);
    }

    /// Apply a user edit right away and persist it in the background.
    pub(crate) fn edit(&self, value: T) -> Pending {
        self.edit_with(|_| value)
    }

    /// Derive a user edit from the current value, apply it and persist it.
    pub(crate) fn edit_with(&self, update: impl FnOnce(T) -> T) -> Pending {
        let (value, previous, revision) = {
            let mut entry = self.lock();
            let previous = entry.value;
            entry.value = update(previous);
            entry.revision += 1;
            self.announce(&entry);
            (entry.value, previous, entry.revision)
        };

        let this = self.clone();
        tokio::spawn(async move { this.persist(value, previous, revision).await })
    }

    /// Fetch the stored value in the background.
    pub(crate) fn spawn_fetch(&self) -> Pending {
        let issued_at = self.lock().revision;
        let this = self.clone();
        tokio::spawn(async move { this.refresh(issued_at).await })
    }

    async fn persist(&self, value: T, previous: T, revision: u64) {
        match self.ctx.store.store(&self.name, value.encode()).await {
            Ok(()) => tracing::info!(name = %self.name, ?value, "sent state to server"),
            Err(err) => {
                tracing::warn!(name = %self.name, ?value, error = %err, "failed sending state to server");
                if !self.ctx.policy.rollback_on_write_failure {
                    return;
                }
                let mut entry = self.lock();
                if entry.revision == revision {
                    tracing::info!(name = %self.name, ?previous, "rolling back optimistic update");
                    entry.value = previous;
                    self.announce(&entry);
                } else {
                    tracing::debug!(name = %self.name, "newer edit pending, skipping rollback");
                }
            }
        }
    }

    async fn refresh(&self, issued_at: u64) {
        let document = match self.ctx.store.fetch(&self.name).await {
            Ok(document) => document,
            Err(err) => {
                tracing::warn!(name = %self.name, error = %err, "failed fetching state");
                return;
            }
        };
        let value = match T::decode(document) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(name = %self.name, error = %err, "ignoring malformed state");
                return;
            }
        };
        let mut entry = self.lock();
        if self.ctx.policy.discard_superseded_fetches && entry.revision != issued_at {
            tracing::debug!(name = %self.name, ?value, "discarding fetch superseded by a local edit");
            return;
        }
        entry.value = value;
        self.announce(&entry);
    }

    // runs under the entry lock: observers must not call back into this state
    fn announce(&self, entry: &Entry<T>) {
        self.ctx
            .publisher
            .publish(entry.value.announcement(&self.name));
    }

    fn lock(&self) -> MutexGuard<'_, Entry<T>> {
        self.entry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
