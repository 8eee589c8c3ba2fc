//! Shared fixtures for component tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use homepanel_domain::error::{HomePanelError, NotFoundError};
use homepanel_domain::name::ComponentName;

use crate::component::{ComponentContext, SyncPolicy};
use crate::event_bus::StateChangeBus;
use crate::listener::ViewUpdater;
use crate::ports::{StatePublisher, StateStore};
use crate::view::{Document, Element};

/// In-memory store. Writes are recorded, documents stay as seeded.
#[derive(Default)]
pub(crate) struct MockStore {
    documents: HashMap<String, serde_json::Value>,
    writes: Mutex<Vec<(String, serde_json::Value)>>,
    fail_writes: AtomicBool,
    gate: Option<Notify>,
}

impl MockStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Fetches block until [`release_fetch`](Self::release_fetch) is called.
    pub(crate) fn gated() -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Self::default()
        }
    }

    pub(crate) fn with_document(mut self, name: &str, document: serde_json::Value) -> Self {
        self.documents.insert(name.to_string(), document);
        self
    }

    pub(crate) fn failing_writes(self) -> Self {
        self.fail_writes.store(true, Ordering::SeqCst);
        self
    }

    pub(crate) fn release_fetch(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub(crate) fn writes(&self) -> Vec<(String, serde_json::Value)> {
        self.writes.lock().unwrap().clone()
    }
}

impl StateStore for MockStore {
    async fn fetch(&self, name: &ComponentName) -> Result<serde_json::Value, HomePanelError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.documents.get(name.as_str()).cloned().ok_or_else(|| {
            NotFoundError {
                resource: "resource",
                name: name.to_string(),
            }
            .into()
        })
    }

    async fn store(
        &self,
        name: &ComponentName,
        body: serde_json::Value,
    ) -> Result<(), HomePanelError> {
        self.writes
            .lock()
            .unwrap()
            .push((name.to_string(), body));
        if self.fail_writes.load(Ordering::SeqCst) {
            let err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
            return Err(HomePanelError::Transport(Box::new(err)));
        }
        Ok(())
    }
}

/// A panel mounted in a document, with the view updater listening on a bus.
pub(crate) struct Fixture {
    pub(crate) store: Arc<MockStore>,
    pub(crate) bus: Arc<StateChangeBus>,
    pub(crate) document: Document,
    pub(crate) panel: Element,
    pub(crate) ctx: ComponentContext<MockStore>,
}

pub(crate) fn fixture(store: MockStore) -> Fixture {
    fixture_with_policy(store, SyncPolicy::default())
}

pub(crate) fn fixture_with_policy(store: MockStore, policy: SyncPolicy) -> Fixture {
    let store = Arc::new(store);
    let bus = Arc::new(StateChangeBus::new(64));
    let document = Document::new();
    let panel = Element::new("div").with_id("control-panel");
    document.mount(panel.clone());

    let updater = ViewUpdater::new(document.clone());
    bus.observe(move |change| updater.apply(change));

    let publisher: Arc<dyn StatePublisher> = bus.clone();
    let ctx = ComponentContext::new(Arc::clone(&store), publisher, policy);

    Fixture {
        store,
        bus,
        document,
        panel,
        ctx,
    }
}

pub(crate) fn name(raw: &str) -> ComponentName {
    ComponentName::new(raw).unwrap()
}
