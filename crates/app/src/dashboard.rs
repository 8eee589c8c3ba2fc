//! Dashboard: the composition root.
//!
//! Owns the ordered component list, the state-change bus and the document
//! the components render into. On construction it registers the single
//! [`ViewUpdater`] that mirrors announcements into the view.

use std::sync::Arc;

use tokio::sync::broadcast;

use homepanel_domain::announcement::StateChange;
use homepanel_domain::error::ValidationError;
use homepanel_domain::name::ComponentName;

use crate::component::{Component, ComponentContext, SyncPolicy};
use crate::components::{Heating, Lighting};
use crate::event_bus::StateChangeBus;
use crate::listener::ViewUpdater;
use crate::ports::{StatePublisher, StateStore};
use crate::view::{Document, Element, Pending};

/// Id of the container every component is rendered into.
pub const PANEL_ID: &str = "control-panel";

/// Name of the built-in lighting switch, rendered first.
pub const DEFAULT_LIGHTING: &str = "lighting";
/// Name of the built-in heating setpoint, rendered after the lighting switch.
pub const DEFAULT_HEATING: &str = "heating";

/// Capacity of the broadcast side of the state-change bus.
const BUS_CAPACITY: usize = 64;

/// The set of components shown on one control panel.
pub struct Dashboard {
    bus: Arc<StateChangeBus>,
    document: Document,
    panel: Element,
    components: Vec<Arc<dyn Component>>,
}

impl Dashboard {
    /// Build the standard dashboard: a lighting switch then a heating setpoint.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if a built-in component name is invalid.
    pub fn new<S: StateStore + 'static>(
        store: Arc<S>,
        policy: SyncPolicy,
    ) -> Result<Self, ValidationError> {
        let bus = Arc::new(StateChangeBus::new(BUS_CAPACITY));
        let ctx = Self::context(&bus, store, policy);
        let components: Vec<Arc<dyn Component>> = vec![
            Arc::new(Lighting::new(ComponentName::new(DEFAULT_LIGHTING)?, &ctx)),
            Arc::new(Heating::new(ComponentName::new(DEFAULT_HEATING)?, &ctx)),
        ];
        Ok(Self::with_components(bus, components))
    }

    /// Build a dashboard over an explicit component list.
    ///
    /// The components must publish on `bus` (see [`Dashboard::context`]) for
    /// their fragments to be kept up to date.
    pub fn with_components(bus: Arc<StateChangeBus>, components: Vec<Arc<dyn Component>>) -> Self {
        let document = Document::new();
        let panel = Element::new("div").with_id(PANEL_ID);
        document.mount(panel.clone());

        let updater = ViewUpdater::new(document.clone());
        bus.observe(move |change| updater.apply(change));

        Self {
            bus,
            document,
            panel,
            components,
        }
    }

    /// Component context that publishes on `bus`.
    pub fn context<S: StateStore + 'static>(
        bus: &Arc<StateChangeBus>,
        store: Arc<S>,
        policy: SyncPolicy,
    ) -> ComponentContext<S> {
        let publisher: Arc<dyn StatePublisher> = bus.clone();
        ComponentContext::new(store, publisher, policy)
    }

    /// Fetch then render every component, in declaration order.
    ///
    /// Rendering does not wait for the fetch; fetched values are applied
    /// whenever their response arrives. Returns the pending fetches.
    pub fn start(&self) -> Vec<Pending> {
        self.components
            .iter()
            .map(|component| {
                tracing::debug!(name = %component.name(), kind = %component.kind(), "starting component");
                let fetch = Arc::clone(component).fetch_state(&self.panel);
                Arc::clone(component).render(&self.panel);
                fetch
            })
            .collect()
    }

    /// Make `container` reachable by the view updater.
    ///
    /// Components rendered into a mounted container stay in sync with
    /// state changes, like the ones on the main panel.
    pub fn mount(&self, container: Element) {
        self.document.mount(container);
    }

    #[must_use]
    pub fn panel(&self) -> &Element {
        &self.panel
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    #[must_use]
    pub fn components(&self) -> &[Arc<dyn Component>] {
        &self.components
    }

    #[must_use]
    pub fn component(&self, name: &str) -> Option<&Arc<dyn Component>> {
        self.components.iter().find(|c| c.name().as_str() == name)
    }

    /// The fragment rendered on the main panel for `name`.
    #[must_use]
    pub fn fragment(&self, name: &str) -> Option<Element> {
        let element_id = ComponentName::new(name).ok()?.element_id();
        self.panel.find_by_id(&element_id)
    }

    /// Subscribe to every announcement published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.bus.subscribe()
    }

    #[must_use]
    pub fn render_html(&self) -> String {
        self.panel.to_html()
    }
}
