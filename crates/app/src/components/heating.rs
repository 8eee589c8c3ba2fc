//! Heating: a numeric setpoint edited through a bounded input.

use std::sync::Arc;

use homepanel_domain::component::ComponentKind;
use homepanel_domain::error::ValidationError;
use homepanel_domain::name::ComponentName;
use homepanel_domain::payload::{HeatingPayload, parse_temperature};
use homepanel_domain::temperature::{
    DEFAULT_TEMPERATURE, MAX_TEMPERATURE, MIN_TEMPERATURE, is_within_bounds,
};

use super::synced::Synced;
use super::{COMPONENT_CLASS, TEMPERATURE_CLASS};
use crate::component::{Component, ComponentContext};
use crate::ports::StateStore;
use crate::view::{Element, Pending};

/// Heating setpoint backed by `{"temperature": <int>}`.
pub struct Heating<S> {
    state: Synced<HeatingPayload, S>,
}

impl<S: StateStore + 'static> Heating<S> {
    /// Create a heating component starting at the default setpoint.
    pub fn new(name: ComponentName, ctx: &ComponentContext<S>) -> Self {
        Self::with_temperature(name, DEFAULT_TEMPERATURE, ctx)
    }

    pub fn with_temperature(
        name: ComponentName,
        temperature: i32,
        ctx: &ComponentContext<S>,
    ) -> Self {
        Self {
            state: Synced::new(name, HeatingPayload { temperature }, ctx.clone()),
        }
    }

    #[must_use]
    pub fn temperature(&self) -> i32 {
        self.state.get().temperature
    }

    /// Apply a user edit optimistically and PUT it to the store.
    ///
    /// The returned task resolves once the write outcome has been handled.
    pub fn set_temperature(&self, temperature: i32) -> Pending {
        self.state.edit(HeatingPayload { temperature })
    }

    /// Rejected input is logged and every mounted input is reset to the
    /// current setpoint.
    fn handle_change(&self, raw: &str) -> Option<Pending> {
        let accepted = parse_temperature(raw).and_then(|temperature| {
            if is_within_bounds(temperature) {
                Ok(temperature)
            } else {
                Err(ValidationError::TemperatureOutOfRange {
                    value: temperature,
                    min: MIN_TEMPERATURE,
                    max: MAX_TEMPERATURE,
                })
            }
        });
        match accepted {
            Ok(temperature) => Some(self.set_temperature(temperature)),
            Err(err) => {
                tracing::warn!(name = %self.state.name(), input = raw, error = %err, "ignoring temperature input");
                self.state.reannounce();
                None
            }
        }
    }
}

impl<S: StateStore + 'static> Component for Heating<S> {
    fn name(&self) -> &ComponentName {
        self.state.name()
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Heating
    }

    fn render(self: Arc<Self>, container: &Element) -> Element {
        let name = self.state.name();
        let input = Element::new("input")
            .with_class(TEMPERATURE_CLASS)
            .with_attribute("type", "number")
            .with_attribute("min", MIN_TEMPERATURE.to_string())
            .with_attribute("max", MAX_TEMPERATURE.to_string())
            .with_value(self.temperature().to_string());
        let fragment = Element::new("div")
            .with_id(name.element_id())
            .with_class(COMPONENT_CLASS)
            .with_child(Element::new("span").with_text(name.as_str()))
            .with_child(input.clone());
        container.append(fragment.clone());

        input.on_change(move |raw| self.handle_change(raw));
        fragment
    }

    fn fetch_state(self: Arc<Self>, _container: &Element) -> Pending {
        self.state.spawn_fetch()
    }
}
