//! View updater: the single listener that mirrors announcements into the view.

use homepanel_domain::announcement::StateChange;

use crate::components::{TEMPERATURE_CLASS, TOGGLE_CLASS, state_class, toggle_label};
use crate::view::Document;

/// Applies [`StateChange`] announcements to the mounted fragments.
///
/// Fragments are looked up by id (`{name}_div`) across every root of the
/// document, so a component rendered into several containers stays in sync
/// everywhere. What gets updated depends only on the announcement's type tag.
#[derive(Clone)]
pub struct ViewUpdater {
    document: Document,
}

impl ViewUpdater {
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn apply(&self, change: &StateChange) {
        let fragments = self.document.find_all_by_id(&change.name().element_id());
        if fragments.is_empty() {
            tracing::trace!(name = %change.name(), "no mounted fragment for announcement");
            return;
        }
        for fragment in fragments {
            match change {
                StateChange::Heating { temperature, .. } => {
                    if let Some(input) = fragment.find_by_class(TEMPERATURE_CLASS) {
                        input.set_value(temperature.to_string());
                    }
                }
                StateChange::Lighting { lighting_state, .. } => {
                    if let Some(button) = fragment.find_by_class(TOGGLE_CLASS) {
                        button.set_text(toggle_label(*lighting_state));
                    }
                    fragment.remove_class(state_class(true));
                    fragment.remove_class(state_class(false));
                    fragment.add_class(state_class(*lighting_state));
                }
            }
        }
    }
}
