//! Concrete dashboard components: heating, lighting.
//!
//! Both keep a single JSON field in sync with their resource through the
//! shared optimistic-update machinery in `synced`.

mod heating;
mod lighting;
mod synced;

pub use heating::Heating;
pub use lighting::{Lighting, state_class, toggle_label};

/// Class carried by every component fragment root.
pub const COMPONENT_CLASS: &str = "compo";
/// Class of the heating setpoint input.
pub const TEMPERATURE_CLASS: &str = "temperature";
/// Class of the lighting toggle button.
pub const TOGGLE_CLASS: &str = "toggle";
