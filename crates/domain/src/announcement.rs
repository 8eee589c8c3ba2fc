//! State-change announcements.
//!
//! An announcement is broadcast every time a component mutates its state,
//! whether from a user edit or a fetched value. It is never persisted.

use serde::{Deserialize, Serialize};

use crate::component::ComponentKind;
use crate::name::ComponentName;

/// `{name, type, <value field>}` record describing a component's new state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StateChange {
    Heating {
        name: ComponentName,
        temperature: i32,
    },
    Lighting {
        name: ComponentName,
        lighting_state: bool,
    },
}

impl StateChange {
    #[must_use]
    pub fn name(&self) -> &ComponentName {
        match self {
            Self::Heating { name, .. } | Self::Lighting { name, .. } => name,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Heating { .. } => ComponentKind::Heating,
            Self::Lighting { .. } => ComponentKind::Lighting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn name(s: &str) -> ComponentName {
        ComponentName::new(s).unwrap()
    }

    #[test]
    fn should_serialize_heating_with_type_tag() {
        let change = StateChange::Heating {
            name: name("heating"),
            temperature: 21,
        };
        assert_eq!(
            serde_json::to_value(&change).unwrap(),
            json!({"type": "heating", "name": "heating", "temperature": 21})
        );
    }

    #[test]
    fn should_serialize_lighting_with_type_tag() {
        let change = StateChange::Lighting {
            name: name("hall"),
            lighting_state: true,
        };
        assert_eq!(
            serde_json::to_value(&change).unwrap(),
            json!({"type": "lighting", "name": "hall", "lighting_state": true})
        );
    }

    #[test]
    fn should_expose_name_and_kind() {
        let change = StateChange::Lighting {
            name: name("hall"),
            lighting_state: false,
        };
        assert_eq!(change.name().as_str(), "hall");
        assert_eq!(change.kind(), ComponentKind::Lighting);
    }
}
