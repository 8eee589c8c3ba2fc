//! Component kinds.

use serde::{Deserialize, Serialize};

/// The closed set of component variants the dashboard knows how to render.
///
/// Serialized lowercase; this is the `type` tag carried by announcements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Heating,
    Lighting,
}

impl ComponentKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Heating => "heating",
            Self::Lighting => "lighting",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
