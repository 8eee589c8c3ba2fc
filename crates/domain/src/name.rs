//! Component identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Immutable name of a dashboard component.
///
/// The name doubles as the key of the rendered element (`{name}_div`) and of
/// the backing JSON resource (`data/{name}.json`), so it is restricted to
/// ASCII letters, digits, `_` and `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComponentName(String);

impl ComponentName {
    /// Validate and wrap a component name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] for an empty string and
    /// [`ValidationError::InvalidNameCharacter`] for anything outside
    /// `[A-Za-z0-9_-]`.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(ValidationError::InvalidNameCharacter(c));
        }
        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of the root element rendered for this component.
    #[must_use]
    pub fn element_id(&self) -> String {
        format!("{}_div", self.0)
    }

    /// Relative path of the JSON resource backing this component.
    #[must_use]
    pub fn resource_path(&self) -> String {
        format!("data/{}.json", self.0)
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ComponentName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ComponentName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ComponentName> for String {
    fn from(name: ComponentName) -> Self {
        name.0
    }
}
