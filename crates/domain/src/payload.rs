//! JSON documents stored at `data/{name}.json`.
//!
//! A resource carries exactly one state field. The same shape is read on
//! fetch and written on update, so both directions share one type per kind.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{PayloadError, ValidationError};

/// Body of a heating resource: `{"temperature": 21}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatingPayload {
    #[serde(deserialize_with = "integer_or_numeric_string")]
    pub temperature: i32,
}

/// Body of a lighting resource: `{"lighting_state": true}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightingPayload {
    pub lighting_state: bool,
}

impl HeatingPayload {
    /// Decode a fetched resource.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] when `temperature` is missing or not an integer.
    pub fn from_value(value: serde_json::Value) -> Result<Self, PayloadError> {
        serde_json::from_value(value).map_err(|source| PayloadError {
            kind: "heating",
            source,
        })
    }

    #[must_use]
    pub fn to_value(self) -> serde_json::Value {
        serde_json::json!({ "temperature": self.temperature })
    }
}

impl LightingPayload {
    /// Decode a fetched resource.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] when `lighting_state` is missing or not a boolean.
    pub fn from_value(value: serde_json::Value) -> Result<Self, PayloadError> {
        serde_json::from_value(value).map_err(|source| PayloadError {
            kind: "lighting",
            source,
        })
    }

    #[must_use]
    pub fn to_value(self) -> serde_json::Value {
        serde_json::json!({ "lighting_state": self.lighting_state })
    }
}

/// Parse the raw text of a numeric input into an integer setpoint.
///
/// # Errors
///
/// Returns [`ValidationError::NotAnInteger`] when `raw` is not a base-10 integer.
pub fn parse_temperature(raw: &str) -> Result<i32, ValidationError> {
    raw.trim()
        .parse()
        .map_err(|_| ValidationError::NotAnInteger(raw.to_string()))
}

// Older clients persisted the input's raw text, so `"22"` must read as 22.
fn integer_or_numeric_string<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => parse_temperature(&text).map_err(serde::de::Error::custom),
    }
}
