//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`HomePanelError`] via `#[from]` at port boundaries.

/// Base error type shared by every crate in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum HomePanelError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    NotFound(#[from] NotFoundError),

    #[error("invalid payload: {0}")]
    Payload(#[from] PayloadError),

    /// Failure of the underlying transport (HTTP, filesystem, …).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Violations of domain invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("component name must not be empty")]
    EmptyName,

    #[error("component name contains invalid character {0:?}")]
    InvalidNameCharacter(char),

    #[error("temperature {value} is outside [{min}, {max}]")]
    TemperatureOutOfRange { value: i32, min: i32, max: i32 },

    #[error("{0:?} is not an integer")]
    NotAnInteger(String),
}

/// A lookup that found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{resource} {name} not found")]
pub struct NotFoundError {
    pub resource: &'static str,
    pub name: String,
}

/// A JSON document that does not carry the expected state field.
#[derive(Debug, thiserror::Error)]
#[error("payload does not match the {kind} resource shape: {source}")]
pub struct PayloadError {
    pub kind: &'static str,
    #[source]
    pub source: serde_json::Error,
}
