//! State store port: read and write a component's JSON resource.

use std::future::Future;
use std::sync::Arc;

use homepanel_domain::error::HomePanelError;
use homepanel_domain::name::ComponentName;

/// Access to the per-component JSON documents addressed by `data/{name}.json`.
///
/// Documents are opaque JSON here; components decode the field they own.
pub trait StateStore: Send + Sync {
    /// Read the current document for `name`.
    fn fetch(
        &self,
        name: &ComponentName,
    ) -> impl Future<Output = Result<serde_json::Value, HomePanelError>> + Send;

    /// Replace the document for `name` with `body`.
    ///
    /// Only success or failure is observed; no response body is consumed.
    fn store(
        &self,
        name: &ComponentName,
        body: serde_json::Value,
    ) -> impl Future<Output = Result<(), HomePanelError>> + Send;
}

impl<T: StateStore> StateStore for Arc<T> {
    fn fetch(
        &self,
        name: &ComponentName,
    ) -> impl Future<Output = Result<serde_json::Value, HomePanelError>> + Send {
        (**self).fetch(name)
    }

    fn store(
        &self,
        name: &ComponentName,
        body: serde_json::Value,
    ) -> impl Future<Output = Result<(), HomePanelError>> + Send {
        (**self).store(name, body)
    }
}
