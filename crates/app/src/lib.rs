//! # homepanel-app
//!
//! Application layer: the component contract, its two concrete variants,
//! and the composition root that wires them to a view tree.
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `StateStore`: fetch and store a component's JSON resource
//!   - `StatePublisher`: announce state changes
//! - Define the **`Component` trait** (`render`, `fetch_state`) and the
//!   `Heating` / `Lighting` implementations
//! - Provide a headless **view tree** that components render into
//! - Provide **in-process infrastructure** (state-change bus, view updater)
//! - Assemble everything in the [`dashboard::Dashboard`] composition root
//!
//! ## Dependency rule
//! Depends on `homepanel-domain` only (plus `tokio` for tasks and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod component;
pub mod components;
pub mod dashboard;
pub mod event_bus;
pub mod listener;
pub mod ports;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;
