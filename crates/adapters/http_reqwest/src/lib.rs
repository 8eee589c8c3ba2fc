//! # homepanel-adapter-http-reqwest
//!
//! HTTP client adapter built on [reqwest](https://docs.rs/reqwest).
//!
//! ## Responsibilities
//! - Implement the [`StateStore`](homepanel_app::ports::StateStore) port
//!   against a resource server exposing `data/{name}.json`
//! - `GET` a component's JSON document, `PUT` a replacement
//! - Treat any non-2xx status as a failure
//!
//! ## Dependency rule
//! Depends on `homepanel-app` (for the port trait) and `homepanel-domain`
//! (for names and errors). reqwest types never cross the port boundary.

pub mod error;
pub mod store;

pub use error::HttpStoreError;
pub use store::HttpStateStore;
