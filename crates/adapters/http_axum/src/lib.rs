//! # homepanel-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve every component's state document at `/data/{name}.json`
//!   (`GET` reads it, `PUT` replaces it)
//! - Persist documents as pretty-printed JSON files in a data directory
//! - Optionally serve the panel's static assets for every other path
//! - Map domain errors into HTTP status codes with a JSON body
//!
//! ## Dependency rule
//! Depends on `homepanel-app` (for the [`StateStore`] port) and
//! `homepanel-domain` (for names and errors). Never leaks axum types into
//! the domain.
//!
//! [`StateStore`]: homepanel_app::ports::StateStore

#[allow(clippy::missing_errors_doc)]
pub mod api;
pub mod error;
pub mod router;
pub mod state;
pub mod storage;
