//! # homepanel-domain
//!
//! Pure domain model for the homepanel dashboard.
//!
//! ## Responsibilities
//! - Foundational types: component names, kinds, error conventions
//! - Define the **state** each component owns (heating setpoint, lighting switch)
//! - Define the **JSON payloads** exchanged with the per-component resource
//! - Define **state-change announcements** broadcast on every mutation
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod name;

pub mod announcement;
pub mod component;
pub mod payload;
pub mod temperature;
