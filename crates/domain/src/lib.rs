//! # roomcast-domain
//!
//! Pure domain model for roomcast, a driver for multi-room audio playback.
//!
//! ## Responsibilities
//! - Foundational types: run identifiers, error conventions, timestamps
//! - Define **backends** (continuous output control vs. discrete shortcuts)
//! - Define **automation documents** (ordered steps plus defaults) and the
//!   **run reports** produced for them
//! - Define the **configuration document** and its dotted-path accessor
//! - Merge configuration and document **defaults**
//! - Contain all invariant enforcement and token coercion
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod automation;
pub mod backend;
pub mod config;
pub mod defaults;
pub mod duration;
pub mod playlist;
pub mod volume;
