//! # roomcast-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `PlaybackBackend` — the music player, its outputs and OS shortcuts
//!   - `ConfigStore` — load & save the configuration document
//! - Define **driving/inbound ports** as use-case structs:
//!   - `StepExecutor` — execute one automation step
//!   - `AutomationEngine` — run or plan a whole automation, fail-fast
//!   - `ConfigService` — get, set, unset and alias resolution
//! - Orchestrate domain objects without knowing *how* playback or IO works
//!
//! ## Dependency rule
//! Depends on `roomcast-domain` only (plus `tokio` timers for `wait` steps).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod automation_engine;
pub mod discrete;
pub mod ports;
pub mod services;
pub mod step_executor;

#[cfg(test)]
mod test_support;
