//! # Log sinks.
//!
//! This module provides the [`Subscribe`] trait and built-in implementations
//! for handling runtime events published by instances and the group.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Instance ── on_event(&Event) ──► SinkRef (Arc<dyn Subscribe>)
//!   Group    ──┘                          │
//!                                    ┌────┴────┬─────────┐
//!                                    ▼         ▼         ▼
//!                                LogWriter   Silent    Custom
//! ```
//!
//! - [`LogWriter`] emits `tracing` records with structured fields.
//! - [`Silent`] discards everything (the default sink).

mod log;
mod silent;
mod subscriber;

pub use log::LogWriter;
pub use silent::Silent;
pub use subscriber::{SinkRef, Subscribe};
