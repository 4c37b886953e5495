//! Runtime events.
//!
//! This module holds the event **data model** published by instances and the
//! group to the configured log sink.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//!
//! ## Quick reference
//! - **Publishers**: `core::runner::run_once`, `Instance::run`, `Group::run`,
//!   the binary's signal handler.
//! - **Consumers**: any [`Subscribe`](crate::Subscribe) sink; see `subscribers/`.

mod event;

pub use event::{Event, EventKind};
