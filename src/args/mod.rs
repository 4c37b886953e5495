//! # Command-line shaping for instances.
//!
//! Everything here is pure: no I/O, no processes.
//!
//! ## Contents
//! - [`partition`] splits a flat argument list into per-instance argument lists
//! - [`resolve_watch`] turns a watch specification into instance indices
//!
//! ## Quick wiring
//! ```text
//! GroupConfig { args, watch }
//!      └─► Group::new uses:
//!           - partition(args)               → one Vec<String> per instance
//!           - resolve_watch(watch, count)   → indices with restart enabled
//! ```

mod partition;
mod watch;

pub use partition::{DELIMITER, partition, split_segments};
pub use watch::{WatchError, resolve_watch};
