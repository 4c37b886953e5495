//! Runtime core: supervision engine.
//!
//! The public API from this module is [`Group`], [`Instance`], the cancellation
//! context and the exit classifier.
//!
//! Internal modules:
//! - [`context`]: cause-carrying cancellation shared by every worker;
//! - [`classify`]: expected-termination filter;
//! - [`runner`]: executes one attempt (spawn, wait, terminate, kill);
//! - [`instance`]: runs a single instance with its restart loop;
//! - [`group`]: spawns instances, joins results, cross-instance cancellation;
//! - [`shutdown`]: cross-platform shutdown signal handling.

mod classify;
mod context;
mod group;
mod instance;
mod runner;
mod shutdown;

pub use classify::{classify, classify_result};
pub use context::{CancelCause, CancelContext};
pub use group::Group;
pub use instance::Instance;
pub use shutdown::{cancel_on_shutdown, wait_for_shutdown_signal};
