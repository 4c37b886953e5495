//! # Log sink trait.
//!
//! Provides [`Subscribe`] the extension point every lifecycle [`Event`] is handed to.
//!
//! ## Rules
//! - One sink is shared by every instance of a group ([`SinkRef`]).
//! - Instances call [`Subscribe::on_event`] inline, from their own tokio task,
//!   so implementations must be safe for concurrent callers and should return quickly.
//! - Events from one instance arrive in order; events from different instances
//!   interleave (use [`Event::seq`] to order them globally).
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use async_trait::async_trait;
//! use cmdgroup::{Event, EventKind, Subscribe};
//!
//! #[derive(Default)]
//! struct RestartCounter(AtomicUsize);
//!
//! #[async_trait]
//! impl Subscribe for RestartCounter {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::RestartScheduled) {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "restart-counter" }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::events::Event;

/// Shared handle to a log sink.
pub type SinkRef = Arc<dyn Subscribe>;

/// Receiver of runtime events.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    async fn on_event(&self, event: &Event);

    /// Returns the sink name used in diagnostics.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
