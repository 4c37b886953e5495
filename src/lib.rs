//! # cmdgroup
//!
//! **cmdgroup** runs several instances of one external command, each with its
//! own arguments, as a single supervised group.
//!
//! Some init systems (appliance and embedded ones in particular) accept one
//! configuration entry per installed command. `cmdgroup` fans that one entry
//! out into N child processes, restarts the ones you ask it to, and stops all
//! of them together.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   command + GroupConfig { args, watch, sink, grace, restart_delay }
//!            │
//!            ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Group::new                                                       │
//! │  - lookup(command)          (absolute executable path)            │
//! │  - partition(args)          (global prefix ++ per-instance args)  │
//! │  - resolve_watch(watch, N)  (indices restarted after exit)        │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  Instance 0  │   │  Instance 1  │   │  Instance N  │
//!     │(restart loop)│   │(restart loop)│   │(restart loop)│
//!     └┬─────────────┘   └┬─────────────┘   └┬─────────────┘
//!      │ Publishes        │                  │
//!      │ - Starting       │                  │
//!      │ - Started        │                  │
//!      │ - Exited         │                  │
//!      │ - RestartSched.  │                  │
//!      ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │              Sink (Arc<dyn Subscribe>, e.g. LogWriter)            │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Group::run(ctx) ──► one tokio task per Instance ──► Instance::run(group ctx)
//!
//! loop {
//!   ├─► spawn child (own process group, inherited env/stdout/stderr)
//!   │       └─ spawn error ─► StartFailed, exit (never retried)
//!   ├─► wait for exit   ◄── ctx cancelled: SIGTERM to group, grace, SIGKILL
//!   ├─► unwatched ─► return exit result
//!   └─► watched   ─► sleep(restart_delay) (cancellable), continue
//! }
//!
//! join all ─► classify() each result ─► RunError::Failed (index order) or Ok
//!
//! Unwatched instance fails ─► group ctx cancelled ─► every sibling stops.
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / functions                       |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Supervision**   | Run, restart and stop instances together.                    | [`Group`], [`Instance`]                     |
//! | **Arguments**     | Split one argument list into per-instance lists.             | [`partition`], [`resolve_watch`]            |
//! | **Cancellation**  | Shared cancellation that remembers why it happened.         | [`CancelContext`], [`CancelCause`]          |
//! | **Errors**        | Typed errors and the expected-exit filter.                   | [`BuildError`], [`RunError`], [`classify`]  |
//! | **Logging**       | Hook into lifecycle events.                                  | [`Subscribe`], [`LogWriter`], [`Silent`]    |
//! | **Configuration** | Explicit settings with documented defaults.                  | [`GroupConfig`]                             |
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use cmdgroup::{CancelContext, Group, GroupConfig, LogWriter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // `echo hello` runs once; `echo hello world` runs every second until Ctrl-C.
//!     let cfg = GroupConfig {
//!         args: vec!["hello".into(), "--".into(), "world".into()],
//!         watch: "1".into(),
//!         sink: Some(Arc::new(LogWriter::new())),
//!         ..GroupConfig::default()
//!     };
//!     let group = Group::new("echo", cfg)?;
//!
//!     let ctx = CancelContext::new();
//!     cmdgroup::cancel_on_shutdown(ctx.clone(), Arc::new(LogWriter::new()));
//!     group.run(&ctx).await?;
//!     Ok(())
//! }
//! ```
pub mod args;
pub mod cli;
mod config;
mod core;
mod error;
mod events;
pub mod process;
mod subscribers;

// ---- Public re-exports ----

pub use args::{DELIMITER, WatchError, partition, resolve_watch, split_segments};
pub use config::{DEFAULT_GRACE, DEFAULT_RESTART_DELAY, GroupConfig};
pub use crate::core::{
    CancelCause, CancelContext, Group, Instance, cancel_on_shutdown, classify, classify_result,
    wait_for_shutdown_signal,
};
pub use error::{BuildError, InstanceError, InstanceFailure, RunError};
pub use events::{Event, EventKind};
pub use subscribers::{LogWriter, Silent, SinkRef, Subscribe};
