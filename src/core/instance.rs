//! # Instance: one supervised command line.
//!
//! Supervises one child process at a time:
//! - starts it via [`run_once`],
//! - restarts it after any exit when watched,
//! - stops at cancellation.
//!
//! ## Architecture
//! ```text
//! Group ──► Instance::run(ctx)
//!
//! loop {
//!   ├─► ctx cancelled?          → Canceled{cause}
//!   ├─► run_once() ─────► spawn + wait (one attempt)
//!   │       ▼
//!   │     Ok/Err
//!   ├─► not watched             → return result
//!   ├─► Err(Start)              → return (a binary that cannot start will not start later)
//!   └─► watched:
//!        ├─► publish RestartScheduled
//!        └─► sleep(restart_delay) or ctx cancelled → RestartAborted, Canceled{cause}
//! }
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially** (never two children for one instance).
//! - A watched instance runs until its context is cancelled or it cannot start.

use std::{path::Path, path::PathBuf, time::Duration};

use tokio::{select, time};

use crate::{
    core::{CancelCause, CancelContext, runner::run_once},
    error::InstanceError,
    events::{Event, EventKind},
    subscribers::SinkRef,
};

/// One execution slot of the group's command with a fixed argument list.
pub struct Instance {
    pub(crate) index: usize,
    pub(crate) path: PathBuf,
    pub(crate) args: Vec<String>,
    pub(crate) watch: bool,
    pub(crate) sink: SinkRef,
    pub(crate) grace: Duration,
    pub(crate) restart_delay: Duration,
    command_line: String,
}

impl Instance {
    pub(crate) fn new(
        index: usize,
        path: PathBuf,
        args: Vec<String>,
        watch: bool,
        sink: SinkRef,
        grace: Duration,
        restart_delay: Duration,
    ) -> Self {
        let command_line = std::iter::once(path.display().to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            index,
            path,
            args,
            watch,
            sink,
            grace,
            restart_delay,
            command_line,
        }
    }

    /// Position of the instance in its group.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Absolute path of the executable.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Arguments passed to the executable (global prefix included).
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Whether the instance is restarted after it exits.
    pub fn is_watched(&self) -> bool {
        self.watch
    }

    /// Human-readable command line, used in logs.
    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// Runs the instance until it ends for good.
    ///
    /// ### Exit conditions
    /// - unwatched: after the first attempt, with that attempt's result;
    /// - start failure: immediately, in every mode;
    /// - `ctx` cancelled before a start or during the restart delay:
    ///   [`InstanceError::Canceled`] carrying the cause.
    ///
    /// A cancellation that lands while the child runs is handled by the
    /// attempt itself (terminate, grace, kill); a watched instance then stops
    /// at the next restart decision.
    pub async fn run(&self, ctx: &CancelContext) -> Result<(), InstanceError> {
        loop {
            if ctx.is_cancelled() {
                return Err(canceled(ctx));
            }

            let res = run_once(self, ctx).await;

            if !self.watch {
                return res;
            }
            if let Err(e @ InstanceError::Start { .. }) = res {
                return Err(e);
            }

            if ctx.is_cancelled() {
                return Err(self.abort_restart(ctx).await);
            }

            self.publish(Event::new(EventKind::RestartScheduled).with_delay(self.restart_delay))
                .await;

            let sleep = time::sleep(self.restart_delay);
            tokio::pin!(sleep);
            select! {
                _ = &mut sleep => {}
                _ = ctx.cancelled() => {
                    return Err(self.abort_restart(ctx).await);
                }
            }
        }
    }

    async fn abort_restart(&self, ctx: &CancelContext) -> InstanceError {
        let err = canceled(ctx);
        if let InstanceError::Canceled { cause } = &err {
            self.publish(Event::new(EventKind::RestartAborted).with_reason(cause.to_string()))
                .await;
        }
        err
    }

    /// Publishes `ev` tagged with this instance's index and command line.
    pub(crate) async fn publish(&self, ev: Event) {
        let ev = ev
            .with_instance(self.index)
            .with_command(self.command_line.as_str());
        self.sink.on_event(&ev).await;
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("index", &self.index)
            .field("path", &self.path)
            .field("args", &self.args)
            .field("watch", &self.watch)
            .finish_non_exhaustive()
    }
}

fn canceled(ctx: &CancelContext) -> InstanceError {
    InstanceError::Canceled {
        cause: ctx.cause().unwrap_or(CancelCause::Requested),
    }
}
