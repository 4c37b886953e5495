//! # LogWriter - structured event logger
//!
//! Turns every [`Event`] into one `tracing` record. Install a `tracing`
//! subscriber (the binary uses `tracing_subscriber::fmt`) to see the output.
//!
//! ## Example output
//! ```text
//! INFO starting instance=0 cmd="/bin/echo a -flag"
//! INFO started instance=0 cmd="/bin/echo a -flag" pid=4242
//! INFO exited instance=0 cmd="/bin/echo a -flag" pid=4242
//! WARN exited instance=1 cmd="/bin/false" pid=4243 reason="exit status: 1"
//! INFO exited instance=2 cmd="/bin/sleep 30" pid=4244 reason="signal: SIGTERM"
//! INFO restarting instance=1 cmd="/bin/false" delay_ms=1000
//! WARN stopping group instance=0 reason="exit status: 1"
//! ```

use async_trait::async_trait;
use tracing::{Level, error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event logger backed by `tracing`.
#[derive(Default, Debug, Clone, Copy)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let instance = e.instance;
        let cmd = e.command.as_deref();
        let pid = e.pid;
        let reason = e.reason.as_deref();

        match e.kind {
            EventKind::Starting => {
                info!(?instance, cmd, "starting");
            }
            EventKind::Started => {
                info!(?instance, cmd, ?pid, "started");
            }
            EventKind::StartFailed => {
                error!(?instance, cmd, reason, "start command");
            }
            EventKind::Exited => {
                if exit_level(e) == Level::WARN {
                    warn!(?instance, cmd, ?pid, reason, "exited");
                } else {
                    info!(?instance, cmd, ?pid, reason, "exited");
                }
            }
            EventKind::RestartScheduled => {
                info!(?instance, cmd, delay_ms = ?e.delay_ms, "restarting");
            }
            EventKind::RestartAborted => {
                info!(?instance, cmd, reason, "not restarting");
            }
            EventKind::TerminationRequested => {
                info!(?instance, cmd, ?pid, reason, "terminating");
            }
            EventKind::ForceKilled => {
                warn!(?instance, cmd, ?pid, grace_ms = ?e.delay_ms, "killed after grace period");
            }
            EventKind::GroupCancelled => {
                warn!(?instance, reason, "stopping group");
            }
            EventKind::ShutdownRequested => {
                info!(reason, "shutdown requested");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}

/// Exits with a reason are warnings unless we asked the child to stop.
fn exit_level(e: &Event) -> Level {
    if e.reason.is_some() && !e.expected {
        Level::WARN
    } else {
        Level::INFO
    }
}
