//! # Run a single attempt of an instance.
//!
//! Spawns one child process, waits for it, and turns its exit into a result.
//!
//! ## Event flow
//!
//! ```text
//! Success / failure:
//!   Starting → spawn() → Started{pid} → wait() → Exited{reason?}
//!
//! Spawn error:
//!   Starting → spawn() fails → StartFailed
//!
//! Cancellation while running:
//!   ... → Started → ctx.cancelled()
//!               → SIGTERM to process group → TerminationRequested
//!               → wait up to grace ──► exited in time → Exited
//!                                  └─► still running → SIGKILL → ForceKilled → Exited
//! ```
//!
//! ## Rules
//! - Exactly one child per call; the child is reaped before returning.
//! - The child gets its own process group so termination reaches its descendants.
//! - The child inherits the environment, stdout and stderr; stdin is `/dev/null`.

use std::{io, process::ExitStatus, process::Stdio};

use tokio::{
    process::{Child, Command},
    time,
};

use crate::{
    core::{CancelContext, Instance},
    error::InstanceError,
    events::{Event, EventKind},
    process::{self, ExitOutcome},
};

/// Executes one start/wait cycle of `inst`.
///
/// ### Cancellation semantics
/// If `ctx` fires while the child is running, its process group receives the
/// termination signal and gets `inst.grace` to exit before being killed. The
/// resulting exit (usually `Signaled { SIGTERM }`) is returned as-is; callers
/// decide through [`classify`](crate::classify) whether it matters.
pub(crate) async fn run_once(inst: &Instance, ctx: &CancelContext) -> Result<(), InstanceError> {
    inst.publish(Event::new(EventKind::Starting)).await;

    let mut child = match build_command(inst).spawn() {
        Ok(child) => child,
        Err(source) => {
            inst.publish(Event::new(EventKind::StartFailed).with_reason(source.to_string()))
                .await;
            return Err(InstanceError::Start {
                path: inst.path.clone(),
                source,
            });
        }
    };
    let pid = child.id();
    inst.publish(with_pid(Event::new(EventKind::Started), pid)).await;

    let waited = tokio::select! {
        res = child.wait() => Some(res),
        _ = ctx.cancelled() => None,
    };
    let status = match waited {
        Some(res) => res,
        None => stop(inst, &mut child, ctx, pid).await,
    };

    let res = match status {
        Ok(status) => into_result(process::decode_exit_status(status)),
        Err(source) => Err(InstanceError::Wait { source }),
    };

    let mut exited = with_pid(Event::new(EventKind::Exited), pid);
    if let Err(e) = &res {
        exited = exited
            .with_reason(e.to_string())
            .with_expected(e.is_termination());
    }
    inst.publish(exited).await;

    res
}

/// Builds a fresh command for one attempt.
fn build_command(inst: &Instance) -> Command {
    let mut cmd = Command::new(&inst.path);
    cmd.args(&inst.args)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);
    #[cfg(unix)]
    cmd.process_group(0);
    cmd
}

/// Terminate, wait up to the grace period, then kill.
async fn stop(
    inst: &Instance,
    child: &mut Child,
    ctx: &CancelContext,
    pid: Option<u32>,
) -> io::Result<ExitStatus> {
    let mut requested = with_pid(Event::new(EventKind::TerminationRequested), pid);
    if let Some(cause) = ctx.cause() {
        requested = requested.with_reason(cause.to_string());
    }
    inst.publish(requested).await;

    // Fails only if the child is already gone; wait() below reports that.
    let _ = process::request_termination(child);

    match time::timeout(inst.grace, child.wait()).await {
        Ok(res) => res,
        Err(_elapsed) => {
            inst.publish(
                with_pid(Event::new(EventKind::ForceKilled), pid).with_delay(inst.grace),
            )
            .await;
            let _ = process::force_kill(child);
            child.wait().await
        }
    }
}

fn into_result(outcome: ExitOutcome) -> Result<(), InstanceError> {
    match outcome {
        ExitOutcome::Success => Ok(()),
        ExitOutcome::Code(code) => Err(InstanceError::Exited { code }),
        ExitOutcome::Signal(signal) => Err(InstanceError::Signaled { signal }),
    }
}

fn with_pid(ev: Event, pid: Option<u32>) -> Event {
    match pid {
        Some(pid) => ev.with_pid(pid),
        None => ev,
    }
}
