//! # Host shutdown signals.
//!
//! The init system stops `cmdgroup` the same way it stops any other service,
//! so a signal sent to the supervisor must reach every instance.
//! [`cancel_on_shutdown`] turns the first such signal into a cancelled
//! [`CancelContext`]; each running child then gets its own SIGTERM and grace
//! period.
//!
//! Unix listens for `SIGINT`, `SIGTERM` and `SIGQUIT`. Other platforms only
//! see Ctrl-C.

use tokio::task::JoinHandle;

use crate::{
    core::{CancelCause, CancelContext},
    events::{Event, EventKind},
    subscribers::SinkRef,
};

/// Resolves once the supervisor itself is asked to stop.
///
/// Fails only when the listeners cannot be registered.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = interrupt.recv() => {}
        _ = terminate.recv() => {}
        _ = quit.recv() => {}
    }
    Ok(())
}

/// Resolves on Ctrl-C.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

/// Spawns a listener that cancels `ctx` with [`CancelCause::ShutdownSignal`]
/// on the first termination signal.
///
/// The listener exits on its own once `ctx` is cancelled for another reason.
/// If signal registration fails the context is left alone.
pub fn cancel_on_shutdown(ctx: CancelContext, sink: SinkRef) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            res = wait_for_shutdown_signal() => {
                if let Err(e) = res {
                    tracing::warn!(error = %e, "signal handler not installed");
                    return;
                }
                sink.on_event(&Event::new(EventKind::ShutdownRequested)).await;
                ctx.cancel(CancelCause::ShutdownSignal);
            }
            _ = ctx.cancelled() => {}
        }
    })
}
