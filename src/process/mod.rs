//! # Platform-facing process glue.
//!
//! Keeps the supervision loop free of OS details. The core only needs:
//! - [`lookup`]: resolve a command name to an absolute executable path;
//! - [`decode_exit_status`]: success / exit code / terminating signal;
//! - [`request_termination`]: polite stop for a child **and its descendants**;
//! - [`force_kill`]: the escalation after the grace period.
//!
//! ## Unix
//! Children are started in their own process group, so signals go to the
//! negated group id (`killpg`). If the group cannot be resolved the direct
//! child is signalled instead.
//!
//! ## Other platforms
//! There are no process groups; both termination paths kill the direct child.

use std::{io, process::ExitStatus};

use tokio::process::Child;

mod lookup;
#[cfg(unix)]
mod unix;

pub use lookup::{LookupError, lookup};

/// Signal number used for cooperative termination (SIGTERM).
#[cfg(unix)]
pub const TERMINATION_SIGNAL: i32 = nix::libc::SIGTERM;
/// Signal number used for cooperative termination (SIGTERM).
#[cfg(not(unix))]
pub const TERMINATION_SIGNAL: i32 = 15;

/// Decoded result of a finished child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Exited with status zero.
    Success,
    /// Exited with a non-zero status.
    Code(i32),
    /// Terminated by a signal.
    Signal(i32),
}

/// Decodes a raw [`ExitStatus`].
pub fn decode_exit_status(status: ExitStatus) -> ExitOutcome {
    if status.success() {
        return ExitOutcome::Success;
    }
    if let Some(code) = status.code() {
        return ExitOutcome::Code(code);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return ExitOutcome::Signal(signal);
        }
    }
    ExitOutcome::Code(-1)
}

/// Asks the child's whole process group to terminate.
///
/// A child that was already reaped is left alone.
pub fn request_termination(child: &mut Child) -> io::Result<()> {
    #[cfg(unix)]
    {
        match child.id() {
            Some(pid) => unix::signal_group(pid, nix::sys::signal::Signal::SIGTERM),
            None => Ok(()),
        }
    }
    #[cfg(not(unix))]
    {
        child.start_kill()
    }
}

/// Kills the child's process group without giving it a chance to clean up.
pub fn force_kill(child: &mut Child) -> io::Result<()> {
    #[cfg(unix)]
    {
        let killed = child
            .id()
            .map(|pid| unix::signal_group(pid, nix::sys::signal::Signal::SIGKILL).is_ok())
            .unwrap_or(false);
        if killed {
            return Ok(());
        }
    }
    child.start_kill()
}
