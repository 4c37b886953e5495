//! Error types used by cmdgroup.
//!
//! This module defines the error enums of the three phases of a group's life:
//!
//! - [`BuildError`]: the group could not be constructed; nothing was started.
//! - [`InstanceError`]: one instance's run ended abnormally.
//! - [`RunError`]: the aggregate returned by [`Group::run`](crate::Group::run).
//!
//! All of them provide `as_label` for logging/metrics.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

use crate::args::WatchError;
use crate::core::CancelCause;
use crate::process::{LookupError, TERMINATION_SIGNAL};

/// # Errors raised while constructing a group.
///
/// All of them are fatal before any child process is started.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BuildError {
    /// The command cannot be resolved to an executable.
    #[error("look path {command:?}: {source}")]
    CommandNotFound {
        /// Command name as given.
        command: String,
        /// Why the lookup failed.
        #[source]
        source: LookupError,
    },

    /// The watch specification is invalid.
    #[error("parse watch: {0}")]
    Watch(#[from] WatchError),

    /// No log sink was configured.
    #[error("log sink is not set")]
    MissingSink,
}

impl BuildError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use cmdgroup::BuildError;
    ///
    /// assert_eq!(BuildError::MissingSink.as_label(), "build_missing_sink");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BuildError::CommandNotFound { .. } => "build_command_not_found",
            BuildError::Watch(_) => "build_invalid_watch",
            BuildError::MissingSink => "build_missing_sink",
        }
    }
}

/// # Errors produced by one instance run.
///
/// Not every variant is a failure: [`InstanceError::Canceled`] and a
/// [`InstanceError::Signaled`] with the termination signal are the normal
/// outcome of a requested stop. See [`classify`](crate::classify).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum InstanceError {
    /// The child process could not be spawned. Never retried.
    #[error("failed to start {path:?}: {source}")]
    Start {
        /// Executable that was spawned.
        path: PathBuf,
        /// Spawn error.
        #[source]
        source: io::Error,
    },

    /// The child exited with a non-zero status.
    #[error("exit status: {code}")]
    Exited {
        /// Exit code.
        code: i32,
    },

    /// The child was terminated by a signal.
    #[error("signal: {}", signal_name(.signal))]
    Signaled {
        /// Signal number.
        signal: i32,
    },

    /// Waiting for or signalling the child failed.
    #[error("wait: {source}")]
    Wait {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The instance stopped because its context was cancelled.
    #[error("context canceled: {cause}")]
    Canceled {
        /// Why the context was cancelled.
        cause: CancelCause,
    },

    /// The instance worker panicked.
    #[error("worker panicked: {message}")]
    Panicked {
        /// Panic payload, if it was a string.
        message: String,
    },
}

impl InstanceError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use cmdgroup::InstanceError;
    ///
    /// assert_eq!(InstanceError::Exited { code: 1 }.as_label(), "instance_exited");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            InstanceError::Start { .. } => "instance_start_failed",
            InstanceError::Exited { .. } => "instance_exited",
            InstanceError::Signaled { .. } => "instance_signaled",
            InstanceError::Wait { .. } => "instance_wait_failed",
            InstanceError::Canceled { .. } => "instance_canceled",
            InstanceError::Panicked { .. } => "instance_panicked",
        }
    }

    /// Returns `true` if the child was stopped by the cooperative termination signal.
    pub fn is_termination(&self) -> bool {
        matches!(self, InstanceError::Signaled { signal } if *signal == TERMINATION_SIGNAL)
    }
}

/// One genuinely failed instance inside a [`RunError`].
#[derive(Debug)]
pub struct InstanceFailure {
    /// Index of the instance in the group.
    pub index: usize,
    /// The classified failure.
    pub error: InstanceError,
}

impl fmt::Display for InstanceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instance {}: {}", self.index, self.error)
    }
}

/// # Aggregate outcome of [`Group::run`](crate::Group::run).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RunError {
    /// At least one instance failed. Entries are in instance order.
    #[error("{}", join_lines(.failures))]
    Failed {
        /// Every instance that genuinely failed.
        failures: Vec<InstanceFailure>,
    },
}

impl RunError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RunError::Failed { .. } => "run_failed",
        }
    }

    /// Returns the failed instances, in index order.
    pub fn failures(&self) -> &[InstanceFailure] {
        match self {
            RunError::Failed { failures } => failures,
        }
    }
}

fn join_lines(failures: &[InstanceFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn signal_name(signal: &i32) -> String {
    #[cfg(unix)]
    {
        if let Ok(sig) = nix::sys::signal::Signal::try_from(*signal) {
            return sig.as_str().to_string();
        }
    }
    signal.to_string()
}
