//! # Lifecycle events emitted by instances and the group.
//!
//! The [`EventKind`] enum classifies event types across two categories:
//! - **Instance events**: one child process going through start, exit and restart
//! - **Group events**: cancellation decisions that affect every instance
//!
//! The [`Event`] struct carries the metadata a log line needs: instance index,
//! command line, pid, a human-readable reason and the restart delay.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events from several instances interleave.
//!
//! ## Example
//! ```rust
//! use cmdgroup::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::Exited)
//!     .with_instance(1)
//!     .with_pid(4242)
//!     .with_reason("exit status: 1");
//!
//! assert_eq!(ev.kind, EventKind::Exited);
//! assert_eq!(ev.instance, Some(1));
//! assert_eq!(ev.reason.as_deref(), Some("exit status: 1"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Instance lifecycle events ===
    /// A child process is about to be spawned.
    ///
    /// Sets:
    /// - `instance`: instance index
    /// - `command`: full command line
    Starting,

    /// The child process is running.
    ///
    /// Sets:
    /// - `instance`, `command`
    /// - `pid`: child process id
    Started,

    /// The child process could not be spawned. Terminal for the instance.
    ///
    /// Sets:
    /// - `instance`, `command`
    /// - `reason`: spawn error
    StartFailed,

    /// The child process exited.
    ///
    /// Sets:
    /// - `instance`, `command`, `pid`
    /// - `reason`: exit description (absent on success)
    /// - `expected`: the child stopped on our own termination request
    Exited,

    /// A watched instance will be started again.
    ///
    /// Sets:
    /// - `instance`, `command`
    /// - `delay_ms`: delay before the next start
    RestartScheduled,

    /// A watched instance will not be started again because its context was cancelled.
    ///
    /// Sets:
    /// - `instance`, `command`
    /// - `reason`: cancellation cause
    RestartAborted,

    /// Cooperative termination was sent to the child's process group.
    ///
    /// Sets:
    /// - `instance`, `command`, `pid`
    /// - `reason`: cancellation cause
    TerminationRequested,

    /// The child outlived the grace period and was killed.
    ///
    /// Sets:
    /// - `instance`, `command`, `pid`
    /// - `delay_ms`: the grace period that elapsed
    ForceKilled,

    // === Group events ===
    /// An unwatched instance failed; every other instance is being stopped.
    ///
    /// Sets:
    /// - `instance`: index of the failed instance
    /// - `reason`: the failure
    GroupCancelled,

    /// Shutdown requested from outside (OS signal observed).
    ShutdownRequested,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Index of the instance the event is about.
    pub instance: Option<usize>,
    /// Command line of the instance (path and arguments).
    pub command: Option<Arc<str>>,
    /// Process id of the running child.
    pub pid: Option<u32>,
    /// Human-readable reason (exit status, errors, cancellation cause).
    pub reason: Option<Arc<str>>,
    /// Restart delay or grace period in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// The outcome is an expected one and not a failure.
    pub expected: bool,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            instance: None,
            command: None,
            pid: None,
            reason: None,
            delay_ms: None,
            expected: false,
        }
    }

    /// Attaches an instance index.
    #[inline]
    pub fn with_instance(mut self, index: usize) -> Self {
        self.instance = Some(index);
        self
    }

    /// Attaches a command line.
    #[inline]
    pub fn with_command(mut self, command: impl Into<Arc<str>>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Attaches a process id.
    #[inline]
    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Marks the outcome as expected.
    #[inline]
    pub fn with_expected(mut self, expected: bool) -> Self {
        self.expected = expected;
        self
    }

    /// Returns the delay as a [`Duration`], if set.
    #[inline]
    pub fn delay(&self) -> Option<Duration> {
        self.delay_ms.map(|ms| Duration::from_millis(u64::from(ms)))
    }
}
