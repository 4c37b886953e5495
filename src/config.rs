//! # Group configuration.
//!
//! Provides [`GroupConfig`], the settings consumed once by [`Group::new`](crate::Group::new).
//!
//! ## Defaults
//! - `args = []` → one instance without arguments
//! - `watch = "none"` → nothing is restarted
//! - `sink = Some(Silent)` → events are discarded
//! - `grace = 10s` → time a child gets between SIGTERM and SIGKILL
//! - `restart_delay = 1s` → pause before a watched instance starts again

use std::{sync::Arc, time::Duration};

use crate::subscribers::{Silent, SinkRef};

/// Default grace period between termination request and forced kill.
pub const DEFAULT_GRACE: Duration = Duration::from_secs(10);

/// Default delay before a watched instance is restarted.
pub const DEFAULT_RESTART_DELAY: Duration = Duration::from_secs(1);

/// Settings for building a [`Group`](crate::Group).
///
/// ## Field semantics
/// - `args`: flat argument list; `--` separates instances (see [`partition`](crate::partition))
/// - `watch`: `"none"`, `"all"` or comma-separated instance indices
/// - `sink`: where lifecycle events go; `None` is rejected by `Group::new`
/// - `grace`: maximum wait after SIGTERM before the child's group is killed
/// - `restart_delay`: pause between a watched instance's exit and its next start
#[derive(Clone)]
pub struct GroupConfig {
    /// Raw arguments, split into instances at each `--`.
    pub args: Vec<String>,

    /// Which instances are restarted after they exit.
    pub watch: String,

    /// Log sink shared by the group and all its instances.
    pub sink: Option<SinkRef>,

    /// Grace period for cooperative termination.
    ///
    /// When the group is cancelled:
    /// - each running child's process group receives SIGTERM
    /// - the child gets up to `grace` to exit
    /// - after that it is killed with SIGKILL (reported as a failure)
    pub grace: Duration,

    /// Delay before restarting a watched instance.
    pub restart_delay: Duration,
}

impl GroupConfig {
    /// Returns a config with `args` and defaults for everything else.
    pub fn with_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

impl Default for GroupConfig {
    /// Default configuration:
    ///
    /// - `args = []`
    /// - `watch = "none"`
    /// - `sink = Some(Silent)`
    /// - `grace = 10s`
    /// - `restart_delay = 1s`
    fn default() -> Self {
        Self {
            args: Vec::new(),
            watch: "none".to_string(),
            sink: Some(Arc::new(Silent)),
            grace: DEFAULT_GRACE,
            restart_delay: DEFAULT_RESTART_DELAY,
        }
    }
}

impl std::fmt::Debug for GroupConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupConfig")
            .field("args", &self.args)
            .field("watch", &self.watch)
            .field("sink", &self.sink.as_ref().map(|s| s.name()))
            .field("grace", &self.grace)
            .field("restart_delay", &self.restart_delay)
            .finish()
    }
}
