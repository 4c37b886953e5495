//! # Command-line front end.
//!
//! ```text
//! cmdgroup [--watch SPEC] [--grace SECS] [--restart-delay SECS] COMMAND [ARGS...]
//! ```
//!
//! Everything from `COMMAND` on is passed through untouched, `--` included,
//! so `cmdgroup echo a -- b -- c` runs `echo a`, `echo a b` and `echo a c`.
//!
//! ## Exit codes
//! | Outcome                                         | Code  |
//! |-------------------------------------------------|-------|
//! | all instances finished without failure          | `0`   |
//! | `--help` / `--version`                          | `0`   |
//! | an instance failed                              | `1`   |
//! | bad flags, missing command, construction error  | `125` |
//!
//! `125` tells the host init system not to restart the supervisor: a bad
//! command line will not get better by retrying.
//!
//! ## Logs
//! Logs go to stderr, filtered by `RUST_LOG` (default `info`). Set
//! `CMDGROUP_LOG_FORMAT=json` for one JSON object per line.

use std::{ffi::OsString, sync::Arc, time::Duration};

use clap::{Parser, error::ErrorKind};
use tracing::error;

use crate::{
    config::{DEFAULT_GRACE, DEFAULT_RESTART_DELAY, GroupConfig},
    core::{CancelContext, Group, cancel_on_shutdown},
    subscribers::{LogWriter, SinkRef},
};

/// Exit code asking the host not to supervise or restart this process.
pub const DO_NOT_SUPERVISE_EXIT_CODE: i32 = 125;

/// Exit code for a run in which at least one instance failed.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Environment variable selecting the log format of the binary.
pub const LOG_FORMAT_ENV: &str = "CMDGROUP_LOG_FORMAT";

/// Log output format of the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// `json` (any case) selects [`LogFormat::Json`]; anything else is text.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }

    /// Reads [`LOG_FORMAT_ENV`].
    pub fn from_env() -> Self {
        Self::parse(std::env::var(LOG_FORMAT_ENV).ok().as_deref())
    }
}

/// Run several instances of one command as a single supervised group.
#[derive(Parser, Debug)]
#[command(name = "cmdgroup", version)]
pub struct Cli {
    /// Instances to restart after they exit: none, all, or 0,1,2,...
    #[arg(long, value_name = "SPEC", default_value = "none")]
    pub watch: String,

    /// Seconds a child gets to exit after SIGTERM before it is killed.
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_GRACE.as_secs())]
    pub grace: u64,

    /// Seconds to wait before restarting a watched instance.
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_RESTART_DELAY.as_secs())]
    pub restart_delay: u64,

    /// Command and arguments; `--` starts the arguments of another instance.
    #[arg(
        value_name = "COMMAND",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

impl Cli {
    /// Splits the parsed flags into a command name and a [`GroupConfig`].
    pub fn into_config(self, sink: SinkRef) -> (String, GroupConfig) {
        let mut words = self.command.into_iter();
        let command = words.next().unwrap_or_default();
        let cfg = GroupConfig {
            args: words.collect(),
            watch: self.watch,
            sink: Some(sink),
            grace: Duration::from_secs(self.grace),
            restart_delay: Duration::from_secs(self.restart_delay),
        };
        (command, cfg)
    }
}

/// Parses `args` (program name first), runs the group and returns the process exit code.
///
/// Host termination signals stop the group gracefully; an interrupted run
/// whose children exit on SIGTERM still ends with `0`.
pub async fn run<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => DO_NOT_SUPERVISE_EXIT_CODE,
            };
        }
    };

    let sink: SinkRef = Arc::new(LogWriter::new());
    let (command, cfg) = cli.into_config(sink.clone());

    let group = match Group::new(&command, cfg) {
        Ok(group) => group,
        Err(e) => {
            error!(error = %e, label = e.as_label(), "creating command group");
            return DO_NOT_SUPERVISE_EXIT_CODE;
        }
    };

    let ctx = CancelContext::new();
    let listener = cancel_on_shutdown(ctx.clone(), sink);
    let res = group.run(&ctx).await;
    listener.abort();

    match res {
        Ok(()) => 0,
        Err(e) => {
            error!(error = %e, label = e.as_label(), "running command group");
            FAILURE_EXIT_CODE
        }
    }
}
