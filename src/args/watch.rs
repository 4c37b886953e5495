//! # Watch specification.
//!
//! Selects which instances are restarted after they exit.
//!
//! ```text
//! ""  | "none"   → no instance
//! "all"         → every instance
//! "0, 2"        → instances 0 and 2
//! ",2" | "0,,2" → empty tokens are skipped
//! ```

use thiserror::Error;

/// Invalid watch specification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WatchError {
    /// A token is not an integer.
    #[error("parse int {token:?}: {reason}")]
    Parse {
        /// The offending token (trimmed).
        token: String,
        /// Parser message.
        reason: String,
    },

    /// An index does not name an instance.
    #[error("index out of range: {index} (instances: {count})")]
    OutOfRange {
        /// The parsed index.
        index: i64,
        /// Number of instances in the group.
        count: usize,
    },
}

impl WatchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            WatchError::Parse { .. } => "watch_parse",
            WatchError::OutOfRange { .. } => "watch_out_of_range",
        }
    }
}

/// Resolves `spec` into instance indices for a group of `count` instances.
///
/// Indices keep the order they were written in. Every token is
/// validated before anything is returned.
pub fn resolve_watch(spec: &str, count: usize) -> Result<Vec<usize>, WatchError> {
    match spec {
        "" | "none" => return Ok(Vec::new()),
        "all" => return Ok((0..count).collect()),
        _ => {}
    }

    let mut indices = Vec::new();
    for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let index: i64 = token.parse().map_err(|e: std::num::ParseIntError| WatchError::Parse {
            token: token.to_owned(),
            reason: e.to_string(),
        })?;

        match usize::try_from(index) {
            Ok(i) if i < count => indices.push(i),
            _ => return Err(WatchError::OutOfRange { index, count }),
        }
    }
    Ok(indices)
}
