//! # Argument partitioning.
//!
//! A flat argument list is cut at every [`DELIMITER`] token:
//!
//! ```text
//! a -flag -- b -- c d
//! └──┬──┘    │    └┬┘
//!  prefix  seg 1  seg 2
//!
//! instance 0: a -flag
//! instance 1: a -flag b
//! instance 2: a -flag c d
//! ```
//!
//! ## Rules
//! - Only an argument that is exactly `--` is a delimiter (`"a -- b"` is one argument).
//! - `k` delimiters always give `k + 1` segments and `k + 1` instances.
//! - The first segment is the global prefix; instance 0 runs with the prefix alone.
//! - With no delimiter the whole input is the single instance's argument list.

/// Token separating instance argument lists.
pub const DELIMITER: &str = "--";

/// Splits `args` into raw segments at every [`DELIMITER`].
///
/// Leading, trailing and consecutive delimiters produce empty segments, so
/// joining the segments back with `--` reproduces the input.
pub fn split_segments<S: AsRef<str>>(args: &[S]) -> Vec<Vec<String>> {
    let mut segments = vec![Vec::new()];
    for arg in args {
        let arg = arg.as_ref();
        if arg == DELIMITER {
            segments.push(Vec::new());
        } else if let Some(last) = segments.last_mut() {
            last.push(arg.to_owned());
        }
    }
    segments
}

/// Builds the final argument list of every instance.
///
/// Instance 0 gets the global prefix, instance `j > 0` gets
/// `prefix ++ segment[j]`. Never fails and never returns an empty list.
pub fn partition<S: AsRef<str>>(args: &[S]) -> Vec<Vec<String>> {
    let mut segments = split_segments(args).into_iter();
    let prefix = segments.next().unwrap_or_default();

    let mut instances = vec![prefix.clone()];
    instances.extend(segments.map(|suffix| {
        let mut args = Vec::with_capacity(prefix.len() + suffix.len());
        args.extend(prefix.iter().cloned());
        args.extend(suffix);
        args
    }));
    instances
}
