//! # Exit classification.
//!
//! Separates the noise of a requested shutdown from real failures:
//!
//! ```text
//! None                          → None
//! Canceled { .. }               → None   (supervisor asked it to stop)
//! Signaled { TERMINATION }      → None   (exited on our SIGTERM)
//! Signaled { other }            → error  (e.g. SIGKILL after grace)
//! Exited { code }               → error
//! Start / Wait / Panicked       → error
//! ```

use crate::error::InstanceError;

/// Filters out expected termination outcomes, passing real failures through unchanged.
pub fn classify(err: Option<InstanceError>) -> Option<InstanceError> {
    match err {
        None => None,
        Some(InstanceError::Canceled { .. }) => None,
        Some(e) if e.is_termination() => None,
        Some(e) => Some(e),
    }
}

/// Shorthand for classifying a run result.
pub fn classify_result(res: Result<(), InstanceError>) -> Option<InstanceError> {
    classify(res.err())
}
