//! # Group: fan-out of instances, fan-in of their results.
//!
//! The [`Group`] owns every [`Instance`] built from one command invocation and
//! runs them concurrently.
//!
//! ## High-level architecture
//! ```text
//! Construction:
//!   Group::new(command, GroupConfig)
//!     ├─► lookup(command)            → absolute path      (BuildError::CommandNotFound)
//!     ├─► partition(args)            → N argument lists
//!     ├─► resolve_watch(watch, N)    → watched indices    (BuildError::Watch)
//!     └─► Instance[0..N]
//!
//! Run:
//!   caller ctx ──► group ctx = ctx.child()
//!                       │
//!       ┌───────────────┼───────────────┐
//!       ▼               ▼               ▼
//!   tokio::spawn    tokio::spawn    tokio::spawn      (all spawned before any await)
//!   Instance 0      Instance 1      Instance N-1
//!       │               │               │
//!   classify()      classify()      classify()
//!       │  unwatched failure ──► group ctx.cancel(InstanceFailed)
//!       ▼               ▼               ▼
//!   join_all ──► slot[0] slot[1] ... slot[N-1] ──► RunError::Failed (index order)
//! ```
//!
//! ## Rules
//! - `run` returns only after every worker has exited.
//! - Each result slot is written by exactly one worker and read after the join.
//! - A watched instance's failure never cancels its siblings.

use futures::future::join_all;
use tokio::task::JoinError;

use crate::{
    args::{partition, resolve_watch},
    config::GroupConfig,
    core::{CancelCause, CancelContext, Instance, classify::classify_result},
    error::{BuildError, InstanceError, InstanceFailure, RunError},
    events::{Event, EventKind},
    process::lookup,
    subscribers::SinkRef,
};

/// A set of instances of one command, supervised together.
pub struct Group {
    instances: Vec<Instance>,
    sink: SinkRef,
}

impl Group {
    /// Builds a group for `command` from `cfg`.
    ///
    /// Fails without starting anything if the command cannot be resolved, the
    /// watch specification is invalid, or no sink is configured.
    ///
    /// # Example
    /// ```no_run
    /// use cmdgroup::{GroupConfig, Group};
    ///
    /// let cfg = GroupConfig {
    ///     args: vec!["a".into(), "-flag".into(), "--".into(), "b".into()],
    ///     watch: "1".into(),
    ///     ..GroupConfig::default()
    /// };
    /// let group = Group::new("echo", cfg)?;
    /// assert_eq!(group.instances().len(), 2);
    /// assert!(group.instances()[1].is_watched());
    /// # Ok::<(), cmdgroup::BuildError>(())
    /// ```
    pub fn new(command: &str, cfg: GroupConfig) -> Result<Self, BuildError> {
        let sink = cfg.sink.ok_or(BuildError::MissingSink)?;

        let path = lookup(command).map_err(|source| BuildError::CommandNotFound {
            command: command.to_owned(),
            source,
        })?;

        let arg_sets = partition(&cfg.args);
        let watched = resolve_watch(&cfg.watch, arg_sets.len())?;

        let instances = arg_sets
            .into_iter()
            .enumerate()
            .map(|(index, args)| {
                Instance::new(
                    index,
                    path.clone(),
                    args,
                    watched.contains(&index),
                    sink.clone(),
                    cfg.grace,
                    cfg.restart_delay,
                )
            })
            .collect();

        Ok(Self { instances, sink })
    }

    /// Instances in invocation order.
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Runs every instance concurrently until all of them are done.
    ///
    /// Returns `Ok(())` when no instance genuinely failed; expected stops
    /// (cancellation, exit on the termination signal) are not failures.
    /// An unwatched instance's failure cancels the rest of the group.
    pub async fn run(self, ctx: &CancelContext) -> Result<(), RunError> {
        let group_ctx = ctx.child();

        let handles: Vec<_> = self
            .instances
            .into_iter()
            .map(|inst| {
                let ctx = group_ctx.clone();
                let sink = self.sink.clone();
                tokio::spawn(async move {
                    let err = classify_result(inst.run(&ctx).await);
                    if let Some(e) = &err {
                        if !inst.watch && !ctx.is_cancelled() {
                            let reason = e.to_string();
                            sink.on_event(
                                &Event::new(EventKind::GroupCancelled)
                                    .with_instance(inst.index)
                                    .with_reason(reason.as_str()),
                            )
                            .await;
                            ctx.cancel(CancelCause::InstanceFailed {
                                index: inst.index,
                                error: reason,
                            });
                        }
                    }
                    err
                })
            })
            .collect();

        let failures: Vec<InstanceFailure> = join_all(handles)
            .await
            .into_iter()
            .enumerate()
            .filter_map(|(index, joined)| {
                let error = match joined {
                    Ok(err) => err?,
                    Err(e) => panicked(e),
                };
                Some(InstanceFailure { index, error })
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(RunError::Failed { failures })
        }
    }
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group")
            .field("instances", &self.instances)
            .field("sink", &self.sink.name())
            .finish()
    }
}

fn panicked(e: JoinError) -> InstanceError {
    let message = if e.is_panic() {
        let payload = e.into_panic();
        payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string())
    } else {
        e.to_string()
    };
    InstanceError::Panicked { message }
}
