#![cfg(unix)]

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use cmdgroup::{
    BuildError, CancelCause, CancelContext, Event, EventKind, Group, GroupConfig, InstanceError,
    Subscribe, WatchError,
};

/// Keeps every event for later inspection.
#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    fn of(&self, instance: usize, kind: EventKind) -> Vec<Event> {
        self.events
            .lock()
            .expect("recorder lock")
            .iter()
            .filter(|e| e.instance == Some(instance) && e.kind == kind)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Subscribe for Recorder {
    async fn on_event(&self, event: &Event) {
        self.events.lock().expect("recorder lock").push(event.clone());
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

fn config(args: &[&str], watch: &str, recorder: &Arc<Recorder>) -> GroupConfig {
    GroupConfig {
        args: args.iter().map(|s| s.to_string()).collect(),
        watch: watch.to_string(),
        sink: Some(recorder.clone()),
        grace: Duration::from_secs(5),
        restart_delay: Duration::from_millis(50),
    }
}

fn process_alive(pid: u32) -> bool {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    kill(Pid::from_raw(pid as i32), None).is_ok()
}

/// True once `pid` has exited, counting unreaped zombies as exited.
fn process_gone(pid: u32) -> bool {
    if !process_alive(pid) {
        return true;
    }
    match std::fs::read_to_string(format!("/proc/{pid}/stat")) {
        // The state field follows the parenthesised command name.
        Ok(stat) => stat
            .rsplit(')')
            .next()
            .is_some_and(|rest| rest.trim_start().starts_with('Z')),
        Err(_) => true,
    }
}

const RUN_LIMIT: Duration = Duration::from_secs(20);

#[test]
fn test_new_builds_instances() {
    let path = cmdgroup::process::lookup("echo").expect("echo in PATH");
    let rec = Arc::new(Recorder::default());

    let group = Group::new("echo", config(&["a", "-flag", "--", "b"], "none", &rec))
        .expect("valid group");
    let got: Vec<(PathBuf, Vec<String>, bool)> = group
        .instances()
        .iter()
        .map(|i| (i.path().to_path_buf(), i.args().to_vec(), i.is_watched()))
        .collect();
    assert_eq!(
        got,
        vec![
            (path.clone(), vec!["a".into(), "-flag".into()], false),
            (path.clone(), vec!["a".into(), "-flag".into(), "b".into()], false),
        ]
    );

    let group = Group::new("echo", config(&["a", "--", "b"], "1", &rec)).expect("valid group");
    let watched: Vec<bool> = group.instances().iter().map(|i| i.is_watched()).collect();
    assert_eq!(watched, vec![false, true]);

    let group = Group::new("echo", config(&["a", "--", "b"], "all", &rec)).expect("valid group");
    assert!(group.instances().iter().all(|i| i.is_watched()));

    let group = Group::new("echo", GroupConfig::default()).expect("valid group");
    assert_eq!(group.instances().len(), 1);
    assert!(group.instances()[0].args().is_empty());
    assert_eq!(group.instances()[0].path(), path.as_path());
}

#[test]
fn test_new_rejects_bad_input() {
    let rec = Arc::new(Recorder::default());

    let err = Group::new("", config(&[], "none", &rec)).unwrap_err();
    assert!(matches!(err, BuildError::CommandNotFound { .. }));

    let err = Group::new("/nonexistent/binary", config(&[], "none", &rec)).unwrap_err();
    assert!(matches!(err, BuildError::CommandNotFound { .. }));

    let err = Group::new("echo", config(&[], "a", &rec)).unwrap_err();
    assert!(matches!(err, BuildError::Watch(WatchError::Parse { .. })));

    let err = Group::new("echo", config(&["a", "--", "b"], "5", &rec)).unwrap_err();
    assert!(matches!(
        err,
        BuildError::Watch(WatchError::OutOfRange { index: 5, count: 2 })
    ));

    let cfg = GroupConfig {
        sink: None,
        ..GroupConfig::default()
    };
    assert!(matches!(
        Group::new("echo", cfg).unwrap_err(),
        BuildError::MissingSink
    ));

    assert!(rec.events.lock().expect("recorder lock").is_empty());
}

#[tokio::test]
async fn test_all_instances_succeed() {
    let rec = Arc::new(Recorder::default());
    let group = Group::new("true", config(&["--", "--"], "none", &rec)).expect("valid group");

    let res = tokio::time::timeout(RUN_LIMIT, group.run(&CancelContext::new()))
        .await
        .expect("group should finish");
    assert!(res.is_ok(), "unexpected error: {res:?}");

    for index in 0..3 {
        assert_eq!(rec.of(index, EventKind::Started).len(), 1);
        let exited = rec.of(index, EventKind::Exited);
        assert_eq!(exited.len(), 1);
        assert!(exited[0].reason.is_none());
    }
}

#[tokio::test]
async fn test_unwatched_failure_stops_watched_sibling() {
    // Instance 0 exits 3; instance 1 runs `sleep 30` and is watched.
    let script = r#"if [ -n "$1" ]; then exec sleep "$1"; else exit 3; fi"#;
    let rec = Arc::new(Recorder::default());
    let group = Group::new("sh", config(&["-c", script, "sh", "--", "30"], "1", &rec))
        .expect("valid group");
    assert!(!group.instances()[0].is_watched());
    assert!(group.instances()[1].is_watched());

    let res = tokio::time::timeout(RUN_LIMIT, group.run(&CancelContext::new()))
        .await
        .expect("watched sibling should have been stopped");

    let err = res.expect_err("instance 0 failed");
    let failures = err.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].index, 0);
    assert!(matches!(failures[0].error, InstanceError::Exited { code: 3 }));

    // Instance 1 never restarted and its child is gone.
    assert!(rec.of(1, EventKind::RestartScheduled).is_empty());
    for started in rec.of(1, EventKind::Started) {
        let pid = started.pid.expect("started event has a pid");
        assert!(!process_alive(pid), "pid {pid} still running");
        assert_eq!(rec.of(1, EventKind::TerminationRequested).len(), 1);
    }
}

#[tokio::test]
async fn test_watched_instance_restarts_until_cancelled() {
    let rec = Arc::new(Recorder::default());
    let group = Group::new("false", config(&[], "all", &rec)).expect("valid group");

    let ctx = CancelContext::new();
    let stopper = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(400)).await;
        stopper.cancel(CancelCause::Requested);
    });

    let res = tokio::time::timeout(RUN_LIMIT, group.run(&ctx))
        .await
        .expect("group should stop after cancel");
    assert!(res.is_ok(), "watched failures are retried, not reported: {res:?}");

    assert!(rec.of(0, EventKind::Started).len() >= 2);
    assert!(!rec.of(0, EventKind::RestartScheduled).is_empty());
}

#[tokio::test]
async fn test_external_cancel_is_not_a_failure() {
    let rec = Arc::new(Recorder::default());
    let group = Group::new("sleep", config(&["30", "--", "--"], "none", &rec)).expect("valid group");

    let ctx = CancelContext::new();
    let stopper = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        stopper.cancel(CancelCause::ShutdownSignal);
    });

    let res = tokio::time::timeout(RUN_LIMIT, group.run(&ctx))
        .await
        .expect("group should stop after cancel");
    assert!(res.is_ok(), "SIGTERM exits are expected: {res:?}");

    for index in 0..3 {
        let exited = rec.of(index, EventKind::Exited);
        assert_eq!(exited.len(), 1);
        assert!(exited[0].expected);

        let requested = rec.of(index, EventKind::TerminationRequested);
        assert_eq!(requested.len(), 1);
        assert_eq!(
            requested[0].reason.as_deref(),
            Some("shutdown signal received")
        );
    }
}

#[tokio::test]
async fn test_term_resistant_child_is_killed_after_grace() {
    let rec = Arc::new(Recorder::default());
    let mut cfg = config(&["-c", "trap '' TERM; exec sleep 30"], "none", &rec);
    cfg.grace = Duration::from_millis(200);
    let group = Group::new("sh", cfg).expect("valid group");

    let ctx = CancelContext::new();
    let stopper = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        stopper.cancel(CancelCause::Requested);
    });

    let res = tokio::time::timeout(RUN_LIMIT, group.run(&ctx))
        .await
        .expect("group should stop after kill");

    let err = res.expect_err("a forced kill is a failure");
    assert!(matches!(
        err.failures()[0].error,
        InstanceError::Signaled { signal } if signal == nix::libc::SIGKILL
    ));
    assert_eq!(rec.of(0, EventKind::ForceKilled).len(), 1);
}

#[tokio::test]
async fn test_start_failure_is_not_retried() {
    let script = std::env::temp_dir().join(format!("cmdgroup-start-{}", std::process::id()));
    std::fs::write(&script, "#!/bin/sh\nexit 0\n").expect("write script");
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
            .expect("chmod script");
    }

    let rec = Arc::new(Recorder::default());
    let group = Group::new(script.to_str().expect("utf-8 path"), config(&[], "all", &rec))
        .expect("valid group");
    std::fs::remove_file(&script).expect("remove script");

    let res = tokio::time::timeout(RUN_LIMIT, group.run(&CancelContext::new()))
        .await
        .expect("start failure is terminal");

    let err = res.expect_err("start failure is reported");
    assert!(matches!(err.failures()[0].error, InstanceError::Start { .. }));
    assert_eq!(rec.of(0, EventKind::StartFailed).len(), 1);
    assert!(rec.of(0, EventKind::RestartScheduled).is_empty());
}

#[tokio::test]
async fn test_watched_failure_does_not_stop_siblings() {
    // Instance 0 exits 3 and is watched; instance 1 runs `sleep 1`.
    let script = r#"if [ -n "$1" ]; then exec sleep "$1"; else exit 3; fi"#;
    let rec = Arc::new(Recorder::default());
    let group = Group::new("sh", config(&["-c", script, "sh", "--", "1"], "0", &rec))
        .expect("valid group");

    let ctx = CancelContext::new();
    let stopper = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(2)).await;
        stopper.cancel(CancelCause::Requested);
    });

    let res = tokio::time::timeout(RUN_LIMIT, group.run(&ctx))
        .await
        .expect("group should stop after cancel");
    assert!(res.is_ok(), "watched failures are not reported: {res:?}");

    assert!(rec.of(0, EventKind::GroupCancelled).is_empty());
    assert!(!rec.of(0, EventKind::RestartScheduled).is_empty());

    assert!(rec.of(1, EventKind::TerminationRequested).is_empty());
    let exited = rec.of(1, EventKind::Exited);
    assert_eq!(exited.len(), 1);
    assert!(exited[0].reason.is_none(), "sleep 1 ran to completion");
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_termination_reaches_grandchildren() {
    let pid_file =
        std::env::temp_dir().join(format!("cmdgroup-grandchild-{}", std::process::id()));
    let _ = std::fs::remove_file(&pid_file);
    let script = r#"sleep 30 & echo $! > "$1"; wait"#;
    let rec = Arc::new(Recorder::default());
    let group = Group::new(
        "sh",
        config(
            &["-c", script, "sh", pid_file.to_str().expect("utf-8 path")],
            "none",
            &rec,
        ),
    )
    .expect("valid group");

    let ctx = CancelContext::new();
    let stopper = ctx.clone();
    let watched_file = pid_file.clone();
    tokio::spawn(async move {
        // Cancel once the grandchild has recorded its pid.
        while !std::fs::read_to_string(&watched_file).is_ok_and(|s| s.ends_with('\n')) {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        stopper.cancel(CancelCause::Requested);
    });

    let res = tokio::time::timeout(RUN_LIMIT, group.run(&ctx))
        .await
        .expect("group should stop after cancel");
    assert!(res.is_ok(), "SIGTERM exits are expected: {res:?}");
    assert!(rec.of(0, EventKind::ForceKilled).is_empty());

    let grandchild: u32 = std::fs::read_to_string(&pid_file)
        .expect("pid file")
        .trim()
        .parse()
        .expect("numeric pid");
    std::fs::remove_file(&pid_file).expect("remove pid file");

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !process_gone(grandchild) && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(process_gone(grandchild), "grandchild {grandchild} still running");
}
