#![cfg(unix)]

use cmdgroup::cli::{DO_NOT_SUPERVISE_EXIT_CODE, FAILURE_EXIT_CODE, run};

async fn exit_code(args: &[&str]) -> i32 {
    run(args.iter().copied()).await
}

#[tokio::test]
async fn test_no_command_specified() {
    assert_eq!(exit_code(&["cmdgroup"]).await, DO_NOT_SUPERVISE_EXIT_CODE);
}

#[tokio::test]
async fn test_help_flag() {
    assert_eq!(exit_code(&["cmdgroup", "--help"]).await, 0);
}

#[tokio::test]
async fn test_invalid_flag() {
    assert_eq!(
        exit_code(&["cmdgroup", "--nonexistent"]).await,
        DO_NOT_SUPERVISE_EXIT_CODE
    );
}

#[tokio::test]
async fn test_command_not_found() {
    assert_eq!(
        exit_code(&["cmdgroup", "/nonexistent/binary"]).await,
        DO_NOT_SUPERVISE_EXIT_CODE
    );
}

#[tokio::test]
async fn test_invalid_watch_value() {
    assert_eq!(
        exit_code(&["cmdgroup", "--watch", "abc", "true"]).await,
        DO_NOT_SUPERVISE_EXIT_CODE
    );
    assert_eq!(
        exit_code(&["cmdgroup", "--watch", "5", "true", "--"]).await,
        DO_NOT_SUPERVISE_EXIT_CODE
    );
}

#[tokio::test]
async fn test_successful_command() {
    assert_eq!(exit_code(&["cmdgroup", "true"]).await, 0);
    assert_eq!(exit_code(&["cmdgroup", "echo", "a", "--", "b"]).await, 0);
}

#[tokio::test]
async fn test_failing_command() {
    assert_eq!(exit_code(&["cmdgroup", "false"]).await, FAILURE_EXIT_CODE);
}
