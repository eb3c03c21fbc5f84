// Integration tests for SystemRunner against a real `sh`

use runrecord_core::errors::RrErrorKind;
use runrecord_engine::{Invocation, ProcessRunner, RawOutput, SystemRunner};
use std::path::Path;
use tempfile::TempDir;

fn sh() -> Vec<String> {
    vec!["sh".to_string()]
}

fn path_env() -> Vec<(String, String)> {
    vec![(
        "PATH".to_string(),
        std::env::var("PATH").unwrap_or_else(|_| "/usr/bin:/bin".to_string()),
    )]
}

fn run_sh(script: &str, workdir: &Path, env: &[(String, String)]) -> RawOutput {
    let argv = sh();
    SystemRunner
        .run(&Invocation {
            argv: &argv,
            stdin: script.as_bytes(),
            workdir,
            env,
        })
        .unwrap()
}

#[test]
fn test_stdout_and_stderr_merged_in_order() {
    let dir = TempDir::new().unwrap();
    let out = run_sh(
        "echo one\necho two >&2\necho three\n",
        dir.path(),
        &path_env(),
    );

    assert_eq!(out.exit_code, 0);
    assert_eq!(String::from_utf8(out.output).unwrap(), "one\ntwo\nthree\n");
}

#[test]
fn test_exit_code_reported() {
    let dir = TempDir::new().unwrap();
    let out = run_sh("exit 3\n", dir.path(), &path_env());
    assert_eq!(out.exit_code, 3);
}

#[test]
fn test_signal_death_reports_minus_one() {
    let dir = TempDir::new().unwrap();
    let out = run_sh("kill -9 $$\n", dir.path(), &path_env());
    assert_eq!(out.exit_code, -1);
}

#[test]
fn test_runs_in_workdir() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("marker.txt"), "here").unwrap();

    let out = run_sh("cat marker.txt\n", dir.path(), &path_env());

    assert_eq!(String::from_utf8(out.output).unwrap(), "here");
}

#[test]
fn test_environment_replaced_when_given() {
    let dir = TempDir::new().unwrap();
    let mut env = path_env();
    env.push(("GREETING".to_string(), "hello".to_string()));

    let out = run_sh(
        "echo \"$GREETING\"\necho \"${HOME:-unset}\"\n",
        dir.path(),
        &env,
    );

    assert_eq!(String::from_utf8(out.output).unwrap(), "hello\nunset\n");
}

#[test]
fn test_large_output_does_not_deadlock() {
    let dir = TempDir::new().unwrap();
    // Well past a pipe buffer in both directions
    let mut script = String::new();
    for i in 0..20_000 {
        script.push_str(&format!("echo line-{}\n", i));
    }

    let out = run_sh(&script, dir.path(), &path_env());

    assert_eq!(out.exit_code, 0);
    let text = String::from_utf8(out.output).unwrap();
    assert_eq!(text.lines().count(), 20_000);
    assert!(text.ends_with("line-19999\n"));
}

#[test]
fn test_child_ignoring_stdin_is_fine() {
    let dir = TempDir::new().unwrap();
    let argv = vec!["true".to_string()];
    let input = vec![b'x'; 1 << 20];

    let out = SystemRunner
        .run(&Invocation {
            argv: &argv,
            stdin: &input,
            workdir: dir.path(),
            env: &path_env(),
        })
        .unwrap();

    assert_eq!(out.exit_code, 0);
}

#[test]
fn test_missing_interpreter_is_io_error() {
    let dir = TempDir::new().unwrap();
    let argv = vec!["runrecord-no-such-interpreter".to_string()];

    let err = SystemRunner
        .run(&Invocation {
            argv: &argv,
            stdin: b"",
            workdir: dir.path(),
            env: &path_env(),
        })
        .unwrap_err();

    assert_eq!(err.kind(), RrErrorKind::Io);
    assert_eq!(err.op(), Some("spawn"));
    assert_eq!(err.path(), Some(Path::new("runrecord-no-such-interpreter")));
}
