// Integration tests for the capture cache
// Uses FakeRunner, so no interpreter is spawned.

mod common;

use common::{FakeRunner, Fixture};
use runrecord_core::errors::RrErrorKind;
use runrecord_core::logging_facility::test_capture::init_test_capture;
use runrecord_core::transform::parse_replace_rules;
use runrecord_core::{ReplaceRule, SnippetRequest, SourceLocation};
use runrecord_core::core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use runrecord_engine::{ensure_captured, Build, CaptureOutcome};
use std::fs;

fn request(fx: &Fixture, name: &str, lines: &[&str]) -> SnippetRequest {
    SnippetRequest::new(
        SourceLocation::new(fx.doc_root().join("guide.rst"), 10),
        lines.iter().map(|l| l.to_string()).collect(),
        fx.doc_root().join("out").join(name),
        fx.dir.path().join("work").join("guide"),
    )
}

#[test]
fn test_second_build_is_served_from_cache() {
    let fx = Fixture::new();
    let req = request(&fx, "hi.txt", &["$ echo hi"]);

    let mut first = Build::new(fx.settings(), FakeRunner::replying("hi\n", 0));
    let report = first.process_snippet(&req).unwrap();
    assert_eq!(report.capture, CaptureOutcome::Captured { bytes: 13 });
    assert_eq!(first.runner().call_count(), 1);

    let before = fs::read(&req.artifact).unwrap();

    let mut second = Build::new(fx.settings(), FakeRunner::replying("changed\n", 0));
    let report = second.process_snippet(&req).unwrap();

    assert_eq!(report.capture, CaptureOutcome::Cached);
    assert_eq!(second.runner().call_count(), 0);
    assert_eq!(fs::read(&req.artifact).unwrap(), before);
}

#[test]
fn test_artifact_is_content_then_output() {
    let fx = Fixture::new();
    let req = request(&fx, "two.txt", &["$ echo a", "$ echo b"]);

    let mut runner = FakeRunner::replying("a\nb\n", 0);
    ensure_captured(&fx.settings(), &mut runner, &req).unwrap();

    assert_eq!(fx.read(&req.artifact), "$ echo a\n$ echo b\na\nb\n");
}

#[test]
fn test_prompts_stripped_before_execution() {
    let fx = Fixture::new();
    let req = request(&fx, "p.txt", &["$ cd /tmp", "$ ls", "file.txt"]);

    let mut runner = FakeRunner::echoing();
    ensure_captured(&fx.settings(), &mut runner, &req).unwrap();

    assert_eq!(runner.calls[0].stdin, b"cd /tmp\nls\nfile.txt".to_vec());
    assert_eq!(runner.calls[0].argv, vec!["bash".to_string()]);
}

#[test]
fn test_literal_command_overrides_content() {
    let fx = Fixture::new();
    let req = request(&fx, "lit.txt", &["$ make"]).with_literal_command("make 2>&1 | tail -1");

    let mut runner = FakeRunner::echoing();
    ensure_captured(&fx.settings(), &mut runner, &req).unwrap();

    assert_eq!(runner.calls[0].stdin, b"make 2>&1 | tail -1".to_vec());
    // The artifact still shows what was authored
    assert!(fx.read(&req.artifact).starts_with("$ make\n"));
}

#[test]
fn test_unexpected_exit_code_writes_nothing() {
    let fx = Fixture::new();
    let req = request(&fx, "fail.txt", &["$ false"]);

    let mut runner = FakeRunner::replying("", 1);
    let err = ensure_captured(&fx.settings(), &mut runner, &req).unwrap_err();

    assert_eq!(err.kind(), RrErrorKind::UnexpectedExitCode);
    assert_eq!(err.exit_code(), Some(1));
    assert_eq!(err.location(), Some(&req.source));
    assert!(!req.artifact.exists());
}

#[test]
fn test_expected_nonzero_exit_code_captures() {
    let fx = Fixture::new();
    let req = request(&fx, "grep.txt", &["$ grep nothing /dev/null"]).with_expected_exit_code(1);

    let mut runner = FakeRunner::replying("", 1);
    let outcome = ensure_captured(&fx.settings(), &mut runner, &req).unwrap();

    assert!(matches!(outcome, CaptureOutcome::Captured { .. }));
    assert!(req.artifact.exists());
}

#[test]
fn test_global_rules_then_snippet_rules() {
    let fx = Fixture::new();
    let mut settings = fx.settings();
    settings.global_rules = vec![ReplaceRule::new("foo", "bar").unwrap()];

    let req = request(&fx, "rules.txt", &["$ echo foo"])
        .with_replace_rules(parse_replace_rules("/bar/baz/").unwrap());

    let mut runner = FakeRunner::replying("foo\n", 0);
    ensure_captured(&settings, &mut runner, &req).unwrap();

    assert_eq!(fx.read(&req.artifact), "$ echo foo\nbaz\n");
}

#[test]
fn test_rules_do_not_touch_authored_content() {
    let fx = Fixture::new();
    let mut settings = fx.settings();
    settings.global_rules = vec![ReplaceRule::new("secret", "XXX").unwrap()];

    let req = request(&fx, "content.txt", &["$ echo secret"]);
    let mut runner = FakeRunner::replying("secret\n", 0);
    ensure_captured(&settings, &mut runner, &req).unwrap();

    assert_eq!(fx.read(&req.artifact), "$ echo secret\nXXX\n");
}

#[test]
fn test_environment_overlay_reaches_runner() {
    let fx = Fixture::new();
    let mut settings = fx.settings();
    settings.env.insert("LANG".to_string(), "C".to_string());
    settings.env.insert("HOME".to_string(), "/home/build".to_string());

    let req = request(&fx, "env.txt", &["$ env"]).with_env("HOME", "/tmp/home");
    let mut runner = FakeRunner::echoing();
    ensure_captured(&settings, &mut runner, &req).unwrap();

    assert_eq!(
        runner.calls[0].env,
        vec![
            ("HOME".to_string(), "/tmp/home".to_string()),
            ("LANG".to_string(), "C".to_string()),
        ]
    );
}

#[test]
fn test_workdir_created_before_run() {
    let fx = Fixture::new();
    let req = request(&fx, "wd.txt", &["$ pwd"]);
    assert!(!req.workdir.exists());

    let mut runner = FakeRunner::echoing();
    ensure_captured(&fx.settings(), &mut runner, &req).unwrap();

    assert!(req.workdir.is_dir());
    assert_eq!(runner.calls[0].workdir, req.workdir);
}

#[test]
fn test_unknown_language_fails_with_location() {
    let fx = Fixture::new();
    let req = request(&fx, "cobol.txt", &["DISPLAY 'HI'"]).with_language("cobol");

    let mut runner = FakeRunner::echoing();
    let err = ensure_captured(&fx.settings(), &mut runner, &req).unwrap_err();

    assert_eq!(err.kind(), RrErrorKind::UnknownLanguage);
    assert!(err.to_string().contains("guide.rst:10"));
    assert_eq!(runner.call_count(), 0);
    assert!(!req.artifact.exists());
}

#[test]
fn test_capture_emits_boundary_events() {
    let capture = init_test_capture();
    let fx = Fixture::new();
    let req = request(&fx, "logged.txt", &["$ echo logged"]);

    let mut runner = FakeRunner::replying("logged\n", 0);
    ensure_captured(&fx.settings(), &mut runner, &req).unwrap();

    let artifact = req.artifact.display().to_string();
    let ours = |event: &str| {
        capture.count_events(|e| {
            e.op.as_deref() == Some("ensure_captured")
                && e.event.as_deref() == Some(event)
                && (event != EVENT_START || e.field("artifact") == Some(artifact.as_str()))
        })
    };
    assert!(ours(EVENT_START) >= 1);
    assert!(ours(EVENT_END) >= 1);
}

#[test]
fn test_failed_capture_emits_error_event() {
    let capture = init_test_capture();
    let fx = Fixture::new();
    let req = request(&fx, "failing-unique.txt", &["$ exit 4"]);

    let mut runner = FakeRunner::replying("", 4);
    let _ = ensure_captured(&fx.settings(), &mut runner, &req);

    let found = capture.count_events(|e| {
        e.op.as_deref() == Some("ensure_captured")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field("err.code") == Some("ERR_UNEXPECTED_EXIT_CODE")
    });
    assert!(found >= 1);
}
