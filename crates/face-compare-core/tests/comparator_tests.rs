mod common;

use common::{stub_config, RecordingRunner};
use face_compare_core::comparator::ComparatorInvoker;
use face_compare_core::{AppConfig, ComparisonOutcome, ErrorCategory};
use std::path::Path;
use tempfile::tempdir;

fn recording_invoker(runner: &RecordingRunner) -> ComparatorInvoker {
    let config = AppConfig {
        script_dir: "/nonexistent-face-compare-dir".to_string(),
        ..AppConfig::default()
    };
    ComparatorInvoker::new(config).with_runner(runner.clone())
}

#[test]
fn test_empty_input_never_spawns() {
    let runner = RecordingRunner::replying(0, "should not be seen");
    let invoker = recording_invoker(&runner);

    for (one, two) in [("", "b.png"), ("a.png", ""), ("", "")] {
        let outcome = invoker.compare(Path::new(one), Path::new(two));
        assert_eq!(outcome.category(), Some(ErrorCategory::InputMissing));
        assert!(outcome.text().contains("missing"), "got {}", outcome);
    }
    assert_eq!(runner.call_count(), 0);
}

#[test]
fn test_success_returns_output_verbatim() {
    let runner = RecordingRunner::replying(0, "Faces match (distance 0.31)\n");
    let invoker = recording_invoker(&runner);

    let outcome = invoker.compare(Path::new("/up/a.png"), Path::new("/up/b.png"));

    assert_eq!(
        outcome,
        ComparisonOutcome::Completed("Faces match (distance 0.31)\n".to_string())
    );
    let calls = runner.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "conda");
    assert_eq!(
        &calls[0].args[calls[0].args.len() - 4..],
        &["--image-one", "/up/a.png", "--image-two", "/up/b.png"]
    );
}

#[test]
fn test_non_zero_exit_is_error_outcome() {
    let runner = RecordingRunner::replying(1, "Traceback: no face found");
    let invoker = recording_invoker(&runner);

    let outcome = invoker.compare(Path::new("/up/a.png"), Path::new("/up/b.png"));

    assert!(!outcome.is_success());
    assert_ne!(outcome.text(), "Traceback: no face found");
    assert!(outcome.text().starts_with("Error:"));
}

#[test]
fn test_spawn_failure_is_error_outcome() {
    let tmp = tempdir().unwrap();
    let config = AppConfig {
        script_dir: tmp.path().to_string_lossy().into_owned(),
        env_runner: "face-compare-runner-that-does-not-exist".to_string(),
        ..AppConfig::default()
    };
    let invoker = ComparatorInvoker::new(config);

    let outcome = invoker.compare(Path::new("a.png"), Path::new("b.png"));

    assert_eq!(outcome.category(), Some(ErrorCategory::Invocation));
    assert!(
        outcome.text().contains("face-compare-runner-that-does-not-exist"),
        "got {}",
        outcome
    );
}

#[cfg(unix)]
mod process {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_stub_stdout_is_outcome() {
        let upload = tempdir().unwrap();
        let scripts = tempdir().unwrap();
        let config = stub_config(
            upload.path(),
            scripts.path(),
            "echo \"compared $2 with $4\"\n",
        );

        let outcome =
            ComparatorInvoker::new(config).compare(Path::new("one.png"), Path::new("two.png"));

        assert_eq!(
            outcome,
            ComparisonOutcome::Completed("compared one.png with two.png\n".to_string())
        );
    }

    #[test]
    fn test_stderr_is_merged_in_order() {
        let upload = tempdir().unwrap();
        let scripts = tempdir().unwrap();
        let config = stub_config(
            upload.path(),
            scripts.path(),
            "echo loading\necho warning >&2\necho done\n",
        );

        let outcome =
            ComparatorInvoker::new(config).compare(Path::new("a.png"), Path::new("b.png"));

        assert_eq!(outcome.text(), "loading\nwarning\ndone\n");
    }

    #[test]
    fn test_stub_exiting_non_zero_is_error() {
        let upload = tempdir().unwrap();
        let scripts = tempdir().unwrap();
        let config = stub_config(upload.path(), scripts.path(), "echo boom\nexit 2\n");

        let outcome =
            ComparatorInvoker::new(config).compare(Path::new("a.png"), Path::new("b.png"));

        assert!(!outcome.is_success());
        assert_ne!(outcome.text(), "boom\n");
        assert!(outcome.text().contains("exit status 2"), "got {}", outcome);
    }

    #[test]
    fn test_timeout_kills_comparator() {
        let upload = tempdir().unwrap();
        let scripts = tempdir().unwrap();
        let config = face_compare_core::AppConfig {
            timeout_secs: Some(1),
            ..stub_config(upload.path(), scripts.path(), "exec sleep 30\n")
        };

        let start = Instant::now();
        let outcome =
            ComparatorInvoker::new(config).compare(Path::new("a.png"), Path::new("b.png"));

        assert!(start.elapsed() < Duration::from_secs(20));
        assert!(!outcome.is_success());
        assert!(outcome.text().contains("did not finish"), "got {}", outcome);
    }
}
