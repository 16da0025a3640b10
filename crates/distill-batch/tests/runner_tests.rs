//! Integration tests for the batch driver, exercising discovery, resume,
//! failure handling, and the retry interplay against a scratch filesystem.

use distill_batch::{BatchConfig, BatchRunner, BatchError, ErrorMode, RateLimiter};
use distill_genai::{
    retry_with_policy, GenerateError, MockGenerator, RetryPolicy, TextGenerator,
};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn write_input(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

fn runner(input: &Path, output: &Path) -> BatchRunner {
    BatchRunner::new(
        BatchConfig::new(input, output),
        RateLimiter::new(0),
    )
}

fn transient() -> GenerateError {
    GenerateError::Service {
        status: 503,
        message: "unavailable".to_string(),
    }
}

/// Applies a retry policy in front of a scripted generator, the way the
/// real client wraps its single-request call.
struct Retrying {
    inner: MockGenerator,
    policy: RetryPolicy,
}

impl TextGenerator for Retrying {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        retry_with_policy(&self.policy, || self.inner.generate(prompt)).await
    }
}

#[tokio::test]
async fn test_run_writes_pretty_records() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_input(input.path(), "memo.md", "transcript text");

    let generator = MockGenerator::new(r#"{"title":"Café","tags":["早い","ok"]}"#);
    let summary = runner(input.path(), output.path())
        .run(&generator)
        .await
        .unwrap();

    assert_eq!(summary.completed, 1);
    assert_eq!(summary.skipped, 0);
    assert!(summary.is_clean());

    let record = fs::read_to_string(output.path().join("memo.json")).unwrap();
    // 2-space indentation, non-ASCII kept literal
    assert!(record.contains("  \"title\": \"Café\""));
    assert!(record.contains("早い"));
    assert!(!record.contains("\\u"));
}

#[tokio::test]
async fn test_second_run_skips_without_network_calls() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_input(input.path(), "a.md", "one");
    write_input(input.path(), "b.md", "two");

    let first = MockGenerator::new(r#"{"n": "1"}"#);
    let summary = runner(input.path(), output.path())
        .run(&first)
        .await
        .unwrap();
    assert_eq!(summary.completed, 2);
    assert_eq!(first.call_count(), 2);

    let before_a = fs::read_to_string(output.path().join("a.json")).unwrap();

    let second = MockGenerator::new(r#"{"n": "different"}"#);
    let summary = runner(input.path(), output.path())
        .run(&second)
        .await
        .unwrap();
    assert_eq!(summary.completed, 0);
    assert_eq!(summary.skipped, 2);
    assert_eq!(second.call_count(), 0);

    // Existing outputs are honored, not rewritten
    let after_a = fs::read_to_string(output.path().join("a.json")).unwrap();
    assert_eq!(before_a, after_a);
}

#[tokio::test]
async fn test_processing_order_is_lexicographic() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_input(input.path(), "charlie.md", "c");
    write_input(input.path(), "alpha.md", "a");
    write_input(input.path(), "bravo.md", "b");

    let generator = MockGenerator::new("{}");
    generator.push_response(r#"{"order": "first"}"#);
    generator.push_response(r#"{"order": "second"}"#);
    generator.push_response(r#"{"order": "third"}"#);

    runner(input.path(), output.path())
        .run(&generator)
        .await
        .unwrap();

    let alpha = fs::read_to_string(output.path().join("alpha.json")).unwrap();
    let charlie = fs::read_to_string(output.path().join("charlie.json")).unwrap();
    assert!(alpha.contains("first"));
    assert!(charlie.contains("third"));
}

#[tokio::test]
async fn test_non_matching_extensions_ignored() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_input(input.path(), "keep.md", "x");
    write_input(input.path(), "notes.txt", "x");
    write_input(input.path(), "noext", "x");

    let generator = MockGenerator::new("{}");
    let summary = runner(input.path(), output.path())
        .run(&generator)
        .await
        .unwrap();

    assert_eq!(summary.completed, 1);
    assert!(output.path().join("keep.json").exists());
    assert!(!output.path().join("notes.json").exists());
}

#[tokio::test]
async fn test_fail_fast_preserves_earlier_outputs() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_input(input.path(), "a.md", "a");
    write_input(input.path(), "b.md", "b");
    write_input(input.path(), "c.md", "c");

    let generator = MockGenerator::new("{}");
    generator.push_response(r#"{"file": "a"}"#);
    generator.push_failure(GenerateError::Auth("revoked key".to_string()));

    let err = runner(input.path(), output.path())
        .run(&generator)
        .await
        .unwrap_err();

    match err {
        BatchError::Generate { path, source } => {
            assert!(path.ends_with("b.md"));
            assert!(matches!(source, GenerateError::Auth(_)));
        }
        other => panic!("expected Generate error, got {other}"),
    }

    // a.json survives the abort; b and c were never written
    assert!(output.path().join("a.json").exists());
    assert!(!output.path().join("b.json").exists());
    assert!(!output.path().join("c.json").exists());
}

#[tokio::test]
async fn test_continue_mode_collects_failures() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_input(input.path(), "a.md", "a");
    write_input(input.path(), "b.md", "b");

    let generator = MockGenerator::new(r#"{"ok": true}"#);
    generator.push_failure(GenerateError::Auth("revoked key".to_string()));

    let config = BatchConfig::new(input.path(), output.path()).with_error_mode(ErrorMode::Continue);
    let summary = BatchRunner::new(config, RateLimiter::new(0))
        .run(&generator)
        .await
        .unwrap();

    assert_eq!(summary.completed, 1);
    assert_eq!(summary.failures.len(), 1);
    assert!(!summary.is_clean());
    assert!(summary.failures[0].0.ends_with("a.md"));
    assert!(output.path().join("b.json").exists());
}

#[tokio::test]
async fn test_unparseable_response_aborts() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_input(input.path(), "a.md", "a");

    let generator = MockGenerator::new("this is not json");
    let err = runner(input.path(), output.path())
        .run(&generator)
        .await
        .unwrap_err();

    assert!(matches!(err, BatchError::Parse { .. }));
    assert!(!output.path().join("a.json").exists());
}

#[tokio::test(start_paused = true)]
async fn test_transient_failures_retried_then_one_output() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_input(input.path(), "a.md", "a");

    let inner = MockGenerator::new(r#"{"done": true}"#);
    inner.push_failure(transient());
    inner.push_failure(transient());
    let generator = Retrying {
        inner,
        policy: RetryPolicy::default(),
    };

    let start = tokio::time::Instant::now();
    let summary = runner(input.path(), output.path())
        .run(&generator)
        .await
        .unwrap();

    assert_eq!(summary.completed, 1);
    assert_eq!(generator.inner.call_count(), 3);
    assert!(output.path().join("a.json").exists());
    // Backoff schedule: 10s then 20s
    assert_eq!(start.elapsed(), Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn test_retry_exhaustion_aborts_keeping_earlier_outputs() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_input(input.path(), "a.md", "a");
    write_input(input.path(), "b.md", "b");

    let inner = MockGenerator::new("{}");
    inner.push_response(r#"{"file": "a"}"#);
    for _ in 0..3 {
        inner.push_failure(transient());
    }
    let generator = Retrying {
        inner,
        policy: RetryPolicy::default().with_max_attempts(3),
    };

    let err = runner(input.path(), output.path())
        .run(&generator)
        .await
        .unwrap_err();

    match err {
        BatchError::Generate { path, source } => {
            assert!(path.ends_with("b.md"));
            assert!(matches!(
                source,
                GenerateError::RetriesExhausted { attempts: 3, .. }
            ));
        }
        other => panic!("expected Generate error, got {other}"),
    }
    assert!(output.path().join("a.json").exists());
    assert!(!output.path().join("b.json").exists());
}

#[tokio::test]
async fn test_missing_input_dir_is_list_error() {
    let output = TempDir::new().unwrap();
    let generator = MockGenerator::new("{}");

    let err = runner(Path::new("/nonexistent/transcripts"), output.path())
        .run(&generator)
        .await
        .unwrap_err();

    assert!(matches!(err, BatchError::List { .. }));
}

#[tokio::test]
async fn test_output_dir_created_before_processing() {
    let input = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let nested = scratch.path().join("records").join("run1");
    write_input(input.path(), "a.md", "a");

    let generator = MockGenerator::new("{}");
    runner(input.path(), &nested).run(&generator).await.unwrap();

    assert!(nested.join("a.json").exists());
}
