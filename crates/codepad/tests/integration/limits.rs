use std::time::{Duration, Instant};

use codepad::{Config, ExecuteError, ExecutionLimits, Runner};

use super::{fixture_source, test_runner};

#[tokio::test]
async fn test_infinite_loop_times_out() {
    let runner = test_runner();
    let limits = ExecutionLimits::unset().with_timeout_ms(200);
    let started = Instant::now();
    let result = runner
        .run_with_limits(&fixture_source("infinite_loop.js"), "javascript", Some(&limits))
        .await;

    assert_eq!(result.output(), "");
    assert_eq!(
        result.error().as_deref(),
        Some("Execution timeout (0.2s limit)")
    );
    assert!(result.elapsed_ms() >= 200.0);
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_uninterruptible_work_is_abandoned_at_deadline() {
    let runner = Runner::new(Config::default()).with_max_workers(2);
    let limits = ExecutionLimits::unset().with_timeout_ms(200);
    let started = Instant::now();
    let result = runner
        .run_with_limits(
            "console.log(/^(a+)+$/.test('a'.repeat(40) + 'b'));",
            "javascript",
            Some(&limits),
        )
        .await;

    assert_eq!(
        result.error().as_deref(),
        Some("Execution timeout (0.2s limit)")
    );
    assert!(started.elapsed() < Duration::from_secs(3));
    // The engine thread is still matching and keeps its worker slot
    assert_eq!(runner.available_workers(), 1);
}

#[tokio::test]
async fn test_default_timeout_message() {
    let runner = test_runner();
    assert_eq!(runner.config().default_limits.timeout(), Duration::from_secs(5));
    assert_eq!(
        ExecuteError::Timeout(runner.config().default_limits.timeout()).to_string(),
        "Execution timeout (5s limit)"
    );
}

#[tokio::test]
async fn test_output_before_timeout_is_discarded() {
    let runner = test_runner();
    let limits = ExecutionLimits::unset().with_timeout_ms(100);
    let result = runner
        .run_with_limits("console.log('started'); for (;;) {}", "javascript", Some(&limits))
        .await;

    assert!(matches!(result.failure(), Some(ExecuteError::Timeout(_))));
    assert_eq!(result.output(), "");
}

#[tokio::test]
async fn test_output_limit() {
    let runner = test_runner();
    let limits = ExecutionLimits::unset().with_max_output(1);
    let result = runner
        .run_with_limits(
            "for (let i = 0; i < 10000; i++) console.log('line ' + i);",
            "javascript",
            Some(&limits),
        )
        .await;

    assert_eq!(
        result.error().as_deref(),
        Some("Output limit exceeded (1 KB)")
    );
    assert_eq!(result.output(), "");
}

#[tokio::test]
async fn test_memory_limit() {
    let runner = test_runner();
    let limits = ExecutionLimits::unset().with_memory_limit(4 * 1024);
    let result = runner
        .run_with_limits(
            "const chunks = []; for (;;) chunks.push(new Array(100000).fill(1));",
            "javascript",
            Some(&limits),
        )
        .await;

    assert!(!result.is_success());
    assert_eq!(result.output(), "");
}

#[tokio::test]
async fn test_stack_overflow_is_caught() {
    let runner = test_runner();
    let result = runner
        .run("function f() { return f(); } f();", "javascript")
        .await;

    assert!(!result.is_success());
    assert!(matches!(result.failure(), Some(ExecuteError::Runtime(_))));
}
