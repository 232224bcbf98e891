//! Execution step for code running
//!
//! Validates the language, strips TypeScript types when needed, and runs the
//! script on a dedicated engine thread racing a wall-clock timer.
//!
//! The engine preempts itself at the deadline while it is interpreting. Native
//! work that never polls the interrupt handler, such as a catastrophically
//! backtracking regular expression, runs on past it. The run still fails with
//! a timeout once the grace period is over. The engine thread is detached and
//! keeps its worker permit until it returns, so runaway threads are bounded by
//! the worker limit and never block runtime shutdown.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Semaphore, oneshot};
use tracing::{debug, info, instrument, warn};

use crate::config::{Config, Dialect};
use crate::runner::ExecuteError;
use crate::sandbox::run_script;
use crate::transform::strip_types;
use crate::types::{ExecutionLimits, ExecutionResult};

/// Extra time the worker gets past its deadline before the race gives up on it
const WATCHDOG_GRACE: Duration = Duration::from_millis(500);

/// Run source in a fresh sandbox.
///
/// Only the `javascript` and `typescript` tags run, whatever the catalog
/// contains. Other tags are rejected with zero elapsed time. Any other
/// failure, including the timeout, is reported with the time spent.
#[instrument(skip(config, source, limits, workers), fields(source_len = source.len()))]
pub async fn execute(
    config: &Config,
    source: &str,
    language: &str,
    limits: Option<&ExecutionLimits>,
    workers: &Arc<Semaphore>,
) -> ExecutionResult {
    let started = Instant::now();

    let dialect = Dialect::for_tag(language);
    if !dialect.is_executable() {
        warn!(language, "language not executable in sandbox");
        return ExecutionResult::Failed {
            error: ExecuteError::UnsupportedLanguage(language.to_owned()),
            elapsed_ms: 0.0,
        };
    }

    let effective_limits = config.effective_limits(limits);
    let outcome = run_in_sandbox(source, dialect, effective_limits, workers).await;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    match outcome {
        Ok(output) => {
            info!(
                elapsed_ms,
                output_lines = output.lines().count(),
                "execution complete"
            );
            ExecutionResult::Completed { output, elapsed_ms }
        }
        Err(error) => {
            warn!(elapsed_ms, kind = error.kind(), %error, "execution failed");
            ExecutionResult::Failed { error, elapsed_ms }
        }
    }
}

async fn run_in_sandbox(
    source: &str,
    dialect: Dialect,
    limits: ExecutionLimits,
    workers: &Arc<Semaphore>,
) -> Result<String, ExecuteError> {
    let script = if dialect == Dialect::TypeScript {
        let stripped = strip_types(source)?;
        debug!(
            before = source.len(),
            after = stripped.len(),
            "stripped type annotations"
        );
        stripped
    } else {
        source.to_owned()
    };

    let timeout = limits.timeout();
    let worker = async {
        let permit = Arc::clone(workers)
            .acquire_owned()
            .await
            .map_err(|_| ExecuteError::Internal("sandbox worker pool closed".to_owned()))?;

        let (tx, rx) = oneshot::channel();
        std::thread::Builder::new()
            .name("codepad-engine".to_owned())
            .spawn(move || {
                let _permit = permit;
                let result = run_script(&script, &limits);
                if tx.send(result).is_err() {
                    warn!("engine thread finished after its run was abandoned");
                }
            })
            .map_err(|e| ExecuteError::Internal(format!("failed to spawn sandbox worker: {e}")))?;

        rx.await
            .map_err(|_| ExecuteError::Internal("sandbox worker panicked".to_owned()))
    };

    // The engine interrupts itself at the deadline; this race catches a worker
    // stuck where the interrupt handler is never polled, and a pool saturated
    // by such workers.
    match tokio::time::timeout(timeout.saturating_add(WATCHDOG_GRACE), worker).await {
        Ok(result) => result?.map_err(ExecuteError::from),
        Err(_) => {
            warn!(?timeout, "sandbox worker missed its deadline, abandoning it");
            Err(ExecuteError::Timeout(timeout))
        }
    }
}
