use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::runner::ExecuteError;

/// Wall-clock limit applied when none is configured
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionLimits {
    /// Wall clock time limit in milliseconds
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Engine heap limit in kilobytes
    #[serde(default)]
    pub memory_limit: Option<u64>,

    /// Engine stack size limit in kilobytes
    #[serde(default)]
    pub stack_limit: Option<u64>,

    /// Maximum captured output in kilobytes
    #[serde(default)]
    pub max_output: Option<u64>,
}

impl ExecutionLimits {
    /// 1 kilobyte in bytes
    pub const KB: u64 = 1;
    /// 1 megabyte in kilobytes
    pub const MB: u64 = 1024;

    /// Create new execution limits with the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits with every field unset, useful as an override base
    pub fn unset() -> Self {
        Self {
            timeout_ms: None,
            memory_limit: None,
            stack_limit: None,
            max_output: None,
        }
    }

    /// Set the wall clock time limit in milliseconds
    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = Some(ms);
        self
    }

    /// Set the engine heap limit in kilobytes
    pub fn with_memory_limit(mut self, kb: u64) -> Self {
        self.memory_limit = Some(kb);
        self
    }

    /// Set the engine stack limit in kilobytes
    pub fn with_stack_limit(mut self, kb: u64) -> Self {
        self.stack_limit = Some(kb);
        self
    }

    /// Set the maximum captured output in kilobytes
    pub fn with_max_output(mut self, kb: u64) -> Self {
        self.max_output = Some(kb);
        self
    }

    /// Apply overrides from another ExecutionLimits, preferring values from `overrides`
    pub fn with_overrides(&self, overrides: &ExecutionLimits) -> ExecutionLimits {
        ExecutionLimits {
            timeout_ms: overrides.timeout_ms.or(self.timeout_ms),
            memory_limit: overrides.memory_limit.or(self.memory_limit),
            stack_limit: overrides.stack_limit.or(self.stack_limit),
            max_output: overrides.max_output.or(self.max_output),
        }
    }

    /// The wall clock limit. The timeout cannot be disabled; an unset value
    /// falls back to [`DEFAULT_TIMEOUT_MS`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS))
    }

    /// Heap limit in bytes, if any
    pub fn memory_limit_bytes(&self) -> Option<usize> {
        self.memory_limit.map(kb_to_bytes)
    }

    /// Stack limit in bytes, if any
    pub fn stack_limit_bytes(&self) -> Option<usize> {
        self.stack_limit.map(kb_to_bytes)
    }

    /// Output cap in bytes, if any
    pub fn max_output_bytes(&self) -> Option<usize> {
        self.max_output.map(kb_to_bytes)
    }
}

impl Default for ExecutionLimits {
    fn default() -> Self {
        Self {
            timeout_ms: Some(DEFAULT_TIMEOUT_MS),
            memory_limit: Some(64 * Self::MB),
            stack_limit: Some(Self::MB),
            max_output: Some(Self::MB),
        }
    }
}

fn kb_to_bytes(kb: u64) -> usize {
    usize::try_from(kb.saturating_mul(1024)).unwrap_or(usize::MAX)
}

/// Outcome of one sandboxed run.
///
/// A run either completes with its captured output or fails with an
/// [`ExecuteError`]; partial output captured before a failure is discarded.
#[derive(Debug)]
pub enum ExecutionResult {
    Completed { output: String, elapsed_ms: f64 },
    Failed { error: ExecuteError, elapsed_ms: f64 },
}

impl ExecutionResult {
    /// Check if the run completed without error
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Completed { .. })
    }

    /// Captured output, empty on failure
    pub fn output(&self) -> &str {
        match self {
            ExecutionResult::Completed { output, .. } => output,
            ExecutionResult::Failed { .. } => "",
        }
    }

    /// User-facing error text, if the run failed
    pub fn error(&self) -> Option<String> {
        match self {
            ExecutionResult::Completed { .. } => None,
            ExecutionResult::Failed { error, .. } => Some(error.to_string()),
        }
    }

    /// The failure, if any
    pub fn failure(&self) -> Option<&ExecuteError> {
        match self {
            ExecutionResult::Completed { .. } => None,
            ExecutionResult::Failed { error, .. } => Some(error),
        }
    }

    /// Wall clock time from request start to completion or failure
    pub fn elapsed_ms(&self) -> f64 {
        match self {
            ExecutionResult::Completed { elapsed_ms, .. }
            | ExecutionResult::Failed { elapsed_ms, .. } => *elapsed_ms,
        }
    }

    /// Flatten into the display record
    pub fn report(&self) -> ExecutionReport {
        ExecutionReport {
            output: self.output().to_owned(),
            error: self.error(),
            elapsed_ms: self.elapsed_ms(),
        }
    }
}

/// Flat, serializable view of an [`ExecutionResult`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    pub output: String,
    pub error: Option<String>,
    pub elapsed_ms: f64,
}

impl From<&ExecutionResult> for ExecutionReport {
    fn from(result: &ExecutionResult) -> Self {
        result.report()
    }
}
