//! Code runner for Codepad
//!
//! Provides the high-level API for running JavaScript and TypeScript source in
//! the sandbox. Every run resolves to an [`ExecutionResult`]; failures are
//! values, never errors returned to the caller.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Semaphore;

pub use crate::runner::execute::execute;

mod execute;

use crate::{
    config::{Config, Dialect},
    sandbox::SandboxError,
    transform::TransformError,
    types::{ExecutionLimits, ExecutionResult},
};

/// Reasons a run fails. `Display` is the text shown to the user.
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error(
        "Browser execution not supported for {0}. Only JavaScript/TypeScript can be run in the browser."
    )]
    UnsupportedLanguage(String),

    #[error("{0}")]
    Transform(#[from] TransformError),

    #[error("{0}")]
    Syntax(String),

    #[error("{0}")]
    Runtime(String),

    #[error("Execution timeout ({}s limit)", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("Output limit exceeded ({} KB)", .0 / 1024)]
    OutputLimit(usize),

    #[error("Unknown error occurred")]
    Unknown,

    #[error("{0}")]
    Internal(String),
}

impl ExecuteError {
    /// Short machine-readable name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            ExecuteError::UnsupportedLanguage(_) => "unsupported_language",
            ExecuteError::Transform(_) => "transform",
            ExecuteError::Syntax(_) => "syntax",
            ExecuteError::Runtime(_) => "runtime",
            ExecuteError::Timeout(_) => "timeout",
            ExecuteError::OutputLimit(_) => "output_limit",
            ExecuteError::Unknown => "unknown",
            ExecuteError::Internal(_) => "internal",
        }
    }
}

impl From<SandboxError> for ExecuteError {
    fn from(err: SandboxError) -> Self {
        match err {
            SandboxError::Setup(message) => ExecuteError::Internal(message),
            SandboxError::Syntax(message) => ExecuteError::Syntax(message),
            SandboxError::Thrown { message, .. } => ExecuteError::Runtime(message),
            SandboxError::NonErrorThrown => ExecuteError::Unknown,
            SandboxError::Timeout(limit) => ExecuteError::Timeout(limit),
            SandboxError::OutputLimit { limit } => ExecuteError::OutputLimit(limit),
            SandboxError::Engine(message) => ExecuteError::Runtime(message),
        }
    }
}

/// Default number of engine threads a runner keeps alive at once
pub const DEFAULT_MAX_WORKERS: usize = 16;

/// High-level runner for code execution
///
/// Clones share one worker pool. A worker abandoned at its deadline keeps
/// its slot until the engine thread returns.
#[derive(Debug, Clone)]
pub struct Runner {
    config: Config,
    workers: Arc<Semaphore>,
}

impl Runner {
    /// Create a new runner with the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            config,
            workers: Arc::new(Semaphore::new(DEFAULT_MAX_WORKERS)),
        }
    }

    /// Create a new runner with default configuration
    pub fn with_defaults() -> Self {
        Self::new(Config::default())
    }

    /// Limit the number of engine threads alive at once
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.workers = Arc::new(Semaphore::new(max_workers));
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Engine threads that can start right now
    pub fn available_workers(&self) -> usize {
        self.workers.available_permits()
    }

    /// Check if the runner can execute the given language tag
    pub fn is_executable(&self, language: &str) -> bool {
        Dialect::for_tag(language).is_executable()
    }

    /// Run source code with the configured default limits
    pub async fn run(&self, source: &str, language: &str) -> ExecutionResult {
        execute::execute(&self.config, source, language, None, &self.workers).await
    }

    /// Run source code, overriding individual default limits
    pub async fn run_with_limits(
        &self,
        source: &str,
        language: &str,
        limits: Option<&ExecutionLimits>,
    ) -> ExecutionResult {
        execute::execute(&self.config, source, language, limits, &self.workers).await
    }
}
