//! Embedded script sandbox
//!
//! This module provides an in-process JavaScript sandbox built on QuickJS. A
//! sandboxed run sees a minimal global environment: the language intrinsics,
//! a capture-only `console`, and `undefined` in place of timers and network
//! APIs. There is no filesystem, module loader or host object reachable from
//! the script.

use std::time::Duration;

use rquickjs::{CaughtError, Exception, Value};
use thiserror::Error;

pub use crate::sandbox::console::{CaptureBuffer, Channel, format_value};
pub use crate::sandbox::engine::run_script;
pub use crate::sandbox::scope::{BLOCKED_GLOBALS, scope_body, scope_parameters};

mod console;
mod engine;
mod scope;

/// Errors that occur while running a script in the sandbox
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("failed to set up script engine: {0}")]
    Setup(String),

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("uncaught {}: {message}", .name.as_deref().unwrap_or("error"))]
    Thrown {
        name: Option<String>,
        message: String,
    },

    #[error("uncaught non-error value")]
    NonErrorThrown,

    #[error("deadline of {0:?} exceeded")]
    Timeout(Duration),

    #[error("captured output exceeded {limit} bytes")]
    OutputLimit { limit: usize },

    #[error("engine error: {0}")]
    Engine(String),
}

impl SandboxError {
    pub(crate) fn from_caught(caught: CaughtError<'_>) -> Self {
        match caught {
            CaughtError::Exception(exception) => Self::from_exception(&exception),
            CaughtError::Value(_) => SandboxError::NonErrorThrown,
            CaughtError::Error(err) => SandboxError::Engine(err.to_string()),
        }
    }

    pub(crate) fn from_thrown(value: Value<'_>) -> Self {
        match value.into_object().and_then(Exception::from_object) {
            Some(exception) => Self::from_exception(&exception),
            None => SandboxError::NonErrorThrown,
        }
    }

    fn from_exception(exception: &Exception<'_>) -> Self {
        let name = exception
            .as_object()
            .get::<_, Option<String>>("name")
            .ok()
            .flatten();
        let message = exception.message().unwrap_or_default();

        if name.as_deref() == Some("SyntaxError") {
            SandboxError::Syntax(message)
        } else {
            SandboxError::Thrown { name, message }
        }
    }
}
