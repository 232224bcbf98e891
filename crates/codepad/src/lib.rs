//! A library for sandboxed in-process JavaScript/TypeScript execution.
//!
//! Codepad runs untrusted snippets in a fresh embedded QuickJS context whose
//! only capability is a capture-only `console`. Timers and network APIs are
//! bound to `undefined`, and nothing from the host process is reachable.
//!
//! # Features
//!
//! - **Isolated scope** — A new engine runtime per run; no state survives between calls.
//! - **Captured console** — `log`, `error`, `warn` and `info` collected as ordered lines.
//! - **TypeScript** — Common type annotations stripped before execution.
//! - **Deadline** — Wall-clock timeout enforced by engine interrupts, infinite loops included.
//!   Native engine work that never polls for interrupts (regex backtracking) is
//!   abandoned at the deadline plus a grace period; its thread runs on detached,
//!   holding one of the runner's bounded worker slots.
//! - **Limits** — Heap, stack and captured output caps.
//! - **TOML configuration** — Language catalog and default limits.
//!
//! ```rust,ignore
//! let runner = Runner::with_defaults();
//! let result = runner.run("console.log(1 + 1)", "javascript").await;
//! assert_eq!(result.output(), "2");
//! ```

pub use config::{Config, ConfigError, Dialect, EXAMPLE_CONFIG, Language};
pub use runner::{DEFAULT_MAX_WORKERS, ExecuteError, Runner};
pub use sandbox::{SandboxError, run_script};
pub use transform::{TransformError, strip_types};
pub use types::{DEFAULT_TIMEOUT_MS, ExecutionLimits, ExecutionReport, ExecutionResult};

pub mod config;
pub mod runner;
pub mod sandbox;
pub mod transform;
pub mod types;
