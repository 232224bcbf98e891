//! Script engine driver
//!
//! Every run gets a brand new QuickJS runtime and context. The runtime's
//! interrupt handler enforces the wall-clock deadline, which preempts
//! synchronous loops as well as code waiting on promise jobs.
//!
//! The handler only runs between bytecode instructions. A single native call
//! that loops internally, like a backtracking regular expression match, is
//! not interrupted and finishes late; [`run_script`] then reports the timeout.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rquickjs::{CatchResultExt, Context, Ctx, Runtime};
use tracing::{debug, instrument};

use crate::sandbox::SandboxError;
use crate::sandbox::console::{CaptureBuffer, install_console};
use crate::sandbox::scope::{call_scoped, compile_scoped, neutralize_globals};
use crate::types::ExecutionLimits;

/// Abort conditions polled by the engine's interrupt handler
#[derive(Debug)]
pub(crate) struct Tripwire {
    deadline: Option<Instant>,
    timed_out: AtomicBool,
    output_exceeded: AtomicBool,
}

impl Tripwire {
    pub(crate) fn new(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(timeout),
            timed_out: AtomicBool::new(false),
            output_exceeded: AtomicBool::new(false),
        }
    }

    fn should_interrupt(&self) -> bool {
        if self.output_exceeded.load(Ordering::SeqCst) {
            return true;
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.timed_out.store(true, Ordering::SeqCst);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn trip_output(&self) {
        self.output_exceeded.store(true, Ordering::SeqCst);
    }

    fn timed_out(&self) -> bool {
        self.timed_out.load(Ordering::SeqCst)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    fn output_exceeded(&self) -> bool {
        self.output_exceeded.load(Ordering::SeqCst)
    }
}

/// Run a plain JavaScript script in a fresh sandbox and return its captured output.
///
/// Blocks the calling thread until the script, and every promise job it
/// queued, has finished or the deadline has passed.
#[instrument(skip(script), fields(script_len = script.len()))]
pub fn run_script(script: &str, limits: &ExecutionLimits) -> Result<String, SandboxError> {
    let timeout = limits.timeout();
    let tripwire = Arc::new(Tripwire::new(timeout));
    let buffer = Rc::new(RefCell::new(CaptureBuffer::with_limit(
        limits.max_output_bytes(),
    )));

    let runtime = Runtime::new().map_err(|e| SandboxError::Setup(e.to_string()))?;
    if let Some(bytes) = limits.memory_limit_bytes() {
        runtime.set_memory_limit(bytes);
    }
    if let Some(bytes) = limits.stack_limit_bytes() {
        runtime.set_max_stack_size(bytes);
    }
    let handler_tripwire = Arc::clone(&tripwire);
    runtime.set_interrupt_handler(Some(Box::new(move || handler_tripwire.should_interrupt())));

    let context = Context::full(&runtime).map_err(|e| SandboxError::Setup(e.to_string()))?;

    let outcome = context
        .with(|ctx| evaluate(&ctx, script, &buffer, &tripwire))
        .and_then(|()| drain_jobs(&runtime));

    if tripwire.output_exceeded() {
        return Err(SandboxError::OutputLimit {
            limit: buffer.borrow().limit().unwrap_or_default(),
        });
    }
    if tripwire.timed_out() {
        return Err(SandboxError::Timeout(timeout));
    }
    outcome?;

    let buffer = buffer.borrow();
    debug!(lines = buffer.lines().len(), "script finished");
    Ok(buffer.output())
}

fn evaluate<'js>(
    ctx: &Ctx<'js>,
    script: &str,
    buffer: &Rc<RefCell<CaptureBuffer>>,
    tripwire: &Arc<Tripwire>,
) -> Result<(), SandboxError> {
    neutralize_globals(ctx).map_err(|e| SandboxError::Setup(e.to_string()))?;
    let console =
        install_console(ctx, buffer, tripwire).map_err(|e| SandboxError::Setup(e.to_string()))?;

    let scoped = compile_scoped(ctx, script)
        .catch(ctx)
        .map_err(SandboxError::from_caught)?;
    call_scoped(&scoped, console)
        .catch(ctx)
        .map_err(SandboxError::from_caught)?;

    Ok(())
}

/// Run queued promise jobs until none remain
fn drain_jobs(runtime: &Runtime) -> Result<(), SandboxError> {
    let mut jobs = 0usize;
    loop {
        match runtime.execute_pending_job() {
            Ok(true) => jobs += 1,
            Ok(false) => {
                if jobs > 0 {
                    debug!(jobs, "drained promise jobs");
                }
                return Ok(());
            }
            Err(job) => {
                return Err(job.0.with(|ctx| SandboxError::from_thrown(ctx.catch())));
            }
        }
    }
}
