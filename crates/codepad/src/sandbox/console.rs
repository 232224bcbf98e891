//! Output-capturing console
//!
//! The only capability handed to sandboxed code. Each channel formats its
//! arguments, joins them with a single space and appends one line to the
//! capture buffer.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use rquickjs::prelude::Rest;
use rquickjs::{CatchResultExt, CaughtError, Ctx, Function, Null, Object, Value};

use crate::sandbox::engine::Tripwire;

/// A console method exposed to sandboxed code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Log,
    Error,
    Warn,
    Info,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Log, Channel::Error, Channel::Warn, Channel::Info];

    /// Method name on the `console` object
    pub fn method(&self) -> &'static str {
        match self {
            Channel::Log => "log",
            Channel::Error => "error",
            Channel::Warn => "warn",
            Channel::Info => "info",
        }
    }

    /// Tag prepended to every line written through this channel
    pub fn prefix(&self) -> &'static str {
        match self {
            Channel::Log | Channel::Info => "",
            Channel::Error => "[Error] ",
            Channel::Warn => "[Warning] ",
        }
    }

    /// Build one capture line from already formatted arguments
    pub fn render(&self, formatted: &[String]) -> String {
        format!("{}{}", self.prefix(), formatted.join(" "))
    }
}

/// Ordered lines captured during one run
#[derive(Debug, Default)]
pub struct CaptureBuffer {
    lines: Vec<String>,
    /// Length of the newline-joined output so far
    bytes: usize,
    limit: Option<usize>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer that refuses lines once the joined output would exceed `limit` bytes
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Append a line. Returns `false` and drops the line if it would exceed the limit.
    pub fn push(&mut self, line: String) -> bool {
        let separator = usize::from(!self.lines.is_empty());
        let bytes = self.bytes + separator + line.len();
        if self.limit.is_some_and(|limit| bytes > limit) {
            return false;
        }
        self.bytes = bytes;
        self.lines.push(line);
        true
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Captured lines joined with `\n`
    pub fn output(&self) -> String {
        self.lines.join("\n")
    }
}

/// Build the `console` object handed to sandboxed code
pub(crate) fn install_console<'js>(
    ctx: &Ctx<'js>,
    buffer: &Rc<RefCell<CaptureBuffer>>,
    tripwire: &Arc<Tripwire>,
) -> rquickjs::Result<Object<'js>> {
    let console = Object::new(ctx.clone())?;

    for channel in Channel::ALL {
        let buffer = Rc::clone(buffer);
        let tripwire = Arc::clone(tripwire);
        let method = Function::new(
            ctx.clone(),
            move |ctx: Ctx<'js>, args: Rest<Value<'js>>| -> rquickjs::Result<()> {
                // Format before borrowing: toJSON/toString may log re-entrantly
                let formatted = args
                    .0
                    .into_iter()
                    .map(|value| format_value(&ctx, value))
                    .collect::<rquickjs::Result<Vec<_>>>()?;
                if !buffer.borrow_mut().push(channel.render(&formatted)) {
                    tripwire.trip_output();
                }
                Ok(())
            },
        )?;
        console.set(channel.method(), method)?;
    }

    Ok(console)
}

/// Format one logged value.
///
/// `null` and `undefined` print literally, object-like values print as
/// two-space indented JSON falling back to `String(value)`, everything else
/// prints as `String(value)`. An object that serializes to nothing (a `toJSON`
/// returning `undefined`) prints as an empty string. An exception thrown by
/// `String(value)` propagates to the script.
pub fn format_value<'js>(ctx: &Ctx<'js>, value: Value<'js>) -> rquickjs::Result<String> {
    if value.is_null() {
        return Ok("null".to_owned());
    }
    if value.is_undefined() {
        return Ok("undefined".to_owned());
    }
    if value.is_object()
        && !value.is_function()
        && let Some(json) = stringify_pretty(ctx, &value)?
    {
        return Ok(json);
    }
    display_string(ctx, value)
}

fn stringify_pretty<'js>(ctx: &Ctx<'js>, value: &Value<'js>) -> rquickjs::Result<Option<String>> {
    let json: Object = ctx.globals().get("JSON")?;
    let stringify: Function = json.get("stringify")?;
    match stringify
        .call::<_, Option<String>>((value.clone(), Null, 2))
        .catch(ctx)
    {
        Ok(text) => Ok(Some(text.unwrap_or_default())),
        Err(CaughtError::Error(err)) => Err(err),
        // Cyclic structures, BigInt members, throwing toJSON
        Err(_) => Ok(None),
    }
}

fn display_string<'js>(ctx: &Ctx<'js>, value: Value<'js>) -> rquickjs::Result<String> {
    let string: Function = ctx.globals().get("String")?;
    string.call((value,))
}
