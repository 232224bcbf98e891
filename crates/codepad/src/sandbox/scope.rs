//! Execution scope construction
//!
//! Sandboxed source becomes the body of a strict-mode function whose
//! parameters are the capture console and the blocked capabilities. The
//! function is built with the engine's `Function` constructor so the source is
//! parsed on its own and cannot close the wrapper early.

use rquickjs::{Ctx, Function, Object, Undefined, Value};

/// Host capabilities bound to `undefined` inside the sandbox
pub const BLOCKED_GLOBALS: [&str; 4] = ["setTimeout", "setInterval", "fetch", "XMLHttpRequest"];

const CONSOLE_PARAM: &str = "console";

/// Comma-separated parameter list of the scoped function
pub fn scope_parameters() -> String {
    std::iter::once(CONSOLE_PARAM)
        .chain(BLOCKED_GLOBALS)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Strict-mode function body for the given script
pub fn scope_body(script: &str) -> String {
    format!("\"use strict\";\n{script}")
}

/// Bind every blocked capability to `undefined` on the global object
pub(crate) fn neutralize_globals(ctx: &Ctx<'_>) -> rquickjs::Result<()> {
    let globals = ctx.globals();
    for name in BLOCKED_GLOBALS {
        globals.set(name, Undefined)?;
    }
    Ok(())
}

/// Compile the script into the scoped function. Syntax errors surface here.
pub(crate) fn compile_scoped<'js>(ctx: &Ctx<'js>, script: &str) -> rquickjs::Result<Function<'js>> {
    let constructor: Function = ctx.globals().get("Function")?;
    constructor.call((scope_parameters(), scope_body(script)))
}

/// Call the scoped function with the console and `undefined` for each blocked capability
pub(crate) fn call_scoped<'js>(
    scoped: &Function<'js>,
    console: Object<'js>,
) -> rquickjs::Result<()> {
    let _: Value = scoped.call((console, Undefined, Undefined, Undefined, Undefined))?;
    Ok(())
}
