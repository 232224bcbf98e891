//! TypeScript type stripping
//!
//! A textual, best-effort rewrite that removes common type-level syntax so the
//! result can run as plain JavaScript. This is not a parser. It handles:
//!
//! - `import type { .. } from '..'` statements
//! - single-line `type X = ...;` aliases
//! - `interface X { .. }` / `type X = { .. }` declarations without nested braces
//! - `<T, U>` generic parameter lists of plain identifiers
//! - `: Type`, `: Type[]` and `: A | B` annotations followed by `=`, `,`, `)`, `]` or `}`
//! - `as Type` assertions
//!
//! Known gaps: nested generics (`Map<string, Array<number>>`), interfaces whose
//! bodies contain braces, decorators, enums, access modifiers, optional
//! parameters (`x?: T`), return type annotations followed by `{`, non-null
//! assertions and `satisfies`. The annotation rule also rewrites object literal
//! entries and ternary branches whose value is a bare identifier followed by
//! one of the terminators (`{ a: b }` becomes `{ a }`).

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Error)]
pub enum TransformError {
    #[error("invalid type-stripping rule '{rule}': {source}")]
    InvalidRule {
        rule: &'static str,
        #[source]
        source: regex::Error,
    },
}

struct StripRule {
    name: &'static str,
    pattern: &'static str,
    replacement: &'static str,
}

// Order matters: generics go before annotations so `x: Array<T> = ..` reduces
// to `x: Array = ..` before the annotation rule sees it.
const STRIP_RULES: &[StripRule] = &[
    StripRule {
        name: "type-import",
        pattern: r#"import\s+type\s+\{[^}]*\}\s+from\s+['"][^'"]+['"];?\n?"#,
        replacement: "",
    },
    StripRule {
        name: "type-alias",
        pattern: r"(?m)^[ \t]*(?:export[ \t]+)?type[ \t]+\w+(?:<[^>\n]*>)?[ \t]*=[ \t]*[^{\s][^;\n]*;?[ \t]*$",
        replacement: "",
    },
    StripRule {
        name: "type-declaration",
        pattern: r"(?m)^[ \t]*(?:export[ \t]+)?(?:interface|type)[ \t]+\w+[^{}\n]*\{[^}]*\};?",
        replacement: "",
    },
    StripRule {
        name: "generic-parameters",
        pattern: r"<\w+(?:\s*,\s*\w+)*>",
        replacement: "",
    },
    StripRule {
        name: "annotation",
        pattern: r":\s*[A-Za-z_$][\w$]*(?:\[\])?(?:\s*\|\s*[A-Za-z_$][\w$]*(?:\[\])?)*(?P<tail>\s*[=,)\]}])",
        replacement: "${tail}",
    },
    StripRule {
        name: "assertion",
        pattern: r"\s+as\s+\w+(?:\[\])?",
        replacement: "",
    },
];

struct CompiledRule {
    name: &'static str,
    regex: Regex,
    replacement: &'static str,
}

static COMPILED_RULES: Lazy<Result<Vec<CompiledRule>, TransformError>> = Lazy::new(|| {
    STRIP_RULES
        .iter()
        .map(|rule| {
            Regex::new(rule.pattern)
                .map(|regex| CompiledRule {
                    name: rule.name,
                    regex,
                    replacement: rule.replacement,
                })
                .map_err(|source| TransformError::InvalidRule {
                    rule: rule.name,
                    source,
                })
        })
        .collect()
});

/// Strip type-level syntax from TypeScript source
pub fn strip_types(source: &str) -> Result<String, TransformError> {
    let rules = COMPILED_RULES.as_ref().map_err(Clone::clone)?;

    let mut script = source.to_owned();
    for rule in rules {
        let rewritten = rule.regex.replace_all(&script, rule.replacement);
        if rewritten != script {
            debug!(rule = rule.name, "applied type-stripping rule");
            script = rewritten.into_owned();
        }
    }

    Ok(script)
}
