//! Scope splitter — first pipeline stage.
//!
//! Turns a block body into an ordered sequence of [`CodeUnit`]s, each
//! either one `;`-terminated statement or one whole nested scope (header,
//! braces, and everything between). A single left-to-right scan tracks
//! brace depth and quote state:
//!
//!   - inside a double-quoted string every `;`, `{` and `}` is plain text;
//!     an unescaped `"` toggles the string state
//!   - a scope only closes when its *outermost* `}` is reached, so inner
//!     scopes ride along inside their parent's unit
//!   - text after the last terminator that never completes a statement or
//!     scope is dropped, and a stray `}` drives depth negative, which
//!     suspends statement splitting until braces rebalance (malformed
//!     input never panics)

/// One splitter output: a statement or a whole scope, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeUnit {
    pub text: String,
    pub is_scope: bool,
}

impl CodeUnit {
    pub fn statement(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_scope: false }
    }

    pub fn scope(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_scope: true }
    }
}

/// Split a block body into statement and scope units. Empty statements
/// (stray `;`) are kept as empty units; they later decode to `Null`.
pub fn split_units(code: &str) -> Vec<CodeUnit> {
    let mut units = Vec::new();
    let mut depth: i32 = 0;
    let mut quoted = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in code.char_indices() {
        let was_escaped = escaped;
        escaped = c == '\\' && !was_escaped;
        if c == '"' && !was_escaped {
            quoted = !quoted;
            continue;
        }
        if quoted {
            continue;
        }
        match c {
            ';' if depth == 0 => {
                units.push(CodeUnit::statement(code[start..i].trim()));
                start = i + 1;
            }
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    units.push(CodeUnit::scope(code[start..=i].trim()));
                    start = i + 1;
                }
            }
            _ => {}
        }
    }

    units
}
