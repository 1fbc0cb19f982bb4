//! Operator tables.
//!
//! Source operators come in two textual shapes: binary operators written
//! with a space on each side (`x = a + b`), and function-style operators
//! written as a call (`x = sqrt(y)`). Detection is by substring containment
//! in a fixed priority order, so a line holding several candidate patterns
//! always resolves to the one earliest in the table.
//! Integer divide `//` is the one binary operator matched without
//! surrounding spaces.

use crate::errors::CompileError;

/// Recognition patterns in priority order, paired with the source token
/// each pattern stands for. Binary patterns keep their spaces so `<=` can
/// never be mistaken for `<`; function patterns run up to the opening
/// parenthesis.
const PATTERNS: &[(&str, &str)] = &[
    (" + ", "+"), (" - ", "-"), (" * ", "*"), (" / ", "/"), ("//", "//"),
    (" % ", "%"), (" ^ ", "^"),
    (" == ", "=="), (" != ", "!="), (" && ", "&&"),
    (" < ", "<"), (" <= ", "<="), (" > ", ">"), (" >= ", ">="), (" === ", "==="),
    (" << ", "<<"), (" >> ", ">>"), (" | ", "|"), (" & ", "&"), (" xor ", "xor"),
    (" flip(", "flip"),
    (" max(", "max"), (" min(", "min"), (" angle(", "angle"), (" len(", "len"),
    (" noise(", "noise"), (" abs(", "abs"), (" log(", "log"), (" log10(", "log10"),
    (" floor(", "floor"), (" ceil(", "ceil"), (" sqrt(", "sqrt"), (" rand(", "rand"),
    (" sin(", "sin"), (" cos(", "cos"), (" tan(", "tan"),
    (" asin(", "asin"), (" acos(", "acos"), (" atan(", "atan"),
];

/// Find the first operator pattern (by table priority, not position in the
/// line) contained in `line`. Returns the source token and the byte offset
/// of the token itself, so the caller can cut exactly the token out of the
/// matched occurrence.
pub fn find_operator(line: &str) -> Option<(&'static str, usize)> {
    for (pattern, token) in PATTERNS {
        if let Some(at) = line.find(pattern) {
            let skip = usize::from(pattern.starts_with(' '));
            return Some((token, at + skip));
        }
    }
    None
}

/// Translate a source operator token to its mlog opcode. Tokens without a
/// dedicated opcode (`xor` and the math functions) pass through unchanged.
pub fn mlog_op(op: &str) -> &str {
    match op {
        "+" => "add",
        "-" => "sub",
        "*" => "mul",
        "/" => "div",
        "//" => "idiv",
        "%" => "mod",
        "^" => "pow",
        "==" => "equal",
        "!=" => "notEqual",
        "&&" => "land",
        "<" => "lessThan",
        "<=" => "lessThanEq",
        ">" => "greaterThan",
        ">=" => "greaterThanEq",
        "===" => "strictEqual",
        "<<" => "shl",
        ">>" => "shr",
        "|" => "or",
        "&" => "and",
        "flip" => "not",
        other => other,
    }
}

/// Negate one of the six relational operators. `if`/`while` lowering jumps
/// past the body when the condition fails, so the emitted jump carries the
/// inverse of the written comparison. Anything else (including `===`,
/// which has no single-instruction inverse) is an error.
pub fn inverse_op(op: &str) -> Result<&'static str, CompileError> {
    match op {
        "==" => Ok("!="),
        "!=" => Ok("=="),
        "<" => Ok(">="),
        ">=" => Ok("<"),
        ">" => Ok("<="),
        "<=" => Ok(">"),
        other => Err(CompileError::InvalidConditional(other.to_string())),
    }
}
