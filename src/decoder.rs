//! Instruction decoder — one statement or scope header in, one
//! [`Instruction`] out.
//!
//! Each line is decoded independently by a fixed sequence of rules; the
//! first rule that applies wins:
//!
//!   1. an empty line is `Null`
//!   2. a `///` or `//` prefix is a compiler comment / comment, with the
//!      whole remainder as its single parameter (never token-split)
//!   3. method sugar `name = Callee(args)` / `name.Callee(args)` makes
//!      `Callee` the command keyword and later re-seats `name` at the
//!      command's main parameter index
//!   4. otherwise the first word is the command keyword, looked up
//!      case-insensitively
//!   5. an unrecognized keyword turns the whole line into an implicit
//!      assignment: `Op` when it contains an operator pattern, `Set`
//!      otherwise
//!
//! `jump` statements and `for`/`dofor` headers also get their surface
//! forms normalized here (condition operator re-seated into slot 1, the
//! loop header's `=` dropped), so the code generator only ever sees
//! positional parameters.

use crate::errors::CompileError;
use crate::instruction::{Instruction, InstructionKind};
use crate::ops;
use std::ops::Range;

/// Decode a single trimmed statement or scope header.
pub fn decode(line: &str) -> Result<Instruction, CompileError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Instruction::null());
    }

    if let Some(rest) = line.strip_prefix("///") {
        return Ok(Instruction::new(
            InstructionKind::CompilerComment,
            vec![rest.to_string()],
        ));
    }
    if let Some(rest) = line.strip_prefix("//") {
        return Ok(Instruction::new(InstructionKind::Comment, vec![rest.to_string()]));
    }

    let sugar = method_sugar(line);
    let (keyword, remainder) = match &sugar {
        Some((cut, callee)) => {
            let mut rest = String::with_capacity(line.len());
            rest.push_str(&line[..cut.start]);
            rest.push_str(&line[cut.end..]);
            (*callee, rest)
        }
        None => match first_word(line) {
            Some(word) => (word, line[word.len()..].to_string()),
            None => return Err(CompileError::Syntax(line.to_string())),
        },
    };

    let Some(kind) = InstructionKind::from_keyword(keyword) else {
        return decode_implicit(line);
    };

    if kind == InstructionKind::Jump {
        return decode_jump(&remainder);
    }
    if !kind.takes_parameters() {
        return Ok(Instruction::new(kind, Vec::new()));
    }

    let remainder = match kind {
        // Loop headers accept the assignment spelling `for i = 0, 10`.
        InstructionKind::ForLoop | InstructionKind::DoForLoop => {
            strip_equals(&remainder).unwrap_or(remainder)
        }
        _ => remainder,
    };

    let mut parameters = tokenize(&remainder);

    if sugar.is_some() {
        let main = kind.main_index();
        if main != 0 {
            if parameters.is_empty() || main > parameters.len() - 1 {
                return Err(CompileError::ParameterCount(kind));
            }
            let var = parameters.remove(0);
            parameters.insert(main, var);
        }
    }

    Ok(Instruction::new(kind, parameters))
}

/// Implicit assignment fallback: `x = a + b` is an `Op`, `x = y` a `Set`.
/// The operator token is cut at the position its pattern matched; cutting
/// at the first occurrence of the bare token instead would eat into names
/// that contain it (`flipped = flip(x)`).
fn decode_implicit(line: &str) -> Result<Instruction, CompileError> {
    match ops::find_operator(line) {
        Some((token, at)) => {
            let mut cut = String::with_capacity(line.len());
            cut.push_str(&line[..at]);
            cut.push_str(&line[at + token.len()..]);
            let cut = strip_equals(&cut)
                .ok_or_else(|| CompileError::MethodNotRecognized(line.to_string()))?;
            let mut parameters = vec![ops::mlog_op(token).to_string()];
            parameters.extend(tokenize(&cut));
            Ok(Instruction::new(InstructionKind::Op, parameters))
        }
        None => {
            let cut = strip_equals(line)
                .ok_or_else(|| CompileError::MethodNotRecognized(line.to_string()))?;
            Ok(Instruction::new(InstructionKind::Set, tokenize(&cut)))
        }
    }
}

/// Normalize a jump statement to `[target, condition, a, b]` or
/// `[target, always]`. The written form puts the comparison operator
/// between its operands (`jump t if a < b`); mlog wants it right after
/// the target.
fn decode_jump(rest: &str) -> Result<Instruction, CompileError> {
    if rest.contains(" if ") || rest.contains(" if(") {
        let cleaned = rest.replace(" if ", " ").replace(" if(", " ");
        let mut parameters = tokenize(&cleaned);
        if parameters.len() < 3 {
            return Err(CompileError::ParameterCount(InstructionKind::Jump));
        }
        let op = parameters.remove(2);
        parameters.insert(1, ops::mlog_op(&op).to_string());
        Ok(Instruction::new(InstructionKind::Jump, parameters))
    } else {
        let mut parameters = tokenize(rest);
        parameters.push("always".to_string());
        Ok(Instruction::new(InstructionKind::Jump, parameters))
    }
}

// ── Surface scanning ────────────────────────────────────────────────

/// Match `name = Callee(` or `name.Callee(` at the start of the line.
/// Returns the byte range of the sugar text to cut (`" = Callee"` or
/// `".Callee"`) plus the callee, leaving `name(args...)` behind so the
/// name becomes the first extracted token.
fn method_sugar(line: &str) -> Option<(Range<usize>, &str)> {
    let name_len = leading_name(line)?;
    let rest = &line[name_len..];
    if let Some(tail) = rest.strip_prefix('.') {
        let callee = callee_word(tail)?;
        return Some((name_len..name_len + 1 + callee.len(), callee));
    }
    if let Some(tail) = rest.strip_prefix(" = ") {
        let callee = callee_word(tail)?;
        return Some((name_len..name_len + 3 + callee.len(), callee));
    }
    None
}

/// Byte length of a leading variable name: a word character followed by
/// word characters or `-`.
fn leading_name(line: &str) -> Option<usize> {
    let mut chars = line.char_indices();
    let (_, first) = chars.next()?;
    if !is_word(first) {
        return None;
    }
    let mut len = first.len_utf8();
    for (i, c) in chars {
        if is_word(c) || c == '-' {
            len = i + c.len_utf8();
        } else {
            break;
        }
    }
    Some(len)
}

/// A run of word characters sitting immediately before `(`.
fn callee_word(s: &str) -> Option<&str> {
    let mut len = 0;
    for (i, c) in s.char_indices() {
        if is_word(c) {
            len = i + c.len_utf8();
        } else {
            break;
        }
    }
    if len == 0 || !s[len..].starts_with('(') {
        return None;
    }
    Some(&s[..len])
}

/// First command word: an optional `@` and a run of word characters, so
/// mlog special variables like `@counter` survive as keywords of their
/// own statements.
fn first_word(line: &str) -> Option<&str> {
    let at = usize::from(line.starts_with('@'));
    let rest = &line[at..];
    let mut len = 0;
    for (i, c) in rest.char_indices() {
        if is_word(c) {
            len = i + c.len_utf8();
        } else {
            break;
        }
    }
    if len == 0 {
        return None;
    }
    Some(&line[..at + len])
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Remove the first `=` from the line, if any.
fn strip_equals(line: &str) -> Option<String> {
    let at = line.find('=')?;
    let mut out = String::with_capacity(line.len());
    out.push_str(&line[..at]);
    out.push_str(&line[at + 1..]);
    Some(out)
}

// ── Parameter tokenization ──────────────────────────────────────────

/// Split a parameter string into tokens. A token is either a
/// double-quoted string (kept intact, quotes and all) or a maximal run of
/// characters excluding whitespace, commas, and parentheses. A quote only
/// opens a string at a token boundary; mid-run it is an ordinary
/// character, and an unterminated opening quote falls back to an
/// ordinary run.
fn tokenize(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if is_separator(c) {
            i += 1;
            continue;
        }
        if c == '"' {
            if let Some(close) = closing_quote(&chars, i + 1) {
                tokens.push(chars[i..=close].iter().collect());
                i = close + 1;
                continue;
            }
        }
        let start = i;
        while i < chars.len() && !is_separator(chars[i]) {
            i += 1;
        }
        tokens.push(chars[start..i].iter().collect());
    }

    tokens
}

/// Index of the next unescaped `"` at or after `from`.
fn closing_quote(chars: &[char], from: usize) -> Option<usize> {
    let mut escaped = false;
    for (i, &c) in chars.iter().enumerate().skip(from) {
        if c == '"' && !escaped {
            return Some(i);
        }
        escaped = c == '\\' && !escaped;
    }
    None
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ',' || c == '(' || c == ')'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_ok(line: &str) -> Instruction {
        decode(line).expect("decode failed")
    }

    fn params(line: &str) -> Vec<String> {
        decode_ok(line).parameters
    }

    #[test]
    fn test_empty_line_is_null() {
        assert_eq!(decode_ok(""), Instruction::null());
        assert_eq!(decode_ok("   \t"), Instruction::null());
    }

    #[test]
    fn test_implicit_op() {
        let inst = decode_ok("x = 1 + 2");
        assert_eq!(inst.kind, InstructionKind::Op);
        assert_eq!(inst.parameters, ["add", "x", "1", "2"]);
    }

    #[test]
    fn test_implicit_set() {
        let inst = decode_ok("x = y");
        assert_eq!(inst.kind, InstructionKind::Set);
        assert_eq!(inst.parameters, ["x", "y"]);
    }

    #[test]
    fn test_strict_equality_op() {
        assert_eq!(params("x = a === b"), ["strictEqual", "x", "a", "b"]);
    }

    #[test]
    fn test_function_style_op() {
        assert_eq!(params("x = max(1, 2)"), ["max", "x", "1", "2"]);
        assert_eq!(params("x = flip(y)"), ["not", "x", "y"]);
    }

    #[test]
    fn test_operator_cut_at_matched_position() {
        // "flip" also occurs inside the assigned name; only the operator
        // occurrence may be removed.
        assert_eq!(params("flipped = flip(x)"), ["not", "flipped", "x"]);
    }

    #[test]
    fn test_implicit_line_requires_equals() {
        assert!(matches!(
            decode("a + b"),
            Err(CompileError::MethodNotRecognized(_))
        ));
        assert!(matches!(
            decode("foo"),
            Err(CompileError::MethodNotRecognized(_))
        ));
    }

    #[test]
    fn test_comments_keep_remainder_verbatim() {
        let inst = decode_ok("// hello  world");
        assert_eq!(inst.kind, InstructionKind::Comment);
        assert_eq!(inst.parameters, [" hello  world"]);

        let inst = decode_ok("///internal note");
        assert_eq!(inst.kind, InstructionKind::CompilerComment);
        assert_eq!(inst.parameters, ["internal note"]);
    }

    #[test]
    fn test_method_assignment_sugar() {
        let inst = decode_ok("result = GetLink(0)");
        assert_eq!(inst.kind, InstructionKind::GetLink);
        assert_eq!(inst.parameters, ["result", "0"]);
    }

    #[test]
    fn test_method_call_sugar_reseats_main_variable() {
        let inst = decode_ok("cell1.Write(x, 0)");
        assert_eq!(inst.kind, InstructionKind::Write);
        assert_eq!(inst.parameters, ["x", "cell1", "0"]);
    }

    #[test]
    fn test_radar_main_slot() {
        let inst = decode_ok("closest = Radar(turret1, enemy, any, any, distance, 1)");
        assert_eq!(inst.kind, InstructionKind::Radar);
        assert_eq!(
            inst.parameters,
            ["turret1", "enemy", "any", "any", "distance", "1", "closest"]
        );
    }

    #[test]
    fn test_sugar_reseat_arity_failure() {
        assert!(matches!(
            decode("foo.Write()"),
            Err(CompileError::ParameterCount(InstructionKind::Write))
        ));
    }

    #[test]
    fn test_jump_unconditional() {
        let inst = decode_ok("jump target");
        assert_eq!(inst.kind, InstructionKind::Jump);
        assert_eq!(inst.parameters, ["target", "always"]);
    }

    #[test]
    fn test_jump_conditional() {
        assert_eq!(params("jump target if a < b"), ["target", "lessThan", "a", "b"]);
        assert_eq!(params("jump top if x == y"), ["top", "equal", "x", "y"]);
    }

    #[test]
    fn test_jump_conditional_arity() {
        assert!(matches!(
            decode("jump t if a"),
            Err(CompileError::ParameterCount(InstructionKind::Jump))
        ));
    }

    #[test]
    fn test_for_header_both_spellings() {
        let inst = decode_ok("for i = 0, 10");
        assert_eq!(inst.kind, InstructionKind::ForLoop);
        assert_eq!(inst.parameters, ["i", "0", "10"]);

        let inst = decode_ok("for(i, 0, 10)");
        assert_eq!(inst.kind, InstructionKind::ForLoop);
        assert_eq!(inst.parameters, ["i", "0", "10"]);
    }

    #[test]
    fn test_condition_header_tokens() {
        let inst = decode_ok("while x < 10");
        assert_eq!(inst.kind, InstructionKind::WhileLoop);
        assert_eq!(inst.parameters, ["x", "<", "10"]);
    }

    #[test]
    fn test_keyword_case_insensitive() {
        assert_eq!(decode_ok(r#"PRINT "x""#).kind, InstructionKind::Print);
        assert_eq!(decode_ok("UBind @poly").kind, InstructionKind::UnitBind);
    }

    #[test]
    fn test_explicit_set_and_op_pass_through() {
        assert_eq!(params("set x 5"), ["x", "5"]);
        assert_eq!(params("op add x 1 2"), ["add", "x", "1", "2"]);
    }

    #[test]
    fn test_string_parameter_kept_intact() {
        assert_eq!(params(r#"print "a b,c""#), [r#""a b,c""#]);
    }

    #[test]
    fn test_stop_discards_parameters() {
        let inst = decode_ok("stop now please");
        assert_eq!(inst.kind, InstructionKind::Stop);
        assert!(inst.parameters.is_empty());
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(decode("= 5"), Err(CompileError::Syntax(_))));
        assert!(matches!(decode("<>!"), Err(CompileError::Syntax(_))));
    }

    #[test]
    fn test_at_variable_first_word() {
        let inst = decode_ok("@counter = 5");
        assert_eq!(inst.kind, InstructionKind::Set);
        assert_eq!(inst.parameters, ["@counter", "5"]);
    }
}
