//! Syntax tree construction — recursive splitter + decoder application.
//!
//! The whole program is wrapped in an implicit top-level scope, so the
//! root branch always exists and its header decodes to `Null`. Scope
//! units split into a header (decoded as the branch instruction) and a
//! body (split again into child units); statement units become leaves.

use crate::decoder;
use crate::errors::CompileError;
use crate::instruction::Instruction;
use crate::splitter::{self, CodeUnit};

/// Thin owner of the root branch.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    pub root: SyntaxBranch,
}

/// One tree node: a decoded instruction plus the branches of its scope
/// body, in source order. Leaves have no children.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxBranch {
    pub instruction: Instruction,
    pub children: Vec<SyntaxBranch>,
}

impl SyntaxBranch {
    fn leaf(instruction: Instruction) -> Self {
        Self { instruction, children: Vec::new() }
    }
}

/// Parse a whole program into a [`SyntaxTree`].
pub fn parse(source: &str) -> Result<SyntaxTree, CompileError> {
    let root = build(&CodeUnit::scope(format!("{{{source}}}")))?;
    Ok(SyntaxTree { root })
}

fn build(unit: &CodeUnit) -> Result<SyntaxBranch, CompileError> {
    if !unit.is_scope {
        return Ok(SyntaxBranch::leaf(decoder::decode(&unit.text)?));
    }
    let (header, body) = split_scope(&unit.text);
    let mut branch = SyntaxBranch::leaf(decoder::decode(header)?);
    for child in splitter::split_units(body) {
        branch.children.push(build(&child)?);
    }
    Ok(branch)
}

/// Header (text before the first `{`) and body (text between the first
/// `{` and the final `}`) of a scope unit. Malformed units degrade
/// instead of panicking: no `{` means an empty body, no closing `}`
/// means the body runs to the end.
fn split_scope(text: &str) -> (&str, &str) {
    match text.find('{') {
        Some(open) => {
            let body = &text[open + 1..];
            let body = match body.rfind('}') {
                Some(close) => &body[..close],
                None => body,
            };
            (&text[..open], body)
        }
        None => (text, ""),
    }
}
