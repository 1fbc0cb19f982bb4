//! Mlog Compiler — compiles a block-structured source language to Mindustry Logic.
//!
//! # Compiler Pipeline
//!
//! ```text
//! Structured source
//!     │
//!     ▼
//! ┌───────────┐
//! │ Splitter   │  Splits source into `;` statements and `{}` scopes
//! └────┬──────┘
//!      │
//!      ▼
//! ┌───────────┐
//! │ Decoder    │  Decodes one statement into an instruction + parameters
//! └────┬──────┘
//!      │
//!      ▼
//! ┌───────────┐
//! │ Tree       │  Nests decoded instructions by scope
//! └────┬──────┘
//!      │
//!      ▼
//! ┌───────────┐
//! │ Codegen    │  Lowers the tree to flat mlog with symbolic labels
//! └────┬──────┘
//!      │
//!      ▼
//! ┌───────────┐
//! │ Resolver   │  Replaces label names with instruction indices
//! └────┬──────┘
//!      │
//!      ▼
//! Mindustry Logic (.mlog)
//! ```

pub mod codegen;
pub mod decoder;
pub mod errors;
pub mod instruction;
pub mod options;
pub mod ops;
pub mod resolver;
pub mod splitter;
pub mod tree;

use errors::CompileError;
use options::CompilerOptions;

/// Compile structured source into resolved Mindustry Logic lines.
pub fn compile(source: &str) -> Result<Vec<String>, CompileError> {
    compile_with_options(source, CompilerOptions::default())
}

/// Compile with explicit options on top of any `#` pragmas in the source.
pub fn compile_with_options(
    source: &str,
    options: CompilerOptions,
) -> Result<Vec<String>, CompileError> {
    let options = options.merge(CompilerOptions::from_source(source)?);
    let source = options::strip_pragmas(source);
    let tree = tree::parse(&source)?;
    let lines = codegen::generate(&tree, options)?;
    resolver::resolve(lines)
}

/// Compile structured source but stop before jump resolution, keeping
/// symbolic `label` lines in place. Useful for inspecting generated code.
pub fn emit(source: &str) -> Result<Vec<String>, CompileError> {
    emit_with_options(source, CompilerOptions::default())
}

/// [`emit`] with explicit options on top of any `#` pragmas in the source.
pub fn emit_with_options(
    source: &str,
    options: CompilerOptions,
) -> Result<Vec<String>, CompileError> {
    let options = options.merge(CompilerOptions::from_source(source)?);
    let source = options::strip_pragmas(source);
    let tree = tree::parse(&source)?;
    codegen::generate(&tree, options)
}
