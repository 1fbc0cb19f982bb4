//! Compilation failure reporting.
//!
//! Uses thiserror for the error derive and miette for stable diagnostic
//! codes. The pipeline drops source offsets at the splitter (statements
//! are trimmed free-standing strings by the time anything can fail), so
//! variants carry the offending fragment rather than a source span.

use crate::instruction::InstructionKind;
use miette::Diagnostic;
use thiserror::Error;

/// Any way a compilation can fail. All variants are fatal; the pipeline
/// never produces partial output.
#[derive(Error, Debug, Diagnostic)]
pub enum CompileError {
    /// A statement or scope header matched no command, sugar, or
    /// implicit-assignment pattern.
    #[error("syntax error: {0:?}")]
    #[diagnostic(code(mlogc::syntax))]
    Syntax(String),

    /// A pragma line named an option the compiler does not know.
    #[error("could not resolve compiler option {0:?}")]
    #[diagnostic(code(mlogc::unknown_option), help("recognized options are `UseStack` and `None`"))]
    UnknownOption(String),

    /// An implicit `set`/`op` line had no `=` to strip.
    #[error("method not recognized: {0:?}")]
    #[diagnostic(
        code(mlogc::method_not_recognized),
        help("a bare statement must be a known command, `name = value`, or `name = a <op> b`")
    )]
    MethodNotRecognized(String),

    /// Condition inversion was requested for an operator outside the six
    /// relational ones.
    #[error("operator {0:?} is not available for conditional jumps")]
    #[diagnostic(code(mlogc::invalid_conditional))]
    InvalidConditional(String),

    /// A parameter list was shorter than the instruction kind requires.
    #[error("incorrect number of parameters for {0}")]
    #[diagnostic(code(mlogc::parameter_count))]
    ParameterCount(InstructionKind),

    /// The same label name was defined on two lines.
    #[error("label {0} is declared more than once")]
    #[diagnostic(code(mlogc::duplicate_label))]
    DuplicateLabel(String),

    /// A jump referenced a label that is never defined.
    #[error("there is no label called {0:?}")]
    #[diagnostic(code(mlogc::undefined_label))]
    UndefinedLabel(String),

    /// An instruction kind reached code generation with no lowering.
    #[error("instruction is not implemented: {0}")]
    #[diagnostic(code(mlogc::unimplemented))]
    Unimplemented(InstructionKind),
}
