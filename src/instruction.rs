//! Decoded instruction model.
//!
//! [`InstructionKind`] is the closed set of everything a statement or
//! scope header can mean: the mlog commands that pass straight through,
//! the high-level control constructs the code generator lowers, and the
//! bookkeeping kinds (`Comment`, `CompilerComment`, `Null`). Parameters
//! stay raw, order-significant tokens; what each position means is fixed
//! by the kind and interpreted only during generation.

use crate::errors::CompileError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionKind {
    /// Empty statement; decodes from blank units and emits nothing.
    Null,

    // I/O
    Read,
    Write,
    Draw,
    Print,

    // Building control
    DrawFlush,
    PrintFlush,
    GetLink,
    Control,
    Radar,
    Sensor,

    // Variables
    Set,
    Op,
    Lookup,
    PackColor,

    // Flow control
    Wait,
    Stop,
    End,
    Jump,
    Label,
    Sub,
    Return,

    // Unit control
    UnitBind,
    UnitControl,
    UnitRadar,
    UnitLocate,

    // Comments
    Comment,
    CompilerComment,

    // High-level control constructs, lowered to jumps
    ForLoop,
    WhileLoop,
    If,
    DoForLoop,
    DoWhileLoop,
}

impl InstructionKind {
    /// Look up a command keyword, case-insensitively. The long and short
    /// unit-command spellings are aliases for the same kind. Comment
    /// prefixes (`//`, `///`) are not words and are recognized by the
    /// decoder before keyword lookup.
    pub fn from_keyword(word: &str) -> Option<Self> {
        let kind = match word.to_ascii_lowercase().as_str() {
            "read" => Self::Read,
            "write" => Self::Write,
            "draw" => Self::Draw,
            "print" => Self::Print,
            "drawflush" => Self::DrawFlush,
            "printflush" => Self::PrintFlush,
            "getlink" => Self::GetLink,
            "control" => Self::Control,
            "radar" => Self::Radar,
            "sensor" => Self::Sensor,
            "set" => Self::Set,
            "op" => Self::Op,
            "lookup" => Self::Lookup,
            "packcolor" => Self::PackColor,
            "wait" => Self::Wait,
            "stop" => Self::Stop,
            "end" => Self::End,
            "jump" => Self::Jump,
            "label" => Self::Label,
            "sub" => Self::Sub,
            "return" => Self::Return,
            "unitbind" | "ubind" => Self::UnitBind,
            "unitcontrol" | "ucontrol" => Self::UnitControl,
            "unitradar" | "uradar" => Self::UnitRadar,
            "unitlocate" | "ulocate" => Self::UnitLocate,
            "for" => Self::ForLoop,
            "while" => Self::WhileLoop,
            "if" => Self::If,
            "dofor" => Self::DoForLoop,
            "dowhile" => Self::DoWhileLoop,
            _ => return None,
        };
        Some(kind)
    }

    /// The mlog opcode for a passthrough kind. Control constructs,
    /// `Sub`/`Return`, comments and `Null` have no direct opcode; they are
    /// lowered (or erased) by the code generator instead.
    pub fn opcode(self) -> Option<&'static str> {
        let op = match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Draw => "draw",
            Self::Print => "print",
            Self::DrawFlush => "drawflush",
            Self::PrintFlush => "printflush",
            Self::GetLink => "getlink",
            Self::Control => "control",
            Self::Radar => "radar",
            Self::Sensor => "sensor",
            Self::Set => "set",
            Self::Op => "op",
            Self::Lookup => "lookup",
            Self::PackColor => "packcolor",
            Self::Wait => "wait",
            Self::Stop => "stop",
            Self::End => "end",
            Self::Jump => "jump",
            Self::Label => "label",
            Self::UnitBind => "ubind",
            Self::UnitControl => "ucontrol",
            Self::UnitRadar => "uradar",
            Self::UnitLocate => "ulocate",
            _ => return None,
        };
        Some(op)
    }

    /// Parameter slot the method-sugar "main variable" is moved to.
    /// `cell1.Write(x, 0)` puts `cell1` at slot 1 (`write x cell1 0`);
    /// `closest = Radar(...)` puts the result variable at slot 6.
    pub fn main_index(self) -> usize {
        match self {
            Self::Write | Self::Control => 1,
            Self::Radar => 6,
            _ => 0,
        }
    }

    /// `stop` and `end` stand alone; anything written after them on the
    /// statement is discarded by the decoder.
    pub fn takes_parameters(self) -> bool {
        !matches!(self, Self::Stop | Self::End)
    }
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One decoded statement or scope header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub kind: InstructionKind,
    pub parameters: Vec<String>,
}

impl Instruction {
    pub fn new(kind: InstructionKind, parameters: Vec<String>) -> Self {
        Self { kind, parameters }
    }

    pub fn null() -> Self {
        Self::new(InstructionKind::Null, Vec::new())
    }

    /// Positional parameter access for code generation. Arity is never
    /// validated up front; the first missing slot reports the mismatch.
    pub fn param(&self, index: usize) -> Result<&str, CompileError> {
        self.parameters
            .get(index)
            .map(String::as_str)
            .ok_or(CompileError::ParameterCount(self.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_is_case_insensitive() {
        assert_eq!(InstructionKind::from_keyword("print"), Some(InstructionKind::Print));
        assert_eq!(InstructionKind::from_keyword("PRINT"), Some(InstructionKind::Print));
        assert_eq!(InstructionKind::from_keyword("DoWhile"), Some(InstructionKind::DoWhileLoop));
    }

    #[test]
    fn test_unit_command_aliases() {
        for (long, short) in [
            ("unitbind", "ubind"),
            ("unitcontrol", "ucontrol"),
            ("unitradar", "uradar"),
            ("unitlocate", "ulocate"),
        ] {
            assert_eq!(
                InstructionKind::from_keyword(long),
                InstructionKind::from_keyword(short),
            );
            assert!(InstructionKind::from_keyword(long).is_some());
        }
    }

    #[test]
    fn test_unknown_keyword() {
        assert_eq!(InstructionKind::from_keyword("foo"), None);
        assert_eq!(InstructionKind::from_keyword(""), None);
    }

    #[test]
    fn test_opcode_table() {
        assert_eq!(InstructionKind::Print.opcode(), Some("print"));
        assert_eq!(InstructionKind::UnitBind.opcode(), Some("ubind"));
        assert_eq!(InstructionKind::PackColor.opcode(), Some("packcolor"));
        assert_eq!(InstructionKind::Sub.opcode(), None);
        assert_eq!(InstructionKind::ForLoop.opcode(), None);
        assert_eq!(InstructionKind::Comment.opcode(), None);
    }

    #[test]
    fn test_main_index() {
        assert_eq!(InstructionKind::Write.main_index(), 1);
        assert_eq!(InstructionKind::Control.main_index(), 1);
        assert_eq!(InstructionKind::Radar.main_index(), 6);
        assert_eq!(InstructionKind::Read.main_index(), 0);
    }

    #[test]
    fn test_parameterless_kinds() {
        assert!(!InstructionKind::Stop.takes_parameters());
        assert!(!InstructionKind::End.takes_parameters());
        assert!(InstructionKind::Print.takes_parameters());
    }

    #[test]
    fn test_param_access_reports_arity() {
        let inst = Instruction::new(InstructionKind::If, vec!["a".into(), "<".into()]);
        assert_eq!(inst.param(1).unwrap(), "<");
        assert!(matches!(
            inst.param(2),
            Err(CompileError::ParameterCount(InstructionKind::If))
        ));
    }
}
