//! Code generation — syntax tree to mlog lines with symbolic labels.
//!
//! Each branch contributes an opening line sequence, its children's
//! lines, and a closing sequence. Control constructs own their whole
//! lifecycle locally: one `emit_*` function mints the construct's labels,
//! writes the opening jump/label lines, recurses, and writes the closing
//! lines, so a label can never leak between constructs.
//!
//! The output still contains `label <name>` pseudo-lines and jumps to
//! symbolic targets; the resolver erases both.
//!
//! Condition lowering inverts the written comparison for the skip jump:
//! `if a < b { … }` jumps *past* the body `greaterThanEq a b`. Identity
//! equality `===` has no inverse jump condition, so it tests into the
//! scratch variable `__if` first.

use crate::errors::CompileError;
use crate::instruction::{Instruction, InstructionKind};
use crate::options::CompilerOptions;
use crate::ops;
use crate::tree::{SyntaxBranch, SyntaxTree};

/// Lower a tree to mlog lines, labels still symbolic.
pub fn generate(tree: &SyntaxTree, options: CompilerOptions) -> Result<Vec<String>, CompileError> {
    let mut generator = Generator::new(options);
    let mut lines = Vec::new();
    generator.visit(&tree.root, &mut lines)?;
    Ok(lines)
}

/// Per-compilation generation state. The label counter lives here so
/// repeated or concurrent compilations never share numbering.
struct Generator {
    options: CompilerOptions,
    next_label: u32,
}

impl Generator {
    fn new(options: CompilerOptions) -> Self {
        Self {
            options,
            next_label: 0,
        }
    }

    /// Counter value backing the next construct's labels. A loop's top
    /// and break labels share one value (`__for2` pairs with `__break2`).
    fn fresh_label(&mut self) -> u32 {
        let n = self.next_label;
        self.next_label += 1;
        n
    }

    fn visit(&mut self, branch: &SyntaxBranch, lines: &mut Vec<String>) -> Result<(), CompileError> {
        let inst = &branch.instruction;
        match inst.kind {
            InstructionKind::Null | InstructionKind::CompilerComment => {
                self.visit_children(branch, lines)
            }
            InstructionKind::Comment => {
                emit_comment(inst, lines)?;
                self.visit_children(branch, lines)
            }
            InstructionKind::If => self.emit_if(branch, lines),
            InstructionKind::WhileLoop => self.emit_while(branch, lines),
            InstructionKind::DoWhileLoop => self.emit_do_while(branch, lines),
            InstructionKind::ForLoop => self.emit_for(branch, lines),
            InstructionKind::DoForLoop => self.emit_do_for(branch, lines),
            InstructionKind::Sub => {
                self.emit_call(inst, lines)?;
                self.visit_children(branch, lines)
            }
            InstructionKind::Return => {
                self.emit_return(lines);
                self.visit_children(branch, lines)
            }
            _ => {
                emit_plain(inst, lines)?;
                self.visit_children(branch, lines)
            }
        }
    }

    fn visit_children(
        &mut self,
        branch: &SyntaxBranch,
        lines: &mut Vec<String>,
    ) -> Result<(), CompileError> {
        for child in &branch.children {
            self.visit(child, lines)?;
        }
        Ok(())
    }

    /// `if (a, op, b)`: jump past the body when the condition fails.
    fn emit_if(&mut self, branch: &SyntaxBranch, lines: &mut Vec<String>) -> Result<(), CompileError> {
        let inst = &branch.instruction;
        let (a, op, b) = (inst.param(0)?, inst.param(1)?, inst.param(2)?);
        let skip = format!("__if{}", self.fresh_label());
        if op == "===" {
            lines.push(format!("op strictEqual __if {a} {b}"));
            lines.push(format!("jump {skip} notEqual __if true"));
        } else {
            lines.push(format!(
                "jump {skip} {} {a} {b}",
                ops::mlog_op(ops::inverse_op(op)?)
            ));
        }
        self.visit_children(branch, lines)?;
        lines.push(format!("label {skip}"));
        Ok(())
    }

    /// `while (a, op, b)`: pre-tested loop.
    fn emit_while(
        &mut self,
        branch: &SyntaxBranch,
        lines: &mut Vec<String>,
    ) -> Result<(), CompileError> {
        let inst = &branch.instruction;
        let (a, op, b) = (inst.param(0)?, inst.param(1)?, inst.param(2)?);
        let n = self.fresh_label();
        let (top, brk) = (format!("__while{n}"), format!("__break{n}"));
        lines.push(format!("label {top}"));
        lines.push(format!(
            "jump {brk} {} {a} {b}",
            ops::mlog_op(ops::inverse_op(op)?)
        ));
        self.visit_children(branch, lines)?;
        lines.push(format!("jump {top} {} {a} {b}", ops::mlog_op(op)));
        lines.push(format!("label {brk}"));
        Ok(())
    }

    /// `dowhile (a, op, b)`: post-tested, the body always runs once.
    fn emit_do_while(
        &mut self,
        branch: &SyntaxBranch,
        lines: &mut Vec<String>,
    ) -> Result<(), CompileError> {
        let inst = &branch.instruction;
        let (a, op, b) = (inst.param(0)?, inst.param(1)?, inst.param(2)?);
        let top = format!("__while{}", self.fresh_label());
        lines.push(format!("label {top}"));
        self.visit_children(branch, lines)?;
        lines.push(format!("jump {top} {} {a} {b}", ops::mlog_op(op)));
        Ok(())
    }

    /// `for (var, start, bound)`: pre-tested counting loop. The loop
    /// variable is initialized unless the header already names it as its
    /// own start (`for i = i, 10`).
    fn emit_for(&mut self, branch: &SyntaxBranch, lines: &mut Vec<String>) -> Result<(), CompileError> {
        let inst = &branch.instruction;
        let (var, start, bound) = (inst.param(0)?, inst.param(1)?, inst.param(2)?);
        if var != start {
            lines.push(format!("set {var} {start}"));
        }
        let dir = LoopDirection::of(start, bound);
        let n = self.fresh_label();
        let (top, brk) = (format!("__for{n}"), format!("__break{n}"));
        lines.push(format!("jump {brk} {} {var} {bound}", dir.exit_test()));
        lines.push(format!("label {top}"));
        self.visit_children(branch, lines)?;
        lines.push(format!("op {} {var} {var} 1", dir.step()));
        lines.push(format!("jump {top} {} {var} {bound}", dir.continue_test()));
        lines.push(format!("label {brk}"));
        Ok(())
    }

    /// `dofor (var, start, bound)`: post-tested counting loop, no
    /// pre-test and no break label.
    fn emit_do_for(
        &mut self,
        branch: &SyntaxBranch,
        lines: &mut Vec<String>,
    ) -> Result<(), CompileError> {
        let inst = &branch.instruction;
        let (var, start, bound) = (inst.param(0)?, inst.param(1)?, inst.param(2)?);
        lines.push(format!("set {var} {start}"));
        let dir = LoopDirection::of(start, bound);
        let top = format!("__for{}", self.fresh_label());
        lines.push(format!("label {top}"));
        self.visit_children(branch, lines)?;
        lines.push(format!("op {} {var} {var} 1", dir.step()));
        lines.push(format!("jump {top} {} {var} {bound}", dir.continue_test()));
        Ok(())
    }

    /// `sub target`: save the return address, then jump. The saved value
    /// points at the line after the jump (`@counter` already reads one
    /// past the executing line).
    fn emit_call(&mut self, inst: &Instruction, lines: &mut Vec<String>) -> Result<(), CompileError> {
        let target = inst.param(0)?;
        if self.options.use_stack {
            lines.push("op add __retAddr @counter 3".to_string());
            lines.push("write __retAddr cell1 __stack".to_string());
            lines.push("op add __stack __stack 1".to_string());
        } else {
            lines.push("op add __retAddr @counter 1".to_string());
        }
        lines.push(format!("jump {target} always"));
        Ok(())
    }

    /// `return`: restore `@counter` from the saved address.
    fn emit_return(&mut self, lines: &mut Vec<String>) {
        if self.options.use_stack {
            lines.push("op sub __stack __stack 1".to_string());
            lines.push("read @counter cell1 __stack".to_string());
        } else {
            lines.push("set @counter __retAddr".to_string());
        }
    }
}

/// Passthrough emission: `<opcode> <p0> <p1> …`.
fn emit_plain(inst: &Instruction, lines: &mut Vec<String>) -> Result<(), CompileError> {
    let Some(opcode) = inst.kind.opcode() else {
        return Err(CompileError::Unimplemented(inst.kind));
    };
    if inst.parameters.is_empty() {
        lines.push(opcode.to_string());
    } else {
        lines.push(format!("{opcode} {}", inst.parameters.join(" ")));
    }
    Ok(())
}

/// One `# ` output line per line of the comment text. The resolver skips
/// `#` lines when counting, so comments never shift jump targets.
fn emit_comment(inst: &Instruction, lines: &mut Vec<String>) -> Result<(), CompileError> {
    let text = inst.param(0)?;
    for part in text.split('\n') {
        lines.push(format!("# {}", part.trim()));
    }
    Ok(())
}

/// Iteration direction for counting loops, fixed once at lowering time:
/// descending when both bounds are numeric and start > bound, ascending
/// otherwise (non-numeric bounds cannot be compared here).
#[derive(Clone, Copy)]
enum LoopDirection {
    Ascending,
    Descending,
}

impl LoopDirection {
    fn of(start: &str, bound: &str) -> Self {
        match (start.parse::<f64>(), bound.parse::<f64>()) {
            (Ok(s), Ok(b)) if s > b => Self::Descending,
            _ => Self::Ascending,
        }
    }

    /// Condition that skips the loop before the first iteration.
    fn exit_test(self) -> &'static str {
        match self {
            Self::Ascending => "greaterThanEq",
            Self::Descending => "lessThanEq",
        }
    }

    /// Condition that re-enters the body after the step.
    fn continue_test(self) -> &'static str {
        match self {
            Self::Ascending => "lessThan",
            Self::Descending => "greaterThan",
        }
    }

    fn step(self) -> &'static str {
        match self {
            Self::Ascending => "add",
            Self::Descending => "sub",
        }
    }
}
