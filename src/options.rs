//! Compiler options and pragma lines.
//!
//! A line whose first character is `#` names one option (`#UseStack`).
//! Options collected from the source are OR-merged with whatever the
//! caller passes in, then every pragma line is stripped before the
//! splitter runs so pragmas never affect statement splitting or line
//! numbering.

use crate::errors::CompileError;

/// Independent feature flags for one compilation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Route subroutine calls through the `cell1` stack instead of the
    /// single `__retAddr` variable, allowing nested and recursive calls.
    pub use_stack: bool,
}

impl CompilerOptions {
    /// Collect options named by the source's pragma lines. `None` is
    /// accepted and means nothing; any other unknown name is fatal.
    pub fn from_source(source: &str) -> Result<Self, CompileError> {
        let mut options = Self::default();
        for line in source.lines() {
            if let Some(name) = line.strip_prefix('#') {
                match name.trim() {
                    "UseStack" => options.use_stack = true,
                    "None" => {}
                    unknown => return Err(CompileError::UnknownOption(unknown.to_string())),
                }
            }
        }
        Ok(options)
    }

    /// Union of two option sets; a flag set on either side stays set.
    pub fn merge(self, other: Self) -> Self {
        Self {
            use_stack: self.use_stack || other.use_stack,
        }
    }
}

/// Drop every pragma line from the source.
pub fn strip_pragmas(source: &str) -> String {
    source
        .lines()
        .filter(|line| !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pragma_sets_flag() {
        let options = CompilerOptions::from_source("#UseStack\nx = 1;").unwrap();
        assert!(options.use_stack);
    }

    #[test]
    fn test_pragma_none_and_whitespace() {
        let options = CompilerOptions::from_source("# None \nx = 1;").unwrap();
        assert_eq!(options, CompilerOptions::default());
        let options = CompilerOptions::from_source("#  UseStack\t\n").unwrap();
        assert!(options.use_stack);
    }

    #[test]
    fn test_unknown_pragma_is_fatal() {
        let err = CompilerOptions::from_source("#Fast\n").unwrap_err();
        assert!(matches!(err, CompileError::UnknownOption(name) if name == "Fast"));
    }

    #[test]
    fn test_merge_is_sticky() {
        let a = CompilerOptions { use_stack: true };
        let b = CompilerOptions::default();
        assert!(a.merge(b).use_stack);
        assert!(b.merge(a).use_stack);
        assert!(!b.merge(b).use_stack);
    }

    #[test]
    fn test_strip_pragmas() {
        let out = strip_pragmas("#UseStack\nx = 1;\n#None\ny = 2;");
        assert_eq!(out, "x = 1;\ny = 2;");
    }
}
