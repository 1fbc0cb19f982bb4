//! Jump resolution — erases symbolic labels from generated code.
//!
//! Two passes. Pass 1 walks the lines with a running instruction
//! counter: a `label` line records its name at the current counter and
//! drops out of the program; a `#` comment line is kept but never
//! advances the counter (Mindustry strips comments before indexing, so
//! jump arithmetic must ignore them too); every other line advances the
//! counter. Pass 2 rewrites each `jump` line's symbolic target with the
//! recorded index, keeping the condition tail verbatim.
//!
//! A label closing the final construct of a program resolves to one past
//! the last instruction. The in-game instruction pointer wraps at the
//! program end, so jumping there behaves exactly like `end`.

use crate::errors::CompileError;
use std::collections::HashMap;

/// Resolve all symbolic jump targets to numeric instruction indices.
pub fn resolve(lines: Vec<String>) -> Result<Vec<String>, CompileError> {
    let mut targets: HashMap<String, usize> = HashMap::new();
    let mut resolved = Vec::with_capacity(lines.len());
    let mut counter = 0;

    for line in lines {
        if let Some(name) = line.strip_prefix("label ") {
            if targets.insert(name.to_string(), counter).is_some() {
                return Err(CompileError::DuplicateLabel(name.to_string()));
            }
            continue;
        }
        if !line.starts_with('#') {
            counter += 1;
        }
        resolved.push(line);
    }

    for line in resolved.iter_mut() {
        if let Some(rest) = line.strip_prefix("jump ") {
            let (target, tail) = match rest.split_once(' ') {
                Some((target, tail)) => (target, tail),
                None => (rest, ""),
            };
            let index = *targets
                .get(target)
                .ok_or_else(|| CompileError::UndefinedLabel(target.to_string()))?;
            *line = if tail.is_empty() {
                format!("jump {index}")
            } else {
                format!("jump {index} {tail}")
            };
        }
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_forward_jump_past_end() {
        let out = resolve(lines(&[
            "jump __if0 greaterThanEq a b",
            r#"print "hi""#,
            "label __if0",
        ]))
        .unwrap();
        assert_eq!(out, ["jump 2 greaterThanEq a b", r#"print "hi""#]);
    }

    #[test]
    fn test_backward_jump() {
        let out = resolve(lines(&["label top", "print 1", "jump top always"])).unwrap();
        assert_eq!(out, ["print 1", "jump 0 always"]);
    }

    #[test]
    fn test_loop_resolution() {
        let out = resolve(lines(&[
            "set i 0",
            "jump __break0 greaterThanEq i 10",
            "label __for0",
            "print i",
            "op add i i 1",
            "jump __for0 lessThan i 10",
            "label __break0",
        ]))
        .unwrap();
        assert_eq!(
            out,
            [
                "set i 0",
                "jump 5 greaterThanEq i 10",
                "print i",
                "op add i i 1",
                "jump 2 lessThan i 10",
            ]
        );
    }

    #[test]
    fn test_comments_do_not_shift_targets() {
        let without = resolve(lines(&[
            "jump __if0 greaterThanEq a b",
            "print 1",
            "label __if0",
        ]))
        .unwrap();
        let with = resolve(lines(&[
            "jump __if0 greaterThanEq a b",
            "# interleaved note",
            "print 1",
            "label __if0",
        ]))
        .unwrap();
        assert_eq!(without[0], "jump 2 greaterThanEq a b");
        assert_eq!(with[0], without[0]);
        assert_eq!(with[1], "# interleaved note");
    }

    #[test]
    fn test_duplicate_label() {
        let err = resolve(lines(&["label a", "print 1", "label a"])).unwrap_err();
        assert!(matches!(err, CompileError::DuplicateLabel(name) if name == "a"));
    }

    #[test]
    fn test_undefined_label() {
        let err = resolve(lines(&["jump nowhere always"])).unwrap_err();
        assert!(matches!(err, CompileError::UndefinedLabel(name) if name == "nowhere"));
    }

    #[test]
    fn test_no_symbolic_bookkeeping_remains() {
        let out = resolve(lines(&[
            "label __while0",
            "jump __break0 greaterThanEq x 10",
            "print x",
            "jump __while0 lessThan x 10",
            "label __break0",
        ]))
        .unwrap();
        assert!(out.iter().all(|l| !l.starts_with("label ")));
        for line in &out {
            if let Some(rest) = line.strip_prefix("jump ") {
                let target = rest.split(' ').next().unwrap();
                assert!(target.parse::<usize>().is_ok(), "unresolved target in {line:?}");
            }
        }
    }
}
