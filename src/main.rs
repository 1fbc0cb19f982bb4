//! Mlog compiler CLI entry point.
//!
//! Usage:
//!   mlogc compile <input> [-o <output>]   (write resolved mlog; `-o -` prints to stdout)
//!   mlogc emit <input>                    (print generated code before jump resolution)
//!   mlogc parse <input>                   (dump the syntax tree)
//!
//! `--use-stack` switches subroutine calls to the cell1 stack convention,
//! the same as a `#UseStack` pragma in the source.

use mlog_compiler::errors::CompileError;
use mlog_compiler::options::{self, CompilerOptions};
use std::{env, fs, path::Path, process};

fn main() {
    let mut args: Vec<String> = env::args().collect();
    let use_stack = args.iter().any(|a| a == "--use-stack");
    args.retain(|a| a != "--use-stack");

    if args.len() < 3 {
        eprintln!("Usage: mlogc <command> <file> [-o <output>] [--use-stack]");
        eprintln!("Commands: compile, emit, parse");
        process::exit(64);
    }

    let command = &args[1];
    let filename = &args[2];
    let options = CompilerOptions { use_stack };

    let source = match fs::read_to_string(filename) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading '{}': {}", filename, e);
            process::exit(74);
        }
    };

    match command.as_str() {
        "compile" => {
            let lines =
                compile_or_exit(mlog_compiler::compile_with_options(&source, options));
            let output = if args.len() > 4 && args[3] == "-o" {
                args[4].clone()
            } else {
                Path::new(filename).with_extension("mlog").display().to_string()
            };
            let code = lines.join("\n") + "\n";
            if output == "-" {
                print!("{}", code);
            } else {
                match fs::write(&output, code) {
                    Ok(()) => println!("Compiled to {}", output),
                    Err(e) => {
                        eprintln!("Error writing output: {}", e);
                        process::exit(74);
                    }
                }
            }
        }
        "emit" => {
            let lines = compile_or_exit(mlog_compiler::emit_with_options(&source, options));
            for line in &lines {
                println!("{}", line);
            }
        }
        "parse" => {
            let stripped = options::strip_pragmas(&source);
            let tree = compile_or_exit(mlog_compiler::tree::parse(&stripped));
            println!("{:#?}", tree);
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            process::exit(64);
        }
    }
}

/// Unwrap a compile-stage result, exiting with the data error code on failure.
fn compile_or_exit<T>(result: Result<T, CompileError>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Compilation error: {}", e);
            process::exit(65);
        }
    }
}
