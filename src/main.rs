#[macro_use]
extern crate lazy_static;

mod ast_printer;
mod environment;
mod expr;
mod interpreter;
mod native;
mod parser;
mod resolver;
mod stmt;
mod tokens;

use std::{env, fs, process};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use thiserror::Error;

use environment::EnvRef;
use interpreter::RuntimeError;
use stmt::Stmt;
use tokens::Tokens;

// Scan/parse/resolve errors exit 65, runtime errors 70.
#[derive(Debug, Error)]
enum RunError {
    #[error("{}", .0.join("\n"))]
    Static(Vec<String>),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() > 2 {
        eprintln!("Usage: jlox [script]");
        process::exit(64);
    }

    if args.len() == 2 {
        run_file(&args[1]);
        return;
    }

    run_prompt();
}

fn init_env_ref() -> EnvRef {
    let env_ref = EnvRef::new();
    native::define_native_functions(env_ref.clone());
    env_ref
}

fn run_file(filename: &str) {
    let env_ref = init_env_ref();

    let contents = match fs::read_to_string(filename) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("Failed to read file '{}': {}", filename, e);
            process::exit(74);
        }
    };

    match run(env_ref, &contents) {
        Ok(_) => (),
        Err(e @ RunError::Static(_)) => {
            eprintln!("{}", e);
            process::exit(65);
        }
        Err(e @ RunError::Runtime(_)) => {
            eprintln!("{}", e);
            process::exit(70);
        }
    }
}

fn run_prompt() {
    let env_ref = init_env_ref();

    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Could not start the prompt: {}", e);
            process::exit(74);
        }
    };

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                _ = editor.add_history_entry(&line);

                // errors do not end the session; the flag resets per line
                if let Err(e) = run(env_ref.clone(), &line) {
                    eprintln!("{}", e);
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}", e);
                break;
            }
        }
    }
}

fn run(env_ref: EnvRef, contents: &str) -> Result<(), RunError> {
    let tokens: Tokens = contents.parse().map_err(RunError::Static)?;
    let statements: Vec<Stmt> = parser::parse(tokens).map_err(RunError::Static)?;

    let locals = resolver::resolve_locals(&statements).map_err(RunError::Static)?;

    interpreter::interpret(env_ref, locals, &statements)?;

    Ok(())
}
