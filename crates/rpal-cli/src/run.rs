//! Pipeline orchestration for the CLI.

use std::fs;
use std::io::{self, Write as _};

use rpal_compiler::{Diagnostic, Error};

use crate::cli::RunParams;

/// Execute the requested action; the return value is the process exit
/// code (0 on success, 1 on any error).
pub fn run(params: &RunParams) -> i32 {
    let path = params.file.display().to_string();
    let source = match fs::read_to_string(&params.file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: cannot read `{path}`: {err}");
            return 1;
        }
    };

    if params.listing {
        print!("{source}");
        if !source.ends_with('\n') {
            println!();
        }
    }

    if params.ast || params.st {
        let tree = if params.ast {
            rpal_compiler::parse(&source)
        } else {
            rpal_compiler::standard_tree(&source)
        };
        return match tree {
            Ok(ast) => {
                print!("{}", ast.dump());
                0
            }
            Err(err) => {
                report(&err, &source, &path);
                1
            }
        };
    }

    let program = match rpal_compiler::compile(&source) {
        Ok(program) => program,
        Err(err) => {
            report(&err, &source, &path);
            return 1;
        }
    };

    let stdout = io::stdout();
    match rpal_vm::evaluate(&program, stdout.lock()) {
        Ok(_) => 0,
        Err(err) => {
            // The observable contract on failure is a bare `Err` line;
            // the detail goes to stderr.
            println!("Err");
            let _ = io::stdout().flush();
            eprintln!("runtime error: {err}");
            1
        }
    }
}

fn report(err: &Error, source: &str, path: &str) {
    match err {
        Error::Syntax(diagnostic) => {
            eprintln!("{}", render_diagnostic(diagnostic, source, path));
        }
        other => eprintln!("error: {other}"),
    }
}

fn render_diagnostic(diagnostic: &Diagnostic, source: &str, path: &str) -> String {
    diagnostic
        .printer()
        .source(source)
        .path(path)
        .colored(io::IsTerminal::is_terminal(&io::stderr()))
        .render()
}
