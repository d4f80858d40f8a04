#![allow(dead_code)]

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use rlox::diagnostics::Diagnostics;
use rlox::interpreter::Interpreter;
use rlox::parser::Parser;
use rlox::resolver::Resolver;
use rlox::scanner;

/// Shared byte buffer usable as the interpreter's `print` sink.
#[derive(Clone, Default)]
pub struct SharedOutput(Rc<RefCell<Vec<u8>>>);

impl SharedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything printed so far.
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.0.borrow_mut());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub struct RunOutcome {
    /// Everything the program printed.
    pub output: String,

    /// Rendered compile-time diagnostics (scan + parse + resolve).
    pub diagnostics: Vec<String>,

    /// Rendered runtime fault, if interpretation stopped early.
    pub runtime_error: Option<String>,
}

/// Run `source` through the full pipeline with a fresh interpreter.
pub fn run(source: &str) -> RunOutcome {
    let sink = SharedOutput::new();
    let mut interpreter = Interpreter::with_output(Box::new(sink.clone()));

    run_with(&mut interpreter, &sink, source)
}

/// Run `source` against an existing interpreter, as a REPL would.
pub fn run_with(interpreter: &mut Interpreter, sink: &SharedOutput, source: &str) -> RunOutcome {
    let mut diagnostics = Diagnostics::new();
    let tokens = scanner::scan(source.as_bytes(), &mut diagnostics);
    let statements = Parser::new(&tokens, &mut diagnostics).parse();

    if !diagnostics.had_errors() {
        Resolver::new(interpreter, &mut diagnostics).resolve(&statements);
    }

    let mut runtime_error = None;
    if !diagnostics.had_errors() {
        if let Err(error) = interpreter.interpret(&statements) {
            runtime_error = Some(error.to_string());
        }
    }

    RunOutcome {
        output: sink.take(),
        diagnostics: diagnostics.iter().map(|e| e.to_string()).collect(),
        runtime_error,
    }
}
