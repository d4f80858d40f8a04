//! Callable values: user-defined functions (closures) and native host
//! functions share the same invocation contract — a fixed arity checked by
//! the interpreter at the call site, and a `call` that produces a [`Value`].

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::ast::FunctionDecl;
use crate::environment::Environment;
use crate::error::Result;
use crate::interpreter::{Flow, Interpreter};
use crate::value::Value;

/// A user-defined function value: the shared declaration plus the
/// environment captured at the point of declaration.
///
/// The captured environment — not the caller's — becomes the enclosing scope
/// of each call frame, which is what makes the language lexically scoped.
#[derive(Debug)]
pub struct LoxFunction {
    declaration: Rc<FunctionDecl>,
    closure: Rc<RefCell<Environment>>,
}

impl LoxFunction {
    pub fn new(declaration: Rc<FunctionDecl>, closure: Rc<RefCell<Environment>>) -> Self {
        Self {
            declaration,
            closure,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    pub fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    /// Invoke the function: seed a fresh per-call environment from the
    /// captured closure, bind parameters to the evaluated arguments, and run
    /// the body as a block. A `return` inside the body surfaces here as
    /// [`Flow::Return`]; falling off the end yields `nil`.
    pub fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value> {
        debug!("Calling function '{}'", self.name());

        let mut environment = Environment::with_enclosing(Rc::clone(&self.closure));

        for (param, argument) in self.declaration.params.iter().zip(arguments) {
            environment.define(&param.lexeme, argument);
        }

        let flow = interpreter.execute_block(
            &self.declaration.body,
            Rc::new(RefCell::new(environment)),
        )?;

        match flow {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Nil),
        }
    }
}

/// A host-provided function with a fixed arity and no closure state.
#[derive(Debug)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: fn(&[Value]) -> std::result::Result<Value, String>,
}

impl NativeFunction {
    pub fn call(&self, arguments: &[Value]) -> std::result::Result<Value, String> {
        debug!("Calling native function '{}'", self.name);

        (self.func)(arguments)
    }
}
