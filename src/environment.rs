//! Chained name→value mapping, one [`Environment`] per lexical scope.
//!
//! Environments are shared through `Rc<RefCell<…>>`: a block or call frame
//! owns its environment for the duration of its execution, but a closure
//! created inside it keeps the chain alive for as long as the closure itself
//! lives.
//!
//! `get`/`assign` walk the enclosing chain and fault on undefined names;
//! `get_at`/`assign_at` walk **exactly** the distance computed by the
//! resolver and touch that one scope without re-checking existence.

use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    pub enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    /// The root (global) scope.
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    /// A child scope whose lookups fall back to `enclosing`.
    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Bind `name` in this scope, shadowing any existing binding of the same
    /// name in the *same* scope. Always succeeds.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Dynamic lookup: walk the enclosing chain to the root.
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(LoxError::runtime(
                name,
                format!("Undefined variable '{}'.", name.lexeme),
            ))
        }
    }

    /// Dynamic assignment: overwrite the nearest existing binding. Assignment
    /// never implicitly declares.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(LoxError::runtime(
                name,
                format!("Undefined variable '{}'.", name.lexeme),
            ))
        }
    }

    /// Read `name` from the scope exactly `distance` hops up the chain.
    ///
    /// The resolver guarantees both that the chain is deep enough and that
    /// the binding exists there, so no fault path is needed.
    pub fn get_at(&self, distance: usize, name: &str) -> Value {
        if distance == 0 {
            self.values.get(name).cloned().unwrap_or(Value::Nil)
        } else {
            self.enclosing
                .as_ref()
                .expect("resolved distance exceeds environment chain depth")
                .borrow()
                .get_at(distance - 1, name)
        }
    }

    /// Write `name` in the scope exactly `distance` hops up the chain.
    pub fn assign_at(&mut self, distance: usize, name: &str, value: Value) {
        if distance == 0 {
            self.values.insert(name.to_string(), value);
        } else {
            self.enclosing
                .as_ref()
                .expect("resolved distance exceeds environment chain depth")
                .borrow_mut()
                .assign_at(distance - 1, name, value);
        }
    }
}
