//! Tree-walking evaluator.
//!
//! Statements execute against the current [`Environment`]; variable reads and
//! writes consult the resolver's per-occurrence distance table and jump
//! directly to the declaring scope, falling back to the global environment
//! for names the resolver left unbound.
//!
//! `return` is not an error: statement execution threads an explicit [`Flow`]
//! value ("continue normally" vs "return with value V") that is checked after
//! each statement in a body and intercepted at the nearest function-call
//! boundary. Runtime faults propagate as [`LoxError::Runtime`] and abort the
//! current top-level statement sequence without corrupting interpreter state
//! for a later run.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use chrono::Utc;
use log::{debug, info};

use crate::ast::{Expr, ExprId, LiteralValue, Stmt};
use crate::callable::{LoxFunction, NativeFunction};
use crate::environment::Environment;
use crate::error::{LoxError, Result};
use crate::token::{Token, TokenType};
use crate::value::Value;

/// Outcome of executing a statement: either control continues normally, or a
/// `return` is unwinding toward the enclosing call boundary.
#[derive(Debug)]
pub enum Flow {
    Normal,
    Return(Value),
}

pub struct Interpreter {
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,

    /// Resolution table: occurrence id → enclosing-scope hop count. Entries
    /// accumulate across runs so closures from earlier REPL lines stay valid.
    locals: HashMap<ExprId, usize>,

    /// Sink for the language's `print` statement.
    output: Box<dyn Write>,
}

impl Interpreter {
    /// Creates a new interpreter with `print` wired to stdout, and defines
    /// native functions such as `clock` in the global scope.
    pub fn new() -> Self {
        Self::with_output(Box::new(std::io::stdout()))
    }

    /// Creates an interpreter whose `print` output goes to `output`.
    pub fn with_output(output: Box<dyn Write>) -> Self {
        info!("Initializing interpreter");

        let globals = Rc::new(RefCell::new(Environment::new()));

        globals.borrow_mut().define(
            "clock",
            Value::Native(Rc::new(NativeFunction {
                name: "clock",
                arity: 0,
                func: |_args: &[Value]| {
                    let seconds: f64 = Utc::now().timestamp_millis() as f64 / 1000.0;
                    Ok(Value::Number(seconds))
                },
            })),
        );

        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            output,
        }
    }

    /// Record a resolved occurrence. Called by the resolver for every local
    /// variable reference or assignment; globals get no entry.
    pub fn resolve(&mut self, id: ExprId, depth: usize) {
        self.locals.insert(id, depth);
    }

    /// Resolved hop count for an occurrence, if it was bound as a local.
    pub fn resolved_depth(&self, id: ExprId) -> Option<usize> {
        self.locals.get(&id).copied()
    }

    /// Executes a list of top-level statements. The first runtime fault stops
    /// the remaining statements and is returned to the host.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<()> {
        debug!("Interpreting {} statements", statements.len());

        for stmt in statements {
            match self.execute(stmt)? {
                Flow::Normal => {}

                Flow::Return(_) => {
                    unreachable!("return escaped to top level; the resolver rejects it")
                }
            }
        }

        info!("Interpretation completed");

        Ok(())
    }

    /// Executes a single statement.
    fn execute(&mut self, stmt: &Stmt) -> Result<Flow> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(Flow::Normal)
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.output, "{}", value)?;
                Ok(Flow::Normal)
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                self.environment.borrow_mut().define(&name.lexeme, value);
                Ok(Flow::Normal)
            }

            Stmt::Block(statements) => {
                let enclosing = Rc::clone(&self.environment);
                let scope = Rc::new(RefCell::new(Environment::with_enclosing(enclosing)));

                self.execute_block(statements, scope)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = self.evaluate(condition)?;

                if is_truthy(&condition) {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }

            Stmt::While { condition, body } => {
                while is_truthy(&self.evaluate(condition)?) {
                    if let Flow::Return(value) = self.execute(body)? {
                        return Ok(Flow::Return(value));
                    }
                }

                Ok(Flow::Normal)
            }

            Stmt::Function(declaration) => {
                debug!("Defining function '{}'", declaration.name.lexeme);

                // The closure captures the environment the declaration runs
                // in; defining the name in that same environment is what lets
                // the function call itself.
                let function = LoxFunction::new(Rc::clone(declaration), Rc::clone(&self.environment));

                self.environment
                    .borrow_mut()
                    .define(&declaration.name.lexeme, Value::Function(Rc::new(function)));

                Ok(Flow::Normal)
            }

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                Ok(Flow::Return(value))
            }
        }
    }

    /// Executes `statements` inside `environment`, restoring the previous
    /// environment on every exit path (completion, fault, pending return).
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> Result<Flow> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let mut outcome = Ok(Flow::Normal);

        for statement in statements {
            match self.execute(statement) {
                Ok(Flow::Normal) => continue,

                other => {
                    outcome = other;
                    break;
                }
            }
        }

        self.environment = previous;

        outcome
    }

    /// Evaluates an expression and returns a [`Value`].
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(value) => Ok(literal_value(value)),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),

            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right),

            Expr::Logical {
                left,
                operator,
                right,
            } => self.evaluate_logical(left, operator, right),

            Expr::Variable { id, name } => self.lookup_variable(name, *id),

            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;

                if let Some(&distance) = self.locals.get(id) {
                    self.environment
                        .borrow_mut()
                        .assign_at(distance, &name.lexeme, value.clone());
                } else {
                    self.globals.borrow_mut().assign(name, value.clone())?;
                }

                Ok(value)
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee = self.evaluate(callee)?;

                let mut args = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    args.push(self.evaluate(argument)?);
                }

                self.invoke_callable(callee, paren, args)
            }
        }
    }

    fn lookup_variable(&self, name: &Token, id: ExprId) -> Result<Value> {
        if let Some(&distance) = self.locals.get(&id) {
            Ok(self.environment.borrow().get_at(distance, &name.lexeme))
        } else {
            self.globals.borrow().get(name)
        }
    }

    fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> Result<Value> {
        let right = self.evaluate(right)?;

        match operator.token_type {
            TokenType::MINUS => match right {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(LoxError::runtime(operator, "Operand must be a number.")),
            },

            TokenType::BANG => Ok(Value::Bool(!is_truthy(&right))),

            _ => Err(LoxError::runtime(operator, "Invalid unary operator.")),
        }
    }

    fn evaluate_logical(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Result<Value> {
        let left = self.evaluate(left)?;

        // Short-circuit: the result is whichever operand value decided it,
        // never a coerced boolean.
        match operator.token_type {
            TokenType::OR if is_truthy(&left) => Ok(left),
            TokenType::AND if !is_truthy(&left) => Ok(left),
            _ => self.evaluate(right),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Result<Value> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        match operator.token_type {
            TokenType::PLUS => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
                _ => Err(LoxError::runtime(
                    operator,
                    "Operands must be two numbers or two strings.",
                )),
            },

            TokenType::MINUS => {
                let (a, b) = check_number_operands(operator, left, right)?;
                Ok(Value::Number(a - b))
            }

            TokenType::STAR => {
                let (a, b) = check_number_operands(operator, left, right)?;
                Ok(Value::Number(a * b))
            }

            // Division follows IEEE-754; dividing by zero yields an infinity.
            TokenType::SLASH => {
                let (a, b) = check_number_operands(operator, left, right)?;
                Ok(Value::Number(a / b))
            }

            TokenType::GREATER => {
                let (a, b) = check_number_operands(operator, left, right)?;
                Ok(Value::Bool(a > b))
            }

            TokenType::GREATER_EQUAL => {
                let (a, b) = check_number_operands(operator, left, right)?;
                Ok(Value::Bool(a >= b))
            }

            TokenType::LESS => {
                let (a, b) = check_number_operands(operator, left, right)?;
                Ok(Value::Bool(a < b))
            }

            TokenType::LESS_EQUAL => {
                let (a, b) = check_number_operands(operator, left, right)?;
                Ok(Value::Bool(a <= b))
            }

            TokenType::EQUAL_EQUAL => Ok(Value::Bool(is_equal(&left, &right))),

            TokenType::BANG_EQUAL => Ok(Value::Bool(!is_equal(&left, &right))),

            _ => Err(LoxError::runtime(operator, "Invalid binary operator.")),
        }
    }

    /// Invokes a callable (native or user-defined function) after checking
    /// that the callee is callable and that the argument count matches its
    /// arity exactly.
    fn invoke_callable(&mut self, callee: Value, paren: &Token, args: Vec<Value>) -> Result<Value> {
        match callee {
            Value::Function(function) => {
                check_arity(function.arity(), args.len(), paren)?;
                function.call(self, args)
            }

            Value::Native(native) => {
                check_arity(native.arity, args.len(), paren)?;
                native
                    .call(&args)
                    .map_err(|message| LoxError::runtime(paren, message))
            }

            _ => Err(LoxError::runtime(paren, "Can only call functions.")),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn check_arity(expected: usize, actual: usize, paren: &Token) -> Result<()> {
    if actual != expected {
        return Err(LoxError::runtime(
            paren,
            format!("Expected {} arguments but got {}.", expected, actual),
        ));
    }

    Ok(())
}

fn check_number_operands(operator: &Token, left: Value, right: Value) -> Result<(f64, f64)> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((a, b)),
        _ => Err(LoxError::runtime(operator, "Operands must be numbers.")),
    }
}

fn literal_value(literal: &LiteralValue) -> Value {
    match literal {
        LiteralValue::Number(n) => Value::Number(*n),
        LiteralValue::Str(s) => Value::String(s.clone()),
        LiteralValue::True => Value::Bool(true),
        LiteralValue::False => Value::Bool(false),
        LiteralValue::Nil => Value::Nil,
    }
}

/// `nil` and `false` are falsey; everything else (including `0` and the
/// empty string) is truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Nil => false,
        Value::Bool(b) => *b,
        _ => true,
    }
}

fn is_equal(left: &Value, right: &Value) -> bool {
    left == right
}
