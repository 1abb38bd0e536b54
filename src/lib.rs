//! sdscheme - a small Scheme-like interpreter
//!
//! Source text goes through three stages:
//!
//! ```text
//! text --lexer--> tokens --parser--> expression tree --evaluator--> value
//! ```
//!
//! ```scheme
//! (define (square x) (* x x))
//! (map square (list 1 2 3))   ; => (1 4 9)
//! (let ((a 1) (b 2)) (+ a b)) ; => 3
//! ```
//!
//! [`Interpreter`] owns the global environment and the `display` sink and is the
//! entry point for hosts. The [`source`] and [`runner`] modules implement the
//! batch execution of `.scheme` files.
//!
//! ## Scoping
//!
//! Scopes are not chained. Entering a closure body or a `let` copies the bindings
//! of the enclosing scope into a new one, so `define` and `set!` inside a nested
//! scope never touch the enclosing bindings. Closures keep a handle to the scope
//! they were created in, which is what makes globally defined recursive
//! procedures work.
//!
//! ## Modules
//!
//! - `lexer`: text to tokens
//! - `parser`: tokens to expressions
//! - `environment`: copy-on-extend variable bindings
//! - `evaluator`: special forms and procedure application
//! - `builtinops`: registry of built-in procedures
//! - `source`: splitting program text into top-level forms
//! - `runner`: batch evaluation of `.scheme` files

use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Error types for the interpreter
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed token stream (unexpected EOF, stray close paren)
    SyntaxError(String),
    /// Symbol lookup miss
    UnboundVariable(String),
    /// Special form or procedure called with the wrong number of arguments
    ArityError {
        expected: usize,
        got: usize,
        expression: Option<String>,
    },
    /// Applying a non-procedure or a malformed special form
    TypeError(String),
    /// Failure inside a builtin, e.g. arithmetic on non-numbers
    RuntimeError(String),
    /// A runtime failure tagged with the procedure being applied
    ApplicationError {
        procedure: String,
        source: Box<Error>,
    },
}

impl Error {
    /// Create an ArityError without expression context
    pub fn arity_error(expected: usize, got: usize) -> Self {
        Error::ArityError {
            expected,
            got,
            expression: None,
        }
    }

    /// Create an ArityError naming the form or procedure
    pub fn arity_error_with_expr(expected: usize, got: usize, expression: impl Into<String>) -> Self {
        Error::ArityError {
            expected,
            got,
            expression: Some(expression.into()),
        }
    }

    /// Strip application tags and return the error that caused the failure
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::ApplicationError { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ApplicationError { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::SyntaxError(msg) => write!(f, "SyntaxError: {msg}"),
            Error::UnboundVariable(var) => write!(f, "Unbound variable: {var}"),
            Error::ArityError {
                expected,
                got,
                expression,
            } => match expression {
                Some(expr) => write!(
                    f,
                    "ArityError: {expr}: expected {expected} arguments, got {got}"
                ),
                None => write!(f, "ArityError: expected {expected} arguments, got {got}"),
            },
            Error::TypeError(msg) => write!(f, "TypeError: {msg}"),
            Error::RuntimeError(msg) => write!(f, "RuntimeError: {msg}"),
            Error::ApplicationError { procedure, source } => {
                write!(f, "{source}\n  In application of: {procedure}")
            }
        }
    }
}

pub mod ast;
pub mod builtinops;
pub mod environment;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod runner;
pub mod source;

pub use ast::Value;
pub use environment::Environment;
pub use evaluator::Output;

/// An interpreter instance: one global environment plus one display sink.
///
/// Every call to [`Interpreter::evaluate`] runs against the same global
/// environment, so definitions persist between calls.
pub struct Interpreter {
    env: Environment,
    output: Output,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Create an interpreter whose `display` writes to stdout
    pub fn new() -> Self {
        Interpreter {
            env: evaluator::create_global_env(),
            output: Output::console(),
        }
    }

    /// Create an interpreter with a custom `display` sink
    pub fn with_display_output<F>(sink: F) -> Self
    where
        F: Fn(&Value) + 'static,
    {
        Interpreter {
            env: evaluator::create_global_env(),
            output: Output::new(Rc::new(sink)),
        }
    }

    /// Replace the active `display` sink
    pub fn set_display_output<F>(&self, sink: F)
    where
        F: Fn(&Value) + 'static,
    {
        self.output.replace(Rc::new(sink));
    }

    /// Tokenize, parse and evaluate every top-level form in `source`, returning
    /// the value of the last one.
    ///
    /// Forms are evaluated in order; the first failure aborts the rest. Empty
    /// input evaluates to [`Value::Unspecified`].
    pub fn evaluate(&self, source: &str) -> Result<Value, Error> {
        let mut tokens: VecDeque<String> = lexer::tokenize(source).into_iter().collect();
        let mut result = Value::Unspecified;
        while !parser::is_exhausted(&tokens) {
            let expr = parser::parse(&mut tokens)?;
            tracing::debug!(form = %expr, "evaluating top-level form");
            result = self.eval_expr(&expr)?;
        }
        Ok(result)
    }

    /// Evaluate an already parsed expression in the global environment
    pub fn eval_expr(&self, expr: &Value) -> Result<Value, Error> {
        evaluator::eval(expr, &self.env, &self.output)
    }

    /// Read-only snapshot of the global bindings
    pub fn environment(&self) -> im::HashMap<String, Value> {
        self.env.snapshot()
    }

    /// The global environment itself
    pub fn global_env(&self) -> &Environment {
        &self.env
    }

    /// One-line description of what `name` refers to at top level, if anything
    pub fn describe(&self, name: &str) -> Option<String> {
        if evaluator::is_special_form(name) {
            return Some(format!("{name}: special form"));
        }
        let value = self.env.get(name)?;
        let description = match (&value, builtinops::find_builtin_op(name)) {
            (Value::BuiltinFunction(bound), Some(op)) if bound.scheme_id == op.scheme_id => {
                format!("{name}: builtin procedure taking {}", op.arity)
            }
            (Value::Function(closure), _) => format!(
                "{name}: procedure ({})",
                closure.params.join(" ")
            ),
            (Value::BuiltinFunction(op), _) => {
                format!("{name}: alias of builtin {}", op.scheme_id)
            }
            (other, _) => format!("{name}: {}", runner::format_value(other)),
        };
        Some(description)
    }
}
