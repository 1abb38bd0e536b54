use crate::builtinops::BuiltinOp;
use crate::environment::Environment;
use std::rc::Rc;

/// Core value type, shared by parsed expressions and evaluation results
///
/// Lists are reference counted so that `eq?` can tell two separately built
/// lists apart even when their contents are equal.
#[derive(Debug, Clone)]
pub enum Value {
    /// Numbers (double precision)
    Number(f64),
    /// Boolean values
    Bool(bool),
    /// String values
    String(String),
    /// Symbols (identifiers); also the raw form of quoted string tokens until evaluated
    Symbol(String),
    /// Lists; the empty list `()` is distinct from `Nil`
    List(Rc<Vec<Value>>),
    /// The `null` value
    Nil,
    /// Result of forms evaluated for effect (`define`, `set!`, `display`)
    Unspecified,
    /// Built-in procedures from the registry
    BuiltinFunction(&'static BuiltinOp),
    /// User-defined procedures
    Function(Rc<Closure>),
}

/// A user-defined procedure: parameters, body and the environment it was created in
pub struct Closure {
    pub params: Vec<String>,
    pub body: Value,
    pub env: Environment,
}

// The captured environment usually contains the closure itself.
impl std::fmt::Debug for Closure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Closure")
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

/// Render a number the way the host language prints doubles
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        format!("{}", n)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Bool(b) => write!(f, "{}", if *b { "#t" } else { "#f" }),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Symbol(s) => write!(f, "{}", s),
            Value::List(elements) => {
                write!(f, "(")?;
                for (i, elem) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", elem)?;
                }
                write!(f, ")")
            }
            Value::Nil => write!(f, "null"),
            Value::Unspecified => write!(f, "#<unspecified>"),
            Value::BuiltinFunction(op) => write!(f, "#<builtin-function:{}>", op.scheme_id),
            Value::Function(_) => write!(f, "#<procedure>"),
        }
    }
}

impl Value {
    /// Build a list value
    pub fn list(elements: Vec<Value>) -> Value {
        Value::List(Rc::new(elements))
    }

    /// Check if a value is Nil or the empty list
    pub fn is_nil(&self) -> bool {
        match self {
            Value::Nil => true,
            Value::List(list) => list.is_empty(),
            _ => false,
        }
    }

    /// Truthiness used by conditionals and the logical builtins.
    ///
    /// `#f`, `0`, NaN, `""`, Nil and Unspecified are false. The empty list is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Nil | Value::Unspecified => false,
            Value::Symbol(_)
            | Value::List(_)
            | Value::BuiltinFunction(_)
            | Value::Function(_) => true,
        }
    }

    /// Check if a value can be applied
    pub fn is_procedure(&self) -> bool {
        matches!(self, Value::BuiltinFunction(_) | Value::Function(_))
    }

    /// Elements of a list argument, treating Nil as the empty list
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(elements) => Some(elements.as_slice()),
            Value::Nil => Some(&[][..]),
            _ => None,
        }
    }

    /// If this is a symbol wrapped in matching `"` or `'` quotes, return the text between them
    pub fn as_string_literal(&self) -> Option<&str> {
        match self {
            Value::Symbol(token) => ['"', '\''].iter().find_map(|&quote| {
                token
                    .strip_prefix(quote)
                    .and_then(|rest| rest.strip_suffix(quote))
            }),
            _ => None,
        }
    }

    /// Text handed to the console by `display`: strings without quotes
    pub fn to_display_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Canonical serialized form used by `=` and `equal?`.
    ///
    /// Mirrors JSON serialization: symbols and strings are both strings,
    /// non-finite numbers and values without a data representation become null.
    pub fn to_canonical(&self) -> serde_json::Value {
        match self {
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::String(s) | Value::Symbol(s) => serde_json::Value::String(s.clone()),
            Value::List(elements) => {
                serde_json::Value::Array(elements.iter().map(Value::to_canonical).collect())
            }
            Value::Nil
            | Value::Unspecified
            | Value::BuiltinFunction(_)
            | Value::Function(_) => serde_json::Value::Null,
        }
    }

    /// Identity comparison used by `eq?`
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            (Value::Unspecified, Value::Unspecified) => true,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::BuiltinFunction(a), Value::BuiltinFunction(b)) => a.scheme_id == b.scheme_id,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            (Value::Unspecified, Value::Unspecified) => true,
            (Value::BuiltinFunction(a), Value::BuiltinFunction(b)) => {
                // Compare BuiltinFunctions by id string, not function pointer
                a.scheme_id == b.scheme_id
            }
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false, // Different variants are never equal
        }
    }
}
