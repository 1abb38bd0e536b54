//! Built-in procedures registry.
//!
//! Every procedure bound in the global environment at startup is described by a
//! [`BuiltinOp`] entry in a single static table: its Scheme name, its
//! implementation and its declared [`Arity`].
//!
//! ```scheme
//! (+ 1 2 3)                       ; arithmetic
//! (equal? (list 1 2) (list 1 2))  ; structural equality
//! (map (lambda (x) (* x x)) (list 1 2 3))
//! ```
//!
//! ## Functions vs Applicatives
//!
//! - **Functions** only see their evaluated arguments (e.g. `+`, `car`, `sqrt`).
//! - **Applicatives** additionally receive the interpreter's [`Output`] so they can
//!   call back into procedures (`map`, `filter`, `fold`, `apply`) or reach the
//!   display sink (`display`).
//!
//! Special forms (`if`, `define`, `lambda`, ...) are not procedures and live in the
//! evaluator.
//!
//! ## Error Handling
//!
//! The argument count is checked against [`Arity`] by the evaluator before the
//! implementation runs, and reported as an `ArityError`. Wrong argument types are
//! reported by the implementation as a `RuntimeError`, which the evaluator then
//! tags with the name of the procedure being applied.
//!
//! ## Adding New Operations
//!
//! 1. Implement the function with the signature `fn(&[Value]) -> Result<Value, Error>`
//!    (or `fn(&[Value], &Output) -> Result<Value, Error>` if it needs to apply procedures)
//! 2. Add an entry to `BUILTIN_OPS` with its Scheme name and arity
//! 3. Add tests covering edge cases and error conditions

use crate::Error;
use crate::ast::Value;
use crate::evaluator::{Output, apply};
use rand::Rng;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Represents the expected number of arguments for an operation
#[derive(Debug, Clone, PartialEq)]
pub enum Arity {
    /// Exactly n arguments required
    Exact(usize),
    /// At least n arguments required
    AtLeast(usize),
    /// Between min and max arguments (inclusive)
    Range(usize, usize),
    /// Any number of arguments (0 or more)
    Any,
}

impl Arity {
    /// Check if the given number of arguments is valid for this arity constraint
    pub fn validate(&self, arg_count: usize) -> Result<(), Error> {
        if self.accepts(arg_count) {
            Ok(())
        } else {
            Err(Error::arity_error(self.expected(arg_count), arg_count))
        }
    }

    /// Like [`Arity::validate`], naming the form or procedure in the error
    pub fn validate_for(&self, name: &str, arg_count: usize) -> Result<(), Error> {
        if self.accepts(arg_count) {
            Ok(())
        } else {
            Err(Error::arity_error_with_expr(
                self.expected(arg_count),
                arg_count,
                name,
            ))
        }
    }

    fn accepts(&self, arg_count: usize) -> bool {
        match self {
            Arity::Exact(n) => arg_count == *n,
            Arity::AtLeast(n) => arg_count >= *n,
            Arity::Range(min, max) => arg_count >= *min && arg_count <= *max,
            Arity::Any => true,
        }
    }

    /// The bound that was violated, for error reporting
    fn expected(&self, arg_count: usize) -> usize {
        match self {
            Arity::Exact(n) => *n,
            Arity::AtLeast(n) => *n,
            Arity::Range(min, max) => {
                if arg_count > *max {
                    *max
                } else {
                    *min
                }
            }
            Arity::Any => 0,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arity::Exact(1) => write!(f, "1 argument"),
            Arity::Exact(n) => write!(f, "{n} arguments"),
            Arity::AtLeast(n) => write!(f, "at least {n} arguments"),
            Arity::Range(min, max) => write!(f, "{min} to {max} arguments"),
            Arity::Any => write!(f, "any number of arguments"),
        }
    }
}

/// The implementation of a built-in procedure
#[derive(Clone)]
pub enum OpKind {
    /// Pure function of the evaluated arguments
    Function(fn(&[Value]) -> Result<Value, Error>),
    /// Function that may apply procedures or write to the display sink
    Applicative(fn(&[Value], &Output) -> Result<Value, Error>),
}

impl std::fmt::Debug for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpKind::Function(_) => write!(f, "Function(<fn>)"),
            OpKind::Applicative(_) => write!(f, "Applicative(<fn>)"),
        }
    }
}

/// Definition of a built-in procedure
#[derive(Debug, Clone)]
pub struct BuiltinOp {
    /// The Scheme identifier for this operation
    pub scheme_id: &'static str,
    /// The implementation of this operation
    pub op_kind: OpKind,
    /// Expected number of arguments
    pub arity: Arity,
}

impl PartialEq for BuiltinOp {
    fn eq(&self, other: &Self) -> bool {
        // Compare operations by their scheme_id, which uniquely identifies them
        self.scheme_id == other.scheme_id
    }
}

impl BuiltinOp {
    /// Check the argument count, naming this operation in the error
    pub fn validate_arity(&self, arg_count: usize) -> Result<(), Error> {
        self.arity.validate_for(self.scheme_id, arg_count)
    }

    /// Run the implementation; arity must already have been validated
    pub fn invoke(&self, args: &[Value], output: &Output) -> Result<Value, Error> {
        match &self.op_kind {
            OpKind::Function(f) => f(args),
            OpKind::Applicative(f) => f(args, output),
        }
    }
}

//
// Argument helpers
//

fn number_arg(op: &str, value: &Value) -> Result<f64, Error> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(Error::RuntimeError(format!(
            "{op} requires numbers, got {other}"
        ))),
    }
}

fn list_arg<'a>(op: &str, value: &'a Value) -> Result<&'a [Value], Error> {
    value
        .as_list()
        .ok_or_else(|| Error::RuntimeError(format!("{op} requires a list, got {value}")))
}

fn procedure_arg<'a>(op: &str, value: &'a Value) -> Result<&'a Value, Error> {
    if value.is_procedure() {
        Ok(value)
    } else {
        Err(Error::RuntimeError(format!(
            "{op} requires a procedure, got {value}"
        )))
    }
}

/// Left-fold numeric arguments after the first
fn fold_numbers(op: &str, first: &Value, rest: &[Value], f: fn(f64, f64) -> f64) -> Result<Value, Error> {
    let mut acc = number_arg(op, first)?;
    for arg in rest {
        acc = f(acc, number_arg(op, arg)?);
    }
    Ok(Value::Number(acc))
}

//
// Math
//

/// `Math.round`: halves round toward positive infinity
fn js_round(x: f64) -> f64 {
    let floor = x.floor();
    // Compare the fraction instead of adding 0.5, which can round up
    if x - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// `Math.sign`: zero and NaN map to themselves
fn js_sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        x
    }
}

/// `ToUint32`: non-finite values map to 0, the rest wrap modulo 2^32
fn to_uint32(x: f64) -> u32 {
    if x.is_finite() {
        x.trunc().rem_euclid(4_294_967_296.0) as u32
    } else {
        0
    }
}

/// `Math.fround`: nearest single-precision value
fn js_fround(x: f64) -> f64 {
    x as f32 as f64
}

/// `Math.clz32`: leading zero bits of the 32-bit unsigned form
fn js_clz32(x: f64) -> f64 {
    to_uint32(x).leading_zeros() as f64
}

// Macro to generate single-argument math functions
macro_rules! unary_math {
    ($($name:ident => $id:literal, $f:expr;)*) => {
        $(
            pub fn $name(args: &[Value]) -> Result<Value, Error> {
                match args {
                    [x] => Ok(Value::Number(($f)(number_arg($id, x)?))),
                    _ => Err(Error::arity_error(1, args.len())),
                }
            }
        )*
    };
}

unary_math! {
    builtin_abs => "abs", f64::abs;
    builtin_acos => "acos", f64::acos;
    builtin_acosh => "acosh", f64::acosh;
    builtin_asin => "asin", f64::asin;
    builtin_asinh => "asinh", f64::asinh;
    builtin_atan => "atan", f64::atan;
    builtin_atanh => "atanh", f64::atanh;
    builtin_cbrt => "cbrt", f64::cbrt;
    builtin_ceil => "ceil", f64::ceil;
    builtin_cos => "cos", f64::cos;
    builtin_cosh => "cosh", f64::cosh;
    builtin_exp => "exp", f64::exp;
    builtin_expm1 => "expm1", f64::exp_m1;
    builtin_floor => "floor", f64::floor;
    builtin_fround => "fround", js_fround;
    builtin_clz32 => "clz32", js_clz32;
    builtin_log => "log", f64::ln;
    builtin_log10 => "log10", f64::log10;
    builtin_log1p => "log1p", f64::ln_1p;
    builtin_log2 => "log2", f64::log2;
    builtin_round => "round", js_round;
    builtin_sign => "sign", js_sign;
    builtin_sin => "sin", f64::sin;
    builtin_sinh => "sinh", f64::sinh;
    builtin_sqrt => "sqrt", f64::sqrt;
    builtin_tan => "tan", f64::tan;
    builtin_tanh => "tanh", f64::tanh;
    builtin_trunc => "trunc", f64::trunc;
}

pub fn builtin_max(args: &[Value]) -> Result<Value, Error> {
    match args {
        [first, rest @ ..] => fold_numbers("max", first, rest, f64::max),
        [] => Err(Error::arity_error(1, 0)),
    }
}

pub fn builtin_min(args: &[Value]) -> Result<Value, Error> {
    match args {
        [first, rest @ ..] => fold_numbers("min", first, rest, f64::min),
        [] => Err(Error::arity_error(1, 0)),
    }
}

pub fn builtin_pow(args: &[Value]) -> Result<Value, Error> {
    match args {
        [base, exponent] => Ok(Value::Number(
            number_arg("pow", base)?.powf(number_arg("pow", exponent)?),
        )),
        _ => Err(Error::arity_error(2, args.len())),
    }
}

pub fn builtin_atan2(args: &[Value]) -> Result<Value, Error> {
    match args {
        [y, x] => Ok(Value::Number(
            number_arg("atan2", y)?.atan2(number_arg("atan2", x)?),
        )),
        _ => Err(Error::arity_error(2, args.len())),
    }
}

/// Square root of the sum of squares; an infinite argument wins over NaN
pub fn builtin_hypot(args: &[Value]) -> Result<Value, Error> {
    let mut acc = 0.0_f64;
    for arg in args {
        acc = acc.hypot(number_arg("hypot", arg)?);
    }
    Ok(Value::Number(acc))
}

/// 32-bit integer multiplication with wraparound
pub fn builtin_imul(args: &[Value]) -> Result<Value, Error> {
    match args {
        [a, b] => {
            let a = to_uint32(number_arg("imul", a)?) as i32;
            let b = to_uint32(number_arg("imul", b)?) as i32;
            Ok(Value::Number(a.wrapping_mul(b) as f64))
        }
        _ => Err(Error::arity_error(2, args.len())),
    }
}

/// Uniform value in `[0, 1)`
pub fn builtin_random(args: &[Value]) -> Result<Value, Error> {
    match args {
        [] => Ok(Value::Number(rand::thread_rng().r#gen::<f64>())),
        _ => Err(Error::arity_error(0, args.len())),
    }
}

//
// Arithmetic
//

pub fn builtin_add(args: &[Value]) -> Result<Value, Error> {
    let mut sum = 0.0;
    for arg in args {
        sum += number_arg("+", arg)?;
    }
    Ok(Value::Number(sum))
}

pub fn builtin_sub(args: &[Value]) -> Result<Value, Error> {
    match args {
        [] => Err(Error::arity_error(1, 0)),
        [only] => Ok(Value::Number(-number_arg("-", only)?)),
        [first, rest @ ..] => fold_numbers("-", first, rest, |a, b| a - b),
    }
}

pub fn builtin_mul(args: &[Value]) -> Result<Value, Error> {
    let mut product = 1.0;
    for arg in args {
        product *= number_arg("*", arg)?;
    }
    Ok(Value::Number(product))
}

pub fn builtin_div(args: &[Value]) -> Result<Value, Error> {
    match args {
        [] => Err(Error::arity_error(1, 0)),
        [only] => Ok(Value::Number(1.0 / number_arg("/", only)?)),
        [first, rest @ ..] => fold_numbers("/", first, rest, |a, b| a / b),
    }
}

pub fn builtin_remainder(args: &[Value]) -> Result<Value, Error> {
    match args {
        [x, y] => Ok(Value::Number(
            number_arg("remainder", x)? % number_arg("remainder", y)?,
        )),
        _ => Err(Error::arity_error(2, args.len())),
    }
}

pub fn builtin_modulo(args: &[Value]) -> Result<Value, Error> {
    match args {
        [x, y] => {
            let x = number_arg("modulo", x)?;
            let y = number_arg("modulo", y)?;
            Ok(Value::Number(((x % y) + y) % y))
        }
        _ => Err(Error::arity_error(2, args.len())),
    }
}

//
// Comparison and logic
//

// Macro to generate binary numeric comparison functions
macro_rules! numeric_comparison {
    ($name:ident, $op:tt, $op_str:expr) => {
        pub fn $name(args: &[Value]) -> Result<Value, Error> {
            match args {
                [a, b] => {
                    let a = number_arg($op_str, a)?;
                    let b = number_arg($op_str, b)?;
                    Ok(Value::Bool(a $op b))
                }
                _ => Err(Error::arity_error(2, args.len())),
            }
        }
    };
}

numeric_comparison!(builtin_gt, >, ">");
numeric_comparison!(builtin_lt, <, "<");
numeric_comparison!(builtin_ge, >=, ">=");
numeric_comparison!(builtin_le, <=, "<=");

/// Structural equality over the canonical serialized form (`=` and `equal?`)
pub fn builtin_equal(args: &[Value]) -> Result<Value, Error> {
    match args {
        [first, second] => Ok(Value::Bool(first.to_canonical() == second.to_canonical())),
        _ => Err(Error::arity_error(2, args.len())),
    }
}

pub fn builtin_eq(args: &[Value]) -> Result<Value, Error> {
    match args {
        [first, second] => Ok(Value::Bool(first.is_identical(second))),
        _ => Err(Error::arity_error(2, args.len())),
    }
}

pub fn builtin_not(args: &[Value]) -> Result<Value, Error> {
    match args {
        [value] => Ok(Value::Bool(!value.is_truthy())),
        _ => Err(Error::arity_error(1, args.len())),
    }
}

/// First truthy argument, else the last one. Arguments arrive already evaluated.
pub fn builtin_or(args: &[Value]) -> Result<Value, Error> {
    match args.iter().find(|arg| arg.is_truthy()).or(args.last()) {
        Some(value) => Ok(value.clone()),
        None => Ok(Value::Bool(false)),
    }
}

/// First falsy argument, else the last one. Arguments arrive already evaluated.
pub fn builtin_and(args: &[Value]) -> Result<Value, Error> {
    match args.iter().find(|arg| !arg.is_truthy()).or(args.last()) {
        Some(value) => Ok(value.clone()),
        None => Ok(Value::Bool(true)),
    }
}

//
// Lists
//

pub fn builtin_list(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::list(args.to_vec()))
}

pub fn builtin_is_list(args: &[Value]) -> Result<Value, Error> {
    match args {
        [value] => Ok(Value::Bool(matches!(value, Value::List(_)))),
        _ => Err(Error::arity_error(1, args.len())),
    }
}

pub fn builtin_null(args: &[Value]) -> Result<Value, Error> {
    match args {
        [value] => Ok(Value::Bool(value.is_nil())),
        _ => Err(Error::arity_error(1, args.len())),
    }
}

pub fn builtin_pair(args: &[Value]) -> Result<Value, Error> {
    match args {
        [Value::List(list)] => Ok(Value::Bool(!list.is_empty())),
        [_] => Ok(Value::Bool(false)),
        _ => Err(Error::arity_error(1, args.len())),
    }
}

pub fn builtin_length(args: &[Value]) -> Result<Value, Error> {
    match args {
        [Value::String(s)] => Ok(Value::Number(s.chars().count() as f64)),
        [value] => Ok(Value::Number(list_arg("length", value)?.len() as f64)),
        _ => Err(Error::arity_error(1, args.len())),
    }
}

pub fn builtin_car(args: &[Value]) -> Result<Value, Error> {
    match args {
        [value] => Ok(list_arg("car", value)?
            .first()
            .cloned()
            .unwrap_or(Value::Nil)),
        _ => Err(Error::arity_error(1, args.len())),
    }
}

pub fn builtin_cdr(args: &[Value]) -> Result<Value, Error> {
    match args {
        [value] => match list_arg("cdr", value)? {
            [] => Ok(Value::Nil),
            [_, rest @ ..] => Ok(Value::list(rest.to_vec())),
        },
        _ => Err(Error::arity_error(1, args.len())),
    }
}

pub fn builtin_cons(args: &[Value]) -> Result<Value, Error> {
    match args {
        [first, rest] => {
            let mut new_list = vec![first.clone()];
            match rest {
                Value::List(elements) => new_list.extend_from_slice(elements),
                Value::Nil => {}
                other => new_list.push(other.clone()),
            }
            Ok(Value::list(new_list))
        }
        _ => Err(Error::arity_error(2, args.len())),
    }
}

/// Concatenate lists; non-list arguments are appended as single elements
pub fn builtin_append(args: &[Value]) -> Result<Value, Error> {
    let mut result = Vec::new();
    for arg in args {
        match arg {
            Value::List(elements) => result.extend_from_slice(elements),
            Value::Nil => {}
            other => result.push(other.clone()),
        }
    }
    Ok(Value::list(result))
}

pub fn builtin_reverse(args: &[Value]) -> Result<Value, Error> {
    match args {
        [value] => Ok(Value::list(
            list_arg("reverse", value)?.iter().rev().cloned().collect(),
        )),
        _ => Err(Error::arity_error(1, args.len())),
    }
}

//
// Higher-order procedures
//

pub fn builtin_map(args: &[Value], output: &Output) -> Result<Value, Error> {
    match args {
        [procedure, list] => {
            let procedure = procedure_arg("map", procedure)?;
            let mapped = list_arg("map", list)?
                .iter()
                .map(|item| apply(procedure, std::slice::from_ref(item), output))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::list(mapped))
        }
        _ => Err(Error::arity_error(2, args.len())),
    }
}

pub fn builtin_filter(args: &[Value], output: &Output) -> Result<Value, Error> {
    match args {
        [procedure, list] => {
            let procedure = procedure_arg("filter", procedure)?;
            let mut kept = Vec::new();
            for item in list_arg("filter", list)? {
                if apply(procedure, std::slice::from_ref(item), output)?.is_truthy() {
                    kept.push(item.clone());
                }
            }
            Ok(Value::list(kept))
        }
        _ => Err(Error::arity_error(2, args.len())),
    }
}

/// `(fold f init list)` calls `(f acc item)` from left to right
pub fn builtin_fold(args: &[Value], output: &Output) -> Result<Value, Error> {
    match args {
        [procedure, init, list] => {
            let procedure = procedure_arg("fold", procedure)?;
            let mut acc = init.clone();
            for item in list_arg("fold", list)? {
                acc = apply(procedure, &[acc, item.clone()], output)?;
            }
            Ok(acc)
        }
        _ => Err(Error::arity_error(3, args.len())),
    }
}

pub fn builtin_apply(args: &[Value], output: &Output) -> Result<Value, Error> {
    match args {
        [procedure, list] => {
            let procedure = procedure_arg("apply", procedure)?;
            apply(procedure, list_arg("apply", list)?, output)
        }
        _ => Err(Error::arity_error(2, args.len())),
    }
}

//
// Output and errors
//

pub fn builtin_display(args: &[Value], output: &Output) -> Result<Value, Error> {
    match args {
        [value] => {
            output.emit(value);
            Ok(Value::Unspecified)
        }
        _ => Err(Error::arity_error(1, args.len())),
    }
}

pub fn builtin_error(args: &[Value]) -> Result<Value, Error> {
    // Convert a value to error message string
    fn value_to_error_string(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(), // Remove quotes for error messages
            _ => format!("{}", value),     // Use Display trait for everything else
        }
    }

    if args.is_empty() {
        return Err(Error::RuntimeError("Error".to_string()));
    }
    let message = args
        .iter()
        .map(value_to_error_string)
        .collect::<Vec<_>>()
        .join(" ");
    Err(Error::RuntimeError(message))
}

macro_rules! function {
    ($id:literal, $f:expr, $arity:expr) => {
        BuiltinOp {
            scheme_id: $id,
            op_kind: OpKind::Function($f),
            arity: $arity,
        }
    };
}

macro_rules! applicative {
    ($id:literal, $f:expr, $arity:expr) => {
        BuiltinOp {
            scheme_id: $id,
            op_kind: OpKind::Applicative($f),
            arity: $arity,
        }
    };
}

/// Global registry of all built-in procedures
static BUILTIN_OPS: &[BuiltinOp] = &[
    // Math
    function!("abs", builtin_abs, Arity::Exact(1)),
    function!("acos", builtin_acos, Arity::Exact(1)),
    function!("acosh", builtin_acosh, Arity::Exact(1)),
    function!("asin", builtin_asin, Arity::Exact(1)),
    function!("asinh", builtin_asinh, Arity::Exact(1)),
    function!("atan", builtin_atan, Arity::Exact(1)),
    function!("atanh", builtin_atanh, Arity::Exact(1)),
    function!("cbrt", builtin_cbrt, Arity::Exact(1)),
    function!("ceil", builtin_ceil, Arity::Exact(1)),
    function!("cos", builtin_cos, Arity::Exact(1)),
    function!("cosh", builtin_cosh, Arity::Exact(1)),
    function!("exp", builtin_exp, Arity::Exact(1)),
    function!("expm1", builtin_expm1, Arity::Exact(1)),
    function!("floor", builtin_floor, Arity::Exact(1)),
    function!("fround", builtin_fround, Arity::Exact(1)),
    function!("clz32", builtin_clz32, Arity::Exact(1)),
    function!("log", builtin_log, Arity::Exact(1)),
    function!("log10", builtin_log10, Arity::Exact(1)),
    function!("log1p", builtin_log1p, Arity::Exact(1)),
    function!("log2", builtin_log2, Arity::Exact(1)),
    function!("round", builtin_round, Arity::Exact(1)),
    function!("sign", builtin_sign, Arity::Exact(1)),
    function!("sin", builtin_sin, Arity::Exact(1)),
    function!("sinh", builtin_sinh, Arity::Exact(1)),
    function!("sqrt", builtin_sqrt, Arity::Exact(1)),
    function!("tan", builtin_tan, Arity::Exact(1)),
    function!("tanh", builtin_tanh, Arity::Exact(1)),
    function!("trunc", builtin_trunc, Arity::Exact(1)),
    function!("max", builtin_max, Arity::AtLeast(1)),
    function!("min", builtin_min, Arity::AtLeast(1)),
    function!("pow", builtin_pow, Arity::Exact(2)),
    function!("atan2", builtin_atan2, Arity::Exact(2)),
    function!("hypot", builtin_hypot, Arity::Any),
    function!("imul", builtin_imul, Arity::Exact(2)),
    function!("random", builtin_random, Arity::Exact(0)),
    // Arithmetic
    function!("+", builtin_add, Arity::Any),
    function!("-", builtin_sub, Arity::AtLeast(1)),
    function!("*", builtin_mul, Arity::Any),
    function!("/", builtin_div, Arity::AtLeast(1)),
    function!("remainder", builtin_remainder, Arity::Exact(2)),
    function!("modulo", builtin_modulo, Arity::Exact(2)),
    // Comparison
    function!(">", builtin_gt, Arity::Exact(2)),
    function!("<", builtin_lt, Arity::Exact(2)),
    function!(">=", builtin_ge, Arity::Exact(2)),
    function!("<=", builtin_le, Arity::Exact(2)),
    function!("=", builtin_equal, Arity::Exact(2)),
    function!("equal?", builtin_equal, Arity::Exact(2)),
    function!("eq?", builtin_eq, Arity::Exact(2)),
    // Logic
    function!("not", builtin_not, Arity::Exact(1)),
    function!("or", builtin_or, Arity::Any),
    function!("and", builtin_and, Arity::Any),
    // Lists
    function!("list", builtin_list, Arity::Any),
    function!("list?", builtin_is_list, Arity::Exact(1)),
    function!("null?", builtin_null, Arity::Exact(1)),
    function!("pair?", builtin_pair, Arity::Exact(1)),
    function!("length", builtin_length, Arity::Exact(1)),
    function!("car", builtin_car, Arity::Exact(1)),
    function!("cdr", builtin_cdr, Arity::Exact(1)),
    function!("cons", builtin_cons, Arity::Exact(2)),
    function!("append", builtin_append, Arity::Any),
    function!("reverse", builtin_reverse, Arity::Exact(1)),
    // Higher-order
    applicative!("map", builtin_map, Arity::Exact(2)),
    applicative!("filter", builtin_filter, Arity::Exact(2)),
    applicative!("fold", builtin_fold, Arity::Exact(3)),
    applicative!("reduce", builtin_fold, Arity::Exact(3)),
    applicative!("apply", builtin_apply, Arity::Exact(2)),
    // Output and errors
    applicative!("display", builtin_display, Arity::Exact(1)),
    function!("error", builtin_error, Arity::Any),
];

/// Lazy static map from scheme_id to BuiltinOp (private - use find_builtin_op)
static BUILTIN_SCHEME: LazyLock<HashMap<&'static str, &'static BuiltinOp>> =
    LazyLock::new(|| BUILTIN_OPS.iter().map(|op| (op.scheme_id, op)).collect());

/// Get all builtin operations (used to seed the global environment)
pub fn get_builtin_ops() -> &'static [BuiltinOp] {
    BUILTIN_OPS
}

/// Find a builtin op by its Scheme id
pub fn find_builtin_op(id: &str) -> Option<&'static BuiltinOp> {
    BUILTIN_SCHEME.get(id).copied()
}
