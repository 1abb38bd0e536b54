use crate::Error;
use crate::ast::{Closure, Value};
use crate::builtinops::{Arity, get_builtin_ops};
use crate::environment::Environment;
use std::cell::RefCell;
use std::collections::HashMap;
use std::f64::consts;
use std::rc::Rc;
use std::sync::LazyLock;

/// Receiver for values passed to `display`
pub type DisplaySink = Rc<dyn Fn(&Value)>;

/// The display side channel, owned by an interpreter and threaded through evaluation
pub struct Output {
    sink: RefCell<DisplaySink>,
}

impl Output {
    pub fn new(sink: DisplaySink) -> Self {
        Output {
            sink: RefCell::new(sink),
        }
    }

    /// Sink that prints to stdout, strings without their quotes
    pub fn console() -> Self {
        Self::new(Rc::new(|value: &Value| {
            println!("{}", value.to_display_string())
        }))
    }

    /// Swap in a new sink; the previous one is dropped
    pub fn replace(&self, sink: DisplaySink) {
        *self.sink.borrow_mut() = sink;
    }

    pub fn emit(&self, value: &Value) {
        // Clone the handle so a sink may itself replace the sink
        let sink = self.sink.borrow().clone();
        sink(value)
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::console()
    }
}

impl std::fmt::Debug for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Output").finish_non_exhaustive()
    }
}

/// Special forms receive their arguments unevaluated
type SpecialForm = fn(&[Value], &Environment, &Output) -> Result<Value, Error>;

struct SpecialFormDef {
    /// Arity of the arguments, not counting the form's name
    arity: Arity,
    eval: SpecialForm,
}

static SPECIAL_FORMS: LazyLock<HashMap<&'static str, SpecialFormDef>> = LazyLock::new(|| {
    let forms: [(&'static str, Arity, SpecialForm); 9] = [
        ("quote", Arity::Any, eval_quote),
        ("if", Arity::Range(2, 3), eval_if),
        ("cond", Arity::AtLeast(1), eval_cond),
        ("define", Arity::AtLeast(2), eval_define),
        ("set!", Arity::Exact(2), eval_set),
        ("lambda", Arity::Exact(2), eval_lambda),
        ("let", Arity::AtLeast(2), eval_let),
        ("let*", Arity::AtLeast(2), eval_let_star),
        ("begin", Arity::AtLeast(1), eval_begin),
    ];
    forms
        .into_iter()
        .map(|(name, arity, eval)| (name, SpecialFormDef { arity, eval }))
        .collect()
});

/// Check whether a name is reserved for a special form
pub fn is_special_form(name: &str) -> bool {
    SPECIAL_FORMS.contains_key(name)
}

/// Evaluate an expression in the given environment
pub fn eval(expr: &Value, env: &Environment, output: &Output) -> Result<Value, Error> {
    match expr {
        Value::Symbol(name) => match expr.as_string_literal() {
            Some(text) => Ok(Value::String(text.to_string())),
            None => env
                .get(name)
                .ok_or_else(|| Error::UnboundVariable(name.clone())),
        },

        Value::List(elements) if !elements.is_empty() => eval_list(elements, env, output),

        // Everything else, including the empty list, evaluates to itself
        _ => Ok(expr.clone()),
    }
}

/// Evaluate a non-empty list: special form or procedure application
fn eval_list(elements: &[Value], env: &Environment, output: &Output) -> Result<Value, Error> {
    if let [Value::Symbol(name), args @ ..] = elements {
        if let Some(form) = SPECIAL_FORMS.get(name.as_str()) {
            form.arity.validate_for(name, args.len())?;
            return (form.eval)(args, env, output);
        }
    }
    eval_application(elements, env, output)
}

fn eval_application(elements: &[Value], env: &Environment, output: &Output) -> Result<Value, Error> {
    let Some((head, arg_exprs)) = elements.split_first() else {
        return Ok(Value::list(Vec::new()));
    };

    let procedure = eval(head, env, output)?;
    let args = arg_exprs
        .iter()
        .map(|arg| eval(arg, env, output))
        .collect::<Result<Vec<_>, _>>()?;

    if !procedure.is_procedure() {
        return Err(Error::TypeError(format!(
            "{head} is not a procedure (got {procedure})"
        )));
    }

    tracing::trace!(procedure = %head, args = args.len(), "applying procedure");
    apply(&procedure, &args, output).map_err(|err| match err {
        Error::RuntimeError(_) => Error::ApplicationError {
            procedure: head.to_string(),
            source: Box::new(err),
        },
        other => other,
    })
}

/// Apply a procedure to already evaluated arguments
pub fn apply(procedure: &Value, args: &[Value], output: &Output) -> Result<Value, Error> {
    match procedure {
        Value::BuiltinFunction(op) => {
            op.validate_arity(args.len())?;
            op.invoke(args, output)
        }
        Value::Function(closure) => {
            if closure.params.len() != args.len() {
                return Err(Error::arity_error_with_expr(
                    closure.params.len(),
                    args.len(),
                    "lambda",
                ));
            }
            let scope = closure
                .env
                .extend(closure.params.iter().cloned().zip(args.iter().cloned()));
            eval(&closure.body, &scope, output)
        }
        other => Err(Error::TypeError(format!("{other} is not a procedure"))),
    }
}

/// Evaluate forms in order and return the last value (Nil for none)
fn eval_sequence(forms: &[Value], env: &Environment, output: &Output) -> Result<Value, Error> {
    let mut result = Value::Nil;
    for form in forms {
        result = eval(form, env, output)?;
    }
    Ok(result)
}

fn make_closure(params: Vec<String>, body: Value, env: &Environment) -> Value {
    Value::Function(Rc::new(Closure {
        params,
        body,
        env: env.clone(),
    }))
}

fn param_names(form: &str, params: &[Value]) -> Result<Vec<String>, Error> {
    params
        .iter()
        .map(|param| match param {
            Value::Symbol(name) => Ok(name.clone()),
            other => Err(Error::TypeError(format!(
                "{form}: parameters must be symbols, got {other}"
            ))),
        })
        .collect()
}

/// Split `((name expr) ...)` into its pairs
fn binding_pairs<'a>(form: &str, bindings: &'a Value) -> Result<Vec<(&'a String, &'a Value)>, Error> {
    let malformed = || Error::TypeError(format!("{form}: malformed bindings {bindings}"));
    let Value::List(bindings_list) = bindings else {
        return Err(malformed());
    };
    bindings_list
        .iter()
        .map(|binding| match binding.as_list() {
            Some([Value::Symbol(name), expr]) => Ok((name, expr)),
            _ => Err(malformed()),
        })
        .collect()
}

pub fn eval_quote(args: &[Value], _env: &Environment, _output: &Output) -> Result<Value, Error> {
    Ok(args.first().cloned().unwrap_or(Value::Nil))
}

pub fn eval_if(args: &[Value], env: &Environment, output: &Output) -> Result<Value, Error> {
    match args {
        [test, consequent, alternative @ ..] => {
            if eval(test, env, output)?.is_truthy() {
                eval(consequent, env, output)
            } else {
                match alternative.first() {
                    Some(expr) => eval(expr, env, output),
                    None => Ok(Value::Nil),
                }
            }
        }
        _ => Err(Error::arity_error_with_expr(2, args.len(), "if")),
    }
}

pub fn eval_cond(args: &[Value], env: &Environment, output: &Output) -> Result<Value, Error> {
    for clause in args {
        let (test, body) = match clause {
            Value::List(parts) if parts.len() >= 2 => (&parts[0], &parts[1..]),
            other => {
                return Err(Error::TypeError(format!(
                    "cond: clause must be a list of a test and at least one expression, got {other}"
                )));
            }
        };
        let is_else = matches!(test, Value::Symbol(s) if s == "else");
        if is_else || eval(test, env, output)?.is_truthy() {
            return eval_sequence(body, env, output);
        }
    }
    Ok(Value::Nil)
}

pub fn eval_define(args: &[Value], env: &Environment, output: &Output) -> Result<Value, Error> {
    match args {
        [Value::Symbol(name), expr] => {
            let value = eval(expr, env, output)?;
            tracing::debug!(name = %name, "define");
            env.define(name.clone(), value);
            Ok(Value::Unspecified)
        }
        // (define (name params...) body...)
        [Value::List(signature), body @ ..] => {
            let Some((Value::Symbol(name), params)) = signature.split_first() else {
                return Err(Error::TypeError(format!(
                    "define: procedure name must be a symbol, got {}",
                    args[0]
                )));
            };
            let params = param_names("define", params)?;
            let body = match body {
                [single] => single.clone(),
                several => {
                    let mut forms = Vec::with_capacity(several.len() + 1);
                    forms.push(Value::Symbol("begin".to_string()));
                    forms.extend_from_slice(several);
                    Value::list(forms)
                }
            };
            tracing::debug!(name = %name, params = params.len(), "define procedure");
            env.define(name.clone(), make_closure(params, body, env));
            Ok(Value::Unspecified)
        }
        [Value::Symbol(_), ..] => Err(Error::arity_error_with_expr(2, args.len(), "define")),
        _ => Err(Error::TypeError(format!(
            "define: name must be a symbol, got {}",
            args.first().unwrap_or(&Value::Nil)
        ))),
    }
}

pub fn eval_set(args: &[Value], env: &Environment, output: &Output) -> Result<Value, Error> {
    match args {
        [Value::Symbol(name), expr] => {
            if !env.contains(name) {
                return Err(Error::UnboundVariable(name.clone()));
            }
            let value = eval(expr, env, output)?;
            env.set(name, value)?;
            Ok(Value::Unspecified)
        }
        [other, _] => Err(Error::TypeError(format!(
            "set!: name must be a symbol, got {other}"
        ))),
        _ => Err(Error::arity_error_with_expr(2, args.len(), "set!")),
    }
}

pub fn eval_lambda(args: &[Value], env: &Environment, _output: &Output) -> Result<Value, Error> {
    match args {
        [Value::List(params), body] => Ok(make_closure(
            param_names("lambda", params)?,
            body.clone(),
            env,
        )),
        [other, _] => Err(Error::TypeError(format!(
            "lambda: parameters must be a list, got {other}"
        ))),
        _ => Err(Error::arity_error_with_expr(2, args.len(), "lambda")),
    }
}

pub fn eval_let(args: &[Value], env: &Environment, output: &Output) -> Result<Value, Error> {
    match args {
        [bindings, body @ ..] => {
            let mut values = Vec::new();
            for (name, expr) in binding_pairs("let", bindings)? {
                values.push((name.clone(), eval(expr, env, output)?));
            }
            let scope = env.extend(values);
            eval_sequence(body, &scope, output)
        }
        [] => Err(Error::arity_error_with_expr(2, 0, "let")),
    }
}

pub fn eval_let_star(args: &[Value], env: &Environment, output: &Output) -> Result<Value, Error> {
    match args {
        [bindings, body @ ..] => {
            // One scope per binding; each value sees only the bindings before it
            let mut scope = env.extend([]);
            for (name, expr) in binding_pairs("let*", bindings)? {
                let value = eval(expr, &scope, output)?;
                scope = scope.extend([(name.clone(), value)]);
            }
            eval_sequence(body, &scope, output)
        }
        [] => Err(Error::arity_error_with_expr(2, 0, "let*")),
    }
}

pub fn eval_begin(args: &[Value], env: &Environment, output: &Output) -> Result<Value, Error> {
    eval_sequence(args, env, output)
}

/// Create a global environment with the built-in procedures and constants
pub fn create_global_env() -> Environment {
    let env = Environment::new();

    for op in get_builtin_ops() {
        env.define(op.scheme_id.to_string(), Value::BuiltinFunction(op));
    }
    let constants = [
        ("pi", consts::PI),
        ("e", consts::E),
        ("E", consts::E),
        ("PI", consts::PI),
        ("LN2", consts::LN_2),
        ("LN10", consts::LN_10),
        ("LOG2E", consts::LOG2_E),
        ("LOG10E", consts::LOG10_E),
        ("SQRT2", consts::SQRT_2),
        ("SQRT1_2", consts::FRAC_1_SQRT_2),
    ];
    for (name, value) in constants {
        env.define(name.to_string(), Value::Number(value));
    }
    env.define("null".to_string(), Value::Nil);

    env
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_program;

    fn silent() -> Output {
        Output::new(Rc::new(|_: &Value| {}))
    }

    fn eval_in(input: &str, env: &Environment) -> Result<Value, Error> {
        let output = silent();
        let mut result = Value::Unspecified;
        for expr in parse_program(input)? {
            result = eval(&expr, env, &output)?;
        }
        Ok(result)
    }

    fn eval_string(input: &str) -> Result<Value, Error> {
        eval_in(input, &create_global_env())
    }

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    fn nums(ns: &[f64]) -> Value {
        Value::list(ns.iter().map(|&n| num(n)).collect())
    }

    #[test]
    fn test_self_evaluating() {
        assert_eq!(eval_string("42").unwrap(), num(42.0));
        assert_eq!(eval_string("#t").unwrap(), Value::Bool(true));
        assert_eq!(
            eval_string("\"hello\"").unwrap(),
            Value::String("hello".to_string())
        );
        assert_eq!(
            eval_string("'single'").unwrap(),
            Value::String("single".to_string())
        );
        assert_eq!(eval_string("()").unwrap(), nums(&[]));
        assert_eq!(eval_string("null").unwrap(), Value::Nil);
    }

    #[test]
    fn test_string_literal_is_verbatim() {
        assert_eq!(
            eval_string(r#""a\nb""#).unwrap(),
            Value::String(r"a\nb".to_string())
        );
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval_string("(+ 1 2 3)").unwrap(), num(6.0));
        assert_eq!(eval_string("(- 5)").unwrap(), num(-5.0));
        assert_eq!(eval_string("(/ 2)").unwrap(), num(0.5));
        assert_eq!(eval_string("(* 2 (+ 1 2))").unwrap(), num(6.0));
        assert_eq!(eval_string("(sqrt 16)").unwrap(), num(4.0));
        assert_eq!(eval_string("pi").unwrap(), num(std::f64::consts::PI));
    }

    #[test]
    fn test_math_constants_and_builtins() {
        assert_eq!(eval_string("E").unwrap(), num(std::f64::consts::E));
        assert_eq!(eval_string("PI").unwrap(), eval_string("pi").unwrap());
        assert_eq!(eval_string("LN2").unwrap(), num(std::f64::consts::LN_2));
        assert_eq!(eval_string("SQRT1_2").unwrap(), num(std::f64::consts::FRAC_1_SQRT_2));
        assert_eq!(eval_string("(hypot 3 4)").unwrap(), num(5.0));
        assert_eq!(eval_string("(imul 6 7)").unwrap(), num(42.0));
        assert_eq!(eval_string("(clz32 1)").unwrap(), num(31.0));
        assert_eq!(eval_string("(round 0.49999999999999994)").unwrap(), num(0.0));
        assert!(matches!(
            eval_string("(random 1)"),
            Err(Error::ArityError { .. })
        ));
    }

    #[test]
    fn test_quote() {
        assert_eq!(
            eval_string("(quote foo)").unwrap(),
            Value::Symbol("foo".to_string())
        );
        assert_eq!(eval_string("(quote (1 2 3))").unwrap(), nums(&[1.0, 2.0, 3.0]));
        assert_eq!(eval_string("(quote)").unwrap(), Value::Nil);
    }

    #[test]
    fn test_if() {
        assert_eq!(eval_string("(if #t 1 2)").unwrap(), num(1.0));
        assert_eq!(eval_string("(if #f 1 2)").unwrap(), num(2.0));
        assert_eq!(eval_string("(if #t 1)").unwrap(), num(1.0));
        assert_eq!(eval_string("(if #f 1)").unwrap(), Value::Nil);
        assert_eq!(eval_string("(if 0 1 2)").unwrap(), num(2.0));
        assert_eq!(eval_string("(if () 1 2)").unwrap(), num(1.0));
        assert_eq!(eval_string("(if \"\" 1 2)").unwrap(), num(2.0));

        match eval_string("(if)") {
            Err(Error::ArityError { expression, .. }) => {
                assert_eq!(expression.as_deref(), Some("if"))
            }
            other => panic!("Expected ArityError, got {:?}", other),
        }
        assert!(matches!(
            eval_string("(if 1 2 3 4)"),
            Err(Error::ArityError { .. })
        ));
    }

    #[test]
    fn test_cond() {
        let program = "(define (classify n) (cond ((< n 0) 'neg') ((= n 0) 'zero') (else 'pos')))";
        let env = create_global_env();
        eval_in(program, &env).unwrap();
        assert_eq!(
            eval_in("(classify -3)", &env).unwrap(),
            Value::String("neg".to_string())
        );
        assert_eq!(
            eval_in("(classify 0)", &env).unwrap(),
            Value::String("zero".to_string())
        );
        assert_eq!(
            eval_in("(classify 9)", &env).unwrap(),
            Value::String("pos".to_string())
        );

        assert_eq!(eval_string("(cond (#f 1))").unwrap(), Value::Nil);
        assert_eq!(eval_string("(cond (#t 1 2 3))").unwrap(), num(3.0));
        assert!(matches!(eval_string("(cond (#t))"), Err(Error::TypeError(_))));
        assert!(matches!(eval_string("(cond 5)"), Err(Error::TypeError(_))));
    }

    #[test]
    fn test_define_and_set() {
        let env = create_global_env();
        assert_eq!(eval_in("(define x 10)", &env).unwrap(), Value::Unspecified);
        assert_eq!(eval_in("(set! x (+ x 5))", &env).unwrap(), Value::Unspecified);
        assert_eq!(eval_in("x", &env).unwrap(), num(15.0));

        assert_eq!(
            eval_in("(set! undefined-var 1)", &env),
            Err(Error::UnboundVariable("undefined-var".to_string()))
        );
        assert!(matches!(
            eval_in("(define y)", &env),
            Err(Error::ArityError { .. })
        ));
        assert!(matches!(
            eval_in("(define 5 1)", &env),
            Err(Error::TypeError(_))
        ));
    }

    #[test]
    fn test_define_procedure_form() {
        let env = create_global_env();
        eval_in("(define (square x) (* x x))", &env).unwrap();
        assert_eq!(eval_in("(square 7)", &env).unwrap(), num(49.0));

        // Several body forms run in order
        eval_in("(define counter 0)", &env).unwrap();
        eval_in("(define (bump) (set! counter 1) (+ counter 1))", &env).unwrap();
        assert_eq!(eval_in("(bump)", &env).unwrap(), num(2.0));
        // set! inside the procedure scope does not reach the global binding
        assert_eq!(eval_in("counter", &env).unwrap(), num(0.0));
    }

    #[test]
    fn test_lambda() {
        assert_eq!(
            eval_string("((lambda (x y) (+ x y)) 3 4)").unwrap(),
            num(7.0)
        );
        assert_eq!(eval_string("((lambda () 5))").unwrap(), num(5.0));

        match eval_string("((lambda (x y) (+ x y)) 3)") {
            Err(Error::ArityError { expected, got, .. }) => {
                assert_eq!(expected, 2);
                assert_eq!(got, 1);
            }
            other => panic!("Expected ArityError, got {:?}", other),
        }
        assert!(matches!(
            eval_string("(lambda x x)"),
            Err(Error::TypeError(_))
        ));
        assert!(matches!(
            eval_string("(lambda (1) 1)"),
            Err(Error::TypeError(_))
        ));
        assert!(matches!(
            eval_string("(lambda (x) x x)"),
            Err(Error::ArityError { .. })
        ));
    }

    #[test]
    fn test_closures_capture_scope() {
        let env = create_global_env();
        eval_in(
            "(define (make-adder n) (lambda (x) (+ x n))) (define add5 (make-adder 5))",
            &env,
        )
        .unwrap();
        assert_eq!(eval_in("(add5 10)", &env).unwrap(), num(15.0));
    }

    #[test]
    fn test_global_recursion() {
        let env = create_global_env();
        eval_in(
            "(define (fact n) (if (<= n 1) 1 (* n (fact (- n 1)))))",
            &env,
        )
        .unwrap();
        assert_eq!(eval_in("(fact 10)", &env).unwrap(), num(3628800.0));

        // Later global definitions are visible inside earlier closures
        eval_in("(define (uses-later) (later-fn 2))", &env).unwrap();
        eval_in("(define (later-fn x) (* x 21))", &env).unwrap();
        assert_eq!(eval_in("(uses-later)", &env).unwrap(), num(42.0));
    }

    #[test]
    fn test_let_and_let_star() {
        let env = create_global_env();
        assert_eq!(
            eval_in("(let ((a 1) (b 2)) (+ a b))", &env).unwrap(),
            num(3.0)
        );
        assert!(!env.contains("a"));
        assert!(!env.contains("b"));

        // let evaluates values in the outer scope
        eval_in("(define a 10)", &env).unwrap();
        assert_eq!(
            eval_in("(let ((a 1) (b a)) b)", &env).unwrap(),
            num(10.0)
        );
        assert_eq!(
            eval_in("(let* ((a 1) (b (+ a 1))) b)", &env).unwrap(),
            num(2.0)
        );
        assert_eq!(eval_in("(let () 5)", &env).unwrap(), num(5.0));

        assert!(matches!(
            eval_in("(let (a 1) a)", &env),
            Err(Error::TypeError(_))
        ));
        assert!(matches!(
            eval_in("(let* x 1)", &env),
            Err(Error::TypeError(_))
        ));
    }

    #[test]
    fn test_let_bound_procedures_cannot_recurse() {
        let countdown = "((f (lambda (n) (if (= n 0) 0 (f (- n 1)))))) (f 3)";
        assert_eq!(
            eval_string(&format!("(let {countdown})")),
            Err(Error::UnboundVariable("f".to_string()))
        );
        assert_eq!(
            eval_string(&format!("(let* {countdown})")),
            Err(Error::UnboundVariable("f".to_string()))
        );
    }

    #[test]
    fn test_let_star_chains_scopes() {
        // A closure in an earlier binding does not see later bindings
        assert_eq!(
            eval_string("(let* ((g (lambda () b)) (b 2)) (g))"),
            Err(Error::UnboundVariable("b".to_string()))
        );
        // but does see earlier ones
        assert_eq!(
            eval_string("(let* ((a 5) (g (lambda () a))) (g))").unwrap(),
            num(5.0)
        );
        // Shadowing within one let* picks the latest binding
        assert_eq!(
            eval_string("(let* ((x 1) (x (+ x 1))) x)").unwrap(),
            num(2.0)
        );

        // Definitions in the body stay local even with no bindings
        let env = create_global_env();
        eval_in("(let* () (define hidden 1))", &env).unwrap();
        assert!(!env.contains("hidden"));
    }

    #[test]
    fn test_begin() {
        assert_eq!(eval_string("(begin 1 2 3)").unwrap(), num(3.0));
        assert!(matches!(
            eval_string("(begin)"),
            Err(Error::ArityError { .. })
        ));
    }

    #[test]
    fn test_application_errors() {
        assert_eq!(
            eval_string("undefined-var"),
            Err(Error::UnboundVariable("undefined-var".to_string()))
        );
        assert!(matches!(eval_string("(1 2 3)"), Err(Error::TypeError(_))));

        match eval_string("(car 5)") {
            Err(Error::ApplicationError { procedure, source }) => {
                assert_eq!(procedure, "car");
                assert!(matches!(*source, Error::RuntimeError(_)));
            }
            other => panic!("Expected ApplicationError, got {:?}", other),
        }

        // Arity failures from builtins name the builtin and are not wrapped
        match eval_string("(car 1 2)") {
            Err(Error::ArityError { expression, .. }) => {
                assert_eq!(expression.as_deref(), Some("car"))
            }
            other => panic!("Expected ArityError, got {:?}", other),
        }

        // The innermost failing application is the one named
        let env = create_global_env();
        eval_in("(define (f x) (+ x \"a\"))", &env).unwrap();
        match eval_in("(f 1)", &env) {
            Err(Error::ApplicationError { procedure, .. }) => assert_eq!(procedure, "+"),
            other => panic!("Expected ApplicationError, got {:?}", other),
        }
    }

    #[test]
    fn test_higher_order_with_closures() {
        assert_eq!(
            eval_string("(map (lambda (x) (* x x)) (list 1 2 3))").unwrap(),
            nums(&[1.0, 4.0, 9.0])
        );
        assert_eq!(
            eval_string("(filter (lambda (x) (> x 1)) (list 1 2 3))").unwrap(),
            nums(&[2.0, 3.0])
        );
        assert_eq!(
            eval_string("(fold (lambda (acc x) (- acc x)) 10 (list 1 2))").unwrap(),
            num(7.0)
        );
        assert_eq!(
            eval_string("(apply (lambda (a b) (* a b)) (list 6 7))").unwrap(),
            num(42.0)
        );
    }

    #[test]
    fn test_display_uses_output() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let output = Output::new(Rc::new(move |v: &Value| sink.borrow_mut().push(v.clone())));
        let env = create_global_env();
        for expr in parse_program("(display \"hi\") (display (list 1 2))").unwrap() {
            assert_eq!(eval(&expr, &env, &output).unwrap(), Value::Unspecified);
        }
        assert_eq!(
            *seen.borrow(),
            vec![Value::String("hi".to_string()), nums(&[1.0, 2.0])]
        );
    }

    #[test]
    fn test_equality_builtins() {
        assert_eq!(
            eval_string("(equal? (list 1 2) (list 1 2))").unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            eval_string("(eq? (list 1 2) (list 1 2))").unwrap(),
            Value::Bool(false)
        );
        assert_eq!(eval_string("(eq? 2 2)").unwrap(), Value::Bool(true));
        assert_eq!(
            eval_string("(define l (list 1)) (eq? l l)").unwrap(),
            Value::Bool(true)
        );
        assert_eq!(eval_string("(eq? car car)").unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_special_form_names() {
        assert!(is_special_form("lambda"));
        assert!(is_special_form("let*"));
        assert!(!is_special_form("car"));
    }
}
