use std::collections::VecDeque;

use crate::Error;
use crate::ast::Value;
use crate::lexer::tokenize;

/// True when no tokens are left to read
pub fn is_exhausted(tokens: &VecDeque<String>) -> bool {
    tokens.is_empty()
}

/// Read one expression from the front of `tokens`, consuming what it uses
pub fn parse(tokens: &mut VecDeque<String>) -> Result<Value, Error> {
    let token = tokens
        .pop_front()
        .ok_or_else(|| Error::SyntaxError("unexpected EOF".to_string()))?;

    match token.as_str() {
        "(" => {
            let mut list = Vec::new();
            loop {
                match tokens.front().map(String::as_str) {
                    None => return Err(Error::SyntaxError("unexpected EOF".to_string())),
                    Some(")") => {
                        tokens.pop_front();
                        return Ok(Value::list(list));
                    }
                    Some(_) => list.push(parse(tokens)?),
                }
            }
        }
        ")" => Err(Error::SyntaxError("unexpected close paren".to_string())),
        _ => Ok(atom(&token)),
    }
}

/// Tokenize `input` and read every top-level form in it
pub fn parse_program(input: &str) -> Result<Vec<Value>, Error> {
    let mut tokens: VecDeque<String> = tokenize(input).into_iter().collect();
    let mut forms = Vec::new();
    while !is_exhausted(&tokens) {
        forms.push(parse(&mut tokens)?);
    }
    Ok(forms)
}

/// Convert a non-parenthesis token into a value.
///
/// Booleans and numbers are recognised here. Everything else, quoted string
/// literals included, stays a symbol holding the raw token.
pub fn atom(token: &str) -> Value {
    match token {
        "#t" | "#true" => Value::Bool(true),
        "#f" | "#false" => Value::Bool(false),
        _ => match parse_number(token) {
            Some(n) => Value::Number(n),
            None => Value::Symbol(token.to_string()),
        },
    }
}

/// Numeric conversion following the rules of JavaScript's `Number()`
fn parse_number(token: &str) -> Option<f64> {
    match token {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let radix = match token.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &token[2..];
        // from_str_radix accepts a leading sign; Number() does not
        if digits.starts_with(['+', '-']) {
            return None;
        }
        return u64::from_str_radix(digits, radix)
            .ok()
            .map(|n| n as f64);
    }

    // Rust also accepts "inf", "infinity" and "nan" spelled in any case
    if token
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return None;
    }

    token.parse::<f64>().ok().filter(|n| !n.is_nan())
}
