use nom::{
    IResult,
    branch::alt,
    bytes::complete::{is_not, tag, take_till1, take_while},
    character::complete::{anychar, char, one_of},
    combinator::recognize,
    multi::{many0, many1},
    sequence::{pair, tuple},
};

/// Characters that end a bare word
fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || c == '(' || c == ')' || c == '"' || c == '\''
}

/// Parse a quoted literal delimited by `quote`, keeping it verbatim.
/// A backslash escapes the next character, including the delimiter.
fn quoted_literal<'a>(quote: char) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    let body: &'static str = if quote == '"' { "\\\"" } else { "\\'" };
    move |input: &'a str| {
        recognize(tuple((
            char(quote),
            many0(alt((recognize(pair(char('\\'), anychar)), is_not(body)))),
            char(quote),
        )))(input)
    }
}

/// Parse a word: plain characters and quoted literals glued together.
/// A quote with no closing partner is an ordinary character.
fn word(input: &str) -> IResult<&str, &str> {
    recognize(many1(alt((
        quoted_literal('"'),
        quoted_literal('\''),
        take_till1(is_delimiter),
        recognize(one_of("\"'")),
    ))))(input)
}

fn token(input: &str) -> IResult<&str, &str> {
    alt((tag("("), tag(")"), word))(input)
}

fn whitespace(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_whitespace())(input)
}

/// Split source text into tokens.
///
/// Parentheses are always separate tokens, whitespace separates everything else,
/// and quoted literals are kept intact even when they contain whitespace or
/// parentheses.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut remaining = input;

    loop {
        remaining = match whitespace(remaining) {
            Ok((rest, _)) => rest,
            Err(_) => remaining,
        };
        if remaining.is_empty() {
            break;
        }
        match token(remaining) {
            Ok((rest, tok)) => {
                tokens.push(tok.to_string());
                remaining = rest;
            }
            Err(_) => {
                // Not reachable for non-empty input; keep whatever is left as one token
                tokens.push(remaining.to_string());
                break;
            }
        }
    }

    tokens
}
