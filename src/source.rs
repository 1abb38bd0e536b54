//! Splitting program text into top-level forms.
//!
//! The batch runner evaluates a file one form at a time so that a failing form
//! does not hide the results of the ones after it. [`split_forms`] finds the form
//! boundaries without parsing: it tracks parenthesis depth and quoted literals.
//!
//! `;;` starts a comment that runs to the end of the line. Comments are removed
//! before scanning, so a `;;` inside a string literal also ends the line.

/// Remove comments and blank lines, then join what is left with single spaces
fn strip_comments(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(";;"))
        .map(|line| match line.find(";;") {
            Some(index) => line[..index].trim(),
            None => line,
        })
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

fn push_form(forms: &mut Vec<String>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        forms.push(text.to_string());
    }
}

/// Split `text` into complete top-level forms, in source order.
///
/// A form is either a balanced parenthesised expression or a bare token at the
/// top level. An unbalanced trailing form is dropped.
pub fn split_forms(text: &str) -> Vec<String> {
    let cleaned = strip_comments(text);
    let mut forms = Vec::new();
    let mut current = String::new();
    let mut depth: isize = 0;
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;

    for c in cleaned.chars() {
        current.push(c);

        if (c == '"' || c == '\'') && prev != Some('\\') {
            match quote {
                None => quote = Some(c),
                Some(open) if open == c => quote = None,
                Some(_) => {}
            }
        } else if quote.is_none() {
            match c {
                '(' => {
                    if depth == 0 {
                        // A bare token glued to the next form is a form of its own
                        let before = current[..current.len() - 1].trim().to_string();
                        if !before.is_empty() {
                            forms.push(before);
                            current = "(".to_string();
                        }
                    }
                    depth += 1;
                }
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        push_form(&mut forms, &current);
                        current.clear();
                    }
                }
                c if depth == 0 && c.is_whitespace() => {
                    push_form(&mut forms, &current);
                    current.clear();
                }
                _ => {}
            }
        }

        prev = Some(c);
    }

    if depth == 0 {
        push_form(&mut forms, &current);
    }

    forms
}
