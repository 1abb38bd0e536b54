use clap::Parser;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use sdscheme::{Error, Interpreter, parser};
use tracing_subscriber::EnvFilter;

/// Interactive sdscheme interpreter
#[derive(Parser, Debug)]
#[command(name = "repl", version, about)]
struct Args {}

/// Input that only needs more lines to become a complete form
fn is_incomplete(err: &Error) -> bool {
    matches!(err, Error::SyntaxError(msg) if msg == "unexpected EOF")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let _args = Args::parse();

    println!("sdscheme {}", env!("CARGO_PKG_VERSION"));
    println!("Type expressions to evaluate them, :help for commands, or Ctrl+D to exit.");
    println!();

    let mut rl = DefaultEditor::new()?;
    let interpreter = Interpreter::new();
    let mut pending = String::new();

    loop {
        let prompt = if pending.is_empty() { "scheme> " } else { "   ...> " };
        match rl.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if pending.is_empty() {
                    if trimmed.is_empty() {
                        continue;
                    }
                    // Handle special commands
                    match trimmed {
                        ":help" => {
                            let _ = rl.add_history_entry(trimmed);
                            print_help();
                            continue;
                        }
                        ":env" => {
                            let _ = rl.add_history_entry(trimmed);
                            print_environment(&interpreter);
                            continue;
                        }
                        _ if trimmed.starts_with(":help ") => {
                            let _ = rl.add_history_entry(trimmed);
                            describe_names(&interpreter, &trimmed[":help ".len()..]);
                            continue;
                        }
                        ":quit" | ":exit" => {
                            println!("Goodbye!");
                            break;
                        }
                        _ => {}
                    }
                }

                if !pending.is_empty() {
                    pending.push('\n');
                }
                pending.push_str(&line);

                // Keep reading until the input parses as complete forms
                if let Err(e) = parser::parse_program(&pending) {
                    if is_incomplete(&e) {
                        continue;
                    }
                }
                match interpreter.evaluate(&pending) {
                    Ok(result) => println!("{}", result),
                    Err(e) => println!("Error: {}", e),
                }
                let _ = rl.add_history_entry(pending.trim());
                pending.clear();
            }
            Err(ReadlineError::Interrupted) => {
                if pending.is_empty() {
                    println!("Interrupted. Use Ctrl+D or :quit to exit.");
                } else {
                    pending.clear();
                }
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  :help    - Show this help message");
    println!("  :help NAME... - Describe what each name refers to");
    println!("  :env     - Show the names bound in the global environment");
    println!("  :quit    - Exit the interpreter");
    println!("  :exit    - Exit the interpreter");
    println!();
    println!("Language:");
    println!("  Numbers: 42, 2.5, -5, 1e3, 0xff");
    println!("  Booleans: #t, #f");
    println!("  Strings: \"hello world\", 'single quoted'");
    println!("  Special forms: quote, if, cond, define, set!, lambda, let, let*, begin");
    println!("  Lists: list, car, cdr, cons, append, reverse, length, null?, pair?");
    println!("  Higher-order: map, filter, fold, reduce, apply");
    println!("  Output: display");
    println!();
    println!("Examples:");
    println!("  (+ 1 2 3)");
    println!("  (define (square x) (* x x))");
    println!("  (map square (list 1 2 3))");
    println!("  (let ((a 1) (b 2)) (+ a b))");
}

fn describe_names(interpreter: &Interpreter, names: &str) {
    for name in names.split_whitespace() {
        match interpreter.describe(name) {
            Some(description) => println!("{description}"),
            None => println!("{name}: not defined"),
        }
    }
}

fn print_environment(interpreter: &Interpreter) {
    let names = interpreter.global_env().names();
    println!("{} bindings:", names.len());
    for name in names {
        match interpreter.describe(&name) {
            Some(description) => println!("  {description}"),
            None => println!("  {name}"),
        }
    }
}
