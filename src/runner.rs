//! Batch evaluation of `.scheme` files.
//!
//! Each file is split into top-level forms which are evaluated one by one with a
//! fresh [`Interpreter`], so definitions never carry over from one file to the next.
//! A failing form is recorded and evaluation continues with the next one, so a
//! report always covers every form in the file.
//!
//! A log entry lists the form, then `=> value` when it produced one, then one
//! `[display]` line per displayed value. Failed forms get an `Error:` line instead
//! and no `[display]` lines, even if they displayed something before failing.

use crate::source::split_forms;
use crate::{Interpreter, Value};
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Extension of the files picked up by [`discover`]
pub const SOURCE_EXTENSION: &str = "scheme";

const RULE: &str = "============================================================";

/// Outcome of one top-level form
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionResult {
    pub input: String,
    /// Value of the form; `None` for forms evaluated for effect and for failures
    pub output: Option<Value>,
    pub error: Option<String>,
    /// Values passed to `display` while the form ran, formatted with [`format_value`];
    /// empty for failures
    pub display_output: Vec<String>,
}

/// Outcome of one file
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub file: String,
    pub expressions: Vec<ExpressionResult>,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

impl FileReport {
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    /// Results of the forms that failed, with their 1-based position
    pub fn failures(&self) -> impl Iterator<Item = (usize, &ExpressionResult)> {
        self.expressions
            .iter()
            .enumerate()
            .filter(|(_, expr)| expr.error.is_some())
            .map(|(index, expr)| (index + 1, expr))
    }
}

/// Render a value for reports: Nil as `null`, strings quoted, procedures opaque
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Nil | Value::Unspecified => "null".to_string(),
        Value::String(s) => format!("\"{s}\""),
        Value::List(elements) => format!(
            "({})",
            elements
                .iter()
                .map(format_value)
                .collect::<Vec<_>>()
                .join(" ")
        ),
        Value::BuiltinFunction(_) | Value::Function(_) => "#<procedure>".to_string(),
        other => other.to_string(),
    }
}

/// Evaluate every top-level form of `text`, reporting under `name`
pub fn run_source(name: &str, text: &str) -> FileReport {
    let captured = Rc::new(RefCell::new(Vec::new()));
    let sink = captured.clone();
    let interpreter =
        Interpreter::with_display_output(move |value| sink.borrow_mut().push(format_value(value)));

    let forms = split_forms(text);
    tracing::info!(file = name, forms = forms.len(), "running file");

    let mut expressions = Vec::with_capacity(forms.len());
    let mut successful = 0;
    let mut failed = 0;

    for input in forms {
        captured.borrow_mut().clear();
        let outcome = interpreter.evaluate(&input);
        let display_output = captured.take();

        let result = match outcome {
            Ok(value) => {
                successful += 1;
                ExpressionResult {
                    input,
                    output: (value != Value::Unspecified).then_some(value),
                    error: None,
                    display_output,
                }
            }
            Err(err) => {
                failed += 1;
                tracing::warn!(file = name, form = %input, error = %err, "form failed");
                ExpressionResult {
                    input,
                    output: None,
                    error: Some(err.to_string()),
                    display_output: Vec::new(),
                }
            }
        };
        expressions.push(result);
    }

    FileReport {
        file: name.to_string(),
        total: expressions.len(),
        expressions,
        successful,
        failed,
    }
}

/// Read and run one file; the report is named after the file name
pub fn run_file(path: &Path) -> io::Result<FileReport> {
    let text = fs::read_to_string(path)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(run_source(&name, &text))
}

/// Per-file log text
pub fn render_log(report: &FileReport) -> String {
    let mut log = String::new();
    log.push_str(&format!("{RULE}\nResults: {}\n{RULE}\n", report.file));
    log.push_str(&format!("Total expressions: {}\n", report.total));
    log.push_str(&format!("Successful: {}\n", report.successful));
    log.push_str(&format!("Failed: {}\n", report.failed));
    let status = if report.success() { "PASSED" } else { "FAILED" };
    log.push_str(&format!("Status: {status}\n{RULE}\n\n"));

    for (index, expr) in report.expressions.iter().enumerate() {
        log.push_str(&format!("[{}/{}] {}\n", index + 1, report.total, expr.input));
        if let Some(value) = &expr.output {
            log.push_str(&format!("=> {}\n", format_value(value)));
        }
        for line in &expr.display_output {
            log.push_str(&format!("[display] {line}\n"));
        }
        if let Some(error) = &expr.error {
            log.push_str(&format!("Error: {error}\n"));
        }
        log.push('\n');
    }

    log
}

/// Write the report to `<results_dir>/<file>.log`, creating the directory if needed
pub fn write_log(report: &FileReport, results_dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(results_dir)?;
    let path = results_dir.join(format!("{}.log", report.file));
    fs::write(&path, render_log(report))?;
    tracing::debug!(path = %path.display(), "wrote log");
    Ok(path)
}

/// `.scheme` files directly inside `dir`, sorted by name
pub fn discover(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
