use clap::Parser;
use sdscheme::runner::{self, FileReport, SOURCE_EXTENSION};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const RULE: &str = "============================================================";
const PREVIEW_LEN: usize = 50;

/// Run .scheme files form by form and write a result log per file
#[derive(Parser, Debug)]
#[command(name = "scheme-runner", version, about)]
struct Args {
    /// Files to run, relative to --dir; every .scheme file in --dir when omitted
    files: Vec<String>,

    /// Directory holding the .scheme files
    #[arg(long, default_value = "demos")]
    dir: PathBuf,

    /// Directory the per-file logs are written to
    #[arg(long, default_value = "test-results")]
    results_dir: PathBuf,

    /// Do not write log files
    #[arg(long)]
    no_log: bool,
}

fn preview(input: &str) -> String {
    if input.chars().count() > PREVIEW_LEN {
        let head: String = input.chars().take(PREVIEW_LEN).collect();
        format!("{head}...")
    } else {
        input.to_string()
    }
}

fn print_report(report: &FileReport) {
    println!("\n{RULE}");
    println!("File: {}", report.file);
    println!("{RULE}");
    println!("Total expressions: {}", report.total);
    println!("Successful: {}", report.successful);
    println!("Failed: {}", report.failed);

    if report.success() {
        println!("\nStatus: PASSED");
        return;
    }

    println!("\nStatus: FAILED");
    println!("\nFailed expressions:");
    for (position, expr) in report.failures() {
        println!("  {position}. {}", preview(&expr.input));
        if let Some(error) = &expr.error {
            println!("     Error: {error}");
        }
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let files = if args.files.is_empty() {
        if !args.dir.is_dir() {
            eprintln!("Directory not found: {}", args.dir.display());
            return Ok(ExitCode::FAILURE);
        }
        runner::discover(&args.dir)?
    } else {
        let mut files = Vec::with_capacity(args.files.len());
        for name in &args.files {
            if !name.ends_with(&format!(".{SOURCE_EXTENSION}")) {
                eprintln!("Only .{SOURCE_EXTENSION} files can be run: {name}");
                return Ok(ExitCode::FAILURE);
            }
            let path = args.dir.join(name);
            if !path.is_file() {
                eprintln!("File not found: {}", path.display());
                return Ok(ExitCode::FAILURE);
            }
            files.push(path);
        }
        files
    };

    if files.is_empty() {
        eprintln!("No .{SOURCE_EXTENSION} files in {}", args.dir.display());
        return Ok(ExitCode::FAILURE);
    }

    println!("\nRunning {} file(s)...", files.len());

    let mut passed = 0;
    let mut failed = 0;
    for path in &files {
        let report = runner::run_file(path)?;
        print_report(&report);
        if !args.no_log {
            runner::write_log(&report, &args.results_dir)?;
        }
        if report.success() {
            passed += 1;
        } else {
            failed += 1;
        }
    }

    println!("\n{RULE}");
    println!("Summary");
    println!("{RULE}");
    println!("Total files: {}", files.len());
    println!("Passed: {passed}");
    println!("Failed: {failed}");
    if !args.no_log {
        println!("\nDetailed logs: {}", args.results_dir.display());
    }
    println!("{RULE}\n");

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
