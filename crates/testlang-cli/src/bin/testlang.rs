//! TestLang CLI - compiles `.test` scenario files into test source
//!
//! Usage:
//!   testlang <file>                          # Write generated_tests.rs
//!   testlang <file> out/LoginTests.java -t junit  # JUnit class LoginTests
//!   testlang <file> --check                  # Compile without writing
//!   testlang <file> --error-format json      # Machine-readable errors

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use serde_json::json;
use testlang_core::codegen::junit::is_class_name;
use testlang_core::{compile_with_options, CompileError, GeneratorOptions, Target};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "testlang")]
#[command(version)]
#[command(about = "TestLang - HTTP API test scenario compiler")]
#[command(long_about = "Compile TestLang scenarios into executable HTTP test source")]
struct Cli {
    /// Input .test file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (default: generated_tests.rs or GeneratedTests.java)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Language of the generated tests
    #[arg(short, long, value_enum, default_value_t = TargetArg::Rust)]
    target: TargetArg,

    /// Compile without writing any output
    #[arg(long)]
    check: bool,

    /// How errors are printed to stderr
    #[arg(long, value_enum, default_value_t = ErrorFormat::Human, value_name = "FORMAT")]
    error_format: ErrorFormat,

    /// Debug-level pipeline logging (overrides TESTLANG_LOG)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TargetArg {
    Rust,
    Junit,
}

impl From<TargetArg> for Target {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Rust => Target::Rust,
            TargetArg::Junit => Target::JUnit,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ErrorFormat {
    Human,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let source = match std::fs::read_to_string(&cli.input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", cli.input.display(), e);
            process::exit(1);
        }
    };

    let target = Target::from(cli.target);
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(target.default_output_file()));
    let options = generator_options(target, &output);

    let generated = match compile_with_options(&source, &options) {
        Ok(text) => text,
        Err(e) => {
            report(&cli.input, &e, cli.error_format);
            process::exit(e.exit_code());
        }
    };

    if cli.check {
        println!("✓ '{}' compiled successfully", cli.input.display());
        return;
    }

    if let Err(e) = std::fs::write(&output, generated) {
        eprintln!("Error writing file '{}': {}", output.display(), e);
        process::exit(1);
    }
    tracing::info!(output = %output.display(), target = %target, "wrote test source");
    println!("✓ Generated {}", output.display());
}

/// Logs go to stderr, filtered by `TESTLANG_LOG` (default `warn`).
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("TESTLANG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// For JUnit the class is named after the output file when the stem is a
/// valid Java class name, `GeneratedTests` otherwise.
fn generator_options(target: Target, output: &Path) -> GeneratorOptions {
    let options = GeneratorOptions::for_target(target);
    if target != Target::JUnit {
        return options;
    }
    match output.file_stem().and_then(|s| s.to_str()) {
        Some(stem) if is_class_name(stem) => options.with_class_name(stem),
        stem => {
            tracing::warn!(?stem, "output file name is not a Java class name, using default");
            options
        }
    }
}

fn report(input: &Path, err: &CompileError, format: ErrorFormat) {
    match format {
        ErrorFormat::Human => {
            eprintln!("{}: {}", input.display(), err);
            let blocks = err.test_blocks();
            if !blocks.is_empty() {
                eprintln!("  in test block(s): {}", blocks.join(", "));
            }
        }
        ErrorFormat::Json => {
            eprintln!("{}", error_json(input, err));
        }
    }
}

fn error_json(input: &Path, err: &CompileError) -> serde_json::Value {
    let mut value = json!({
        "file": input.display().to_string(),
        "kind": err.kind(),
        "exit_code": err.exit_code(),
        "message": err.to_string(),
    });
    if let Some(pos) = err.position() {
        value["line"] = json!(pos.line);
        value["column"] = json!(pos.column);
    }
    match err {
        CompileError::Syntax {
            expected, found, ..
        } => {
            value["expected"] = json!(expected);
            value["found"] = json!(found);
        }
        CompileError::Lexical { found, .. } => {
            value["found"] = json!(found.to_string());
        }
        CompileError::Semantic { diagnostics } => {
            value["test_blocks"] = json!(err.test_blocks());
            value["diagnostics"] = diagnostics
                .iter()
                .map(|d| {
                    json!({
                        "message": d.message,
                        "test": d.test_block(),
                        "line": d.position.map(|p| p.line),
                        "column": d.position.map(|p| p.column),
                    })
                })
                .collect();
        }
        _ => {}
    }
    value
}
