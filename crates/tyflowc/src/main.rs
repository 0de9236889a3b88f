mod config;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use tyflow_typeck::diagnostics::{render_syntax_error, DiagnosticOptions};
use tyflow_typeck::{AnnotatedAst, InferError, InferOptions};

use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "tyflowc",
    version,
    about = "Confidence-weighted type inference for JavaScript"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the inferred type of every binding
    Infer(RunArgs),
    /// Print the source with `/*: T */` annotations
    Annotate(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// JavaScript source file
    file: PathBuf,

    /// Output results and diagnostics as JSON
    #[arg(long)]
    json: bool,

    /// Minimum confidence for a type to be reported
    #[arg(long)]
    threshold: Option<f32>,

    /// Propagation pass ceiling
    #[arg(long = "max-passes")]
    max_passes: Option<usize>,

    /// Config file (defaults to tyflow.toml next to the input)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable colorized output
    #[arg(long = "no-color")]
    no_color: bool,
}

#[derive(Clone, Copy)]
enum Mode {
    Summary,
    Annotate,
}

/// Why a run produced no output.
enum Failure {
    /// Already rendered syntax errors.
    Syntax(Vec<String>),
    Other(String),
}

fn main() {
    let cli = Cli::parse();
    let (args, mode) = match cli.command {
        Commands::Infer(args) => (args, Mode::Summary),
        Commands::Annotate(args) => (args, Mode::Annotate),
    };
    let diag_opts = DiagnosticOptions {
        color: !args.no_color && !args.json,
        json: args.json,
    };

    match run(&args, mode, &diag_opts) {
        Ok(output) => print!("{}", output),
        Err(Failure::Syntax(rendered)) => {
            for diagnostic in rendered {
                if diag_opts.json {
                    eprintln!("{}", diagnostic);
                } else {
                    eprint!("{}", diagnostic);
                }
            }
            process::exit(1);
        }
        Err(Failure::Other(message)) => {
            if diag_opts.json {
                let msg = serde_json::json!({
                    "code": "C0001",
                    "severity": "error",
                    "message": message,
                    "file": args.file.display().to_string(),
                    "spans": [],
                });
                eprintln!("{}", msg);
            } else {
                eprintln!("error: {}", message);
            }
            process::exit(1);
        }
    }
}

/// Effective options: config file first, then command-line overrides.
fn options(args: &RunArgs) -> Result<InferOptions, String> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::discover(&args.file)?,
    };
    let mut options = config.options();
    if let Some(threshold) = args.threshold {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(format!("--threshold must be between 0 and 1, got {}", threshold));
        }
        options.confidence_threshold = threshold;
    }
    if let Some(max_passes) = args.max_passes {
        options.max_passes = max_passes;
    }
    Ok(options)
}

fn run(args: &RunArgs, mode: Mode, diag_opts: &DiagnosticOptions) -> Result<String, Failure> {
    let options = options(args).map_err(Failure::Other)?;
    let source = std::fs::read_to_string(&args.file)
        .map_err(|e| Failure::Other(format!("Failed to read '{}': {}", args.file.display(), e)))?;

    let parse = tyflow_parser::parse(&source);
    let ast = match tyflow_typeck::infer(parse, &options) {
        Ok(ast) => ast,
        Err(InferError::Syntax(errors)) => {
            let file_name = args.file.display().to_string();
            let rendered = errors
                .iter()
                .map(|error| render_syntax_error(error, &source, &file_name, diag_opts))
                .collect();
            return Err(Failure::Syntax(rendered));
        }
    };

    Ok(render(&ast, &args.file, mode, args.json))
}

fn render(ast: &AnnotatedAst, file: &Path, mode: Mode, json: bool) -> String {
    match (mode, json) {
        (Mode::Summary, false) => ast.render_summary(),
        (Mode::Annotate, false) => ast.annotate(),
        (Mode::Summary, true) => {
            let mut value = ast.to_json();
            value["file"] = serde_json::Value::from(file.display().to_string());
            format!("{}\n", value)
        }
        (Mode::Annotate, true) => {
            let value = serde_json::json!({
                "file": file.display().to_string(),
                "annotated": ast.annotate(),
                "stats": ast.stats(),
            });
            format!("{}\n", value)
        }
    }
}
