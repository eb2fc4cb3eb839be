//! bpmn-eval CLI - validation, canonicalization, metrics and dataset extraction.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod input;
mod output;

use bpmn_eval_dataset::DiagramType;
use commands::{canonicalize, extract, metrics, validate};

#[derive(Parser)]
#[command(name = "bpmn-eval")]
#[command(about = "Validate, canonicalize and score generated BPMN 2.0 XML")]
struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a BPMN document
    Validate {
        /// XML file, literal XML, or `-` for stdin (default: stdin)
        input: Option<String>,
        /// XSD schema file
        #[arg(long, env = "BPMN_EVAL_XSD")]
        xsd: Option<PathBuf>,
        /// Print the canonical form of valid documents
        #[arg(long)]
        canonicalize: bool,
        /// Output the verdict as JSON
        #[arg(long)]
        json: bool,
        /// Exit with error code if the document is invalid
        #[arg(long)]
        strict: bool,
    },
    /// Print the canonical form of a document
    Canonicalize {
        /// XML file, literal XML, or `-` for stdin (default: stdin)
        input: Option<String>,
    },
    /// Compute quality metrics for predictions against ground truths
    Metrics {
        /// JSONL file with predictions (`output` field)
        #[arg(long)]
        predictions: PathBuf,
        /// JSONL file with ground truths (`output` field)
        #[arg(long)]
        ground_truths: PathBuf,
        /// XSD schema file
        #[arg(long, env = "BPMN_EVAL_XSD")]
        xsd: Option<PathBuf>,
        /// Write the metrics report as JSON to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Build a redacted training set from a raw record export
    Extract {
        /// JSONL export of generation records
        #[arg(long)]
        input: PathBuf,
        /// Output JSONL file
        #[arg(long, default_value = "data/processed/production_logs.jsonl")]
        output: PathBuf,
        /// Maximum records to extract
        #[arg(long)]
        limit: Option<usize>,
        /// Diagram type (bpmn or pid)
        #[arg(long, default_value_t = DiagramType::Bpmn)]
        diagram_type: DiagramType,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Validate {
            input,
            xsd,
            canonicalize,
            json,
            strict,
        } => validate::run(input, xsd, canonicalize, json, strict),
        Commands::Canonicalize { input } => canonicalize::run(input),
        Commands::Metrics {
            predictions,
            ground_truths,
            xsd,
            output,
        } => metrics::run(predictions, ground_truths, xsd, output),
        Commands::Extract {
            input,
            output,
            limit,
            diagram_type,
        } => extract::run(input, output, limit, diagram_type),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
