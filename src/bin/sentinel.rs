//! Sentinel CLI - Command-line interface for Gaze Sentinel
//!
//! Commands:
//! - replay: Run a recorded session log through the pipeline
//! - validate: Validate a recorded session log
//! - schema: Print schema information

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use gaze_sentinel::export::ReportExporter;
use gaze_sentinel::session::{parse_session, SCHEMA_VERSION};
use gaze_sentinel::{PipelineConfig, PipelineError, SENTINEL_VERSION};

/// Sentinel - On-device gaze analysis engine for checkout confusion detection
#[derive(Parser)]
#[command(name = "sentinel")]
#[command(author = "Clarity Labs")]
#[command(version = SENTINEL_VERSION)]
#[command(about = "Replay and inspect recorded gaze sessions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded session and print events plus the final report
    Replay {
        /// Input session log path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Pipeline configuration JSON (defaults to production constants)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Wrap the report in the export envelope (producer + timestamp)
        #[arg(long)]
        export: bool,

        /// Output format
        #[arg(long, default_value = "auto")]
        output_format: OutputFormat,
    },

    /// Validate a recorded session log
    Validate {
        /// Input session log path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Pretty JSON on a terminal, compact otherwise
    Auto,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Debug, Error)]
enum SentinelCliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("sentinel: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), SentinelCliError> {
    match cli.command {
        Commands::Replay {
            input,
            config,
            export,
            output_format,
        } => cmd_replay(&input, config.as_deref(), export, output_format),
        Commands::Validate { input, json } => cmd_validate(&input, json),
        Commands::Schema => cmd_schema(),
    }
}

fn read_input(path: &PathBuf) -> Result<String, SentinelCliError> {
    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn pretty_output(format: &OutputFormat) -> bool {
    match format {
        OutputFormat::Auto => atty::is(atty::Stream::Stdout),
        OutputFormat::Json => false,
        OutputFormat::JsonPretty => true,
    }
}

fn cmd_replay(
    input: &PathBuf,
    config_path: Option<&std::path::Path>,
    export: bool,
    output_format: OutputFormat,
) -> Result<(), SentinelCliError> {
    let config = match config_path {
        Some(path) => serde_json::from_str::<PipelineConfig>(&fs::read_to_string(path)?)?,
        None => PipelineConfig::default(),
    };

    let session = parse_session(&read_input(input)?);
    let outcome = session?.replay(config)?;
    let pretty = pretty_output(&output_format);

    if export {
        let exporter = ReportExporter::new();
        let envelope = exporter.export_to_json(outcome.report, pretty)?;
        println!("{envelope}");
    } else if pretty {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", serde_json::to_string(&outcome)?);
    }

    Ok(())
}

fn cmd_validate(input: &PathBuf, json: bool) -> Result<(), SentinelCliError> {
    let result = parse_session(&read_input(input)?).and_then(|s| {
        s.validate()?;
        Ok(s)
    });

    match result {
        Ok(session) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "valid": true,
                        "session_id": session.session_id,
                        "zones": session.zones.len(),
                        "inputs": session.inputs.len(),
                    })
                );
            } else {
                println!(
                    "valid: {} zones, {} inputs",
                    session.zones.len(),
                    session.inputs.len()
                );
            }
            Ok(())
        }
        Err(e) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({"valid": false, "error": e.to_string()})
                );
                Ok(())
            } else {
                Err(e.into())
            }
        }
    }
}

fn cmd_schema() -> Result<(), SentinelCliError> {
    println!("session log schema version: {SCHEMA_VERSION}");
    println!();
    println!("{{");
    println!("  \"schema_version\": \"{SCHEMA_VERSION}\",");
    println!("  \"session_id\": \"...\",");
    println!("  \"zones\": [{{\"id\": \"...\", \"bounds\": {{\"left\", \"top\", \"right\", \"bottom\"}}, \"content\"?: {{...}}}}],");
    println!("  \"inputs\": [{{\"t\": seconds, \"input\": \"sample|dropout|intent_hover|intent_commit|dismiss_zone|dismiss_escalation|pause|resume\", ...}}]");
    println!("}}");
    Ok(())
}
