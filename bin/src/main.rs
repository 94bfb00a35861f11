//! voxqueue CLI - Batch text-to-speech generation queue.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod display;
mod generator;

use config::CliConfig;
use display::Format;
use voxqueue_lib::InputFormat;

#[derive(Parser)]
#[command(name = "voxqueue")]
#[command(about = "Batch text-to-speech generation queue", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file. Defaults to <config dir>/voxqueue/config.toml
    #[arg(long, global = true, env = "VOXQUEUE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest an input file and show the resulting queue
    Inspect {
        /// Input file (.txt, .csv or .json)
        input: PathBuf,

        /// Input format. Inferred from the extension when omitted
        #[arg(long, value_enum)]
        input_format: Option<InputKind>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: Format,

        /// Default voice for records without one
        #[arg(long)]
        voice: Option<String>,

        /// Default engine for records without one
        #[arg(long)]
        engine: Option<String>,
    },

    /// Ingest an input file and generate audio for every item
    Run {
        /// Input file (.txt, .csv or .json)
        input: PathBuf,

        /// Input format. Inferred from the extension when omitted
        #[arg(long, value_enum)]
        input_format: Option<InputKind>,

        /// Generator program, run once per item
        #[arg(short, long)]
        program: Option<PathBuf>,

        /// Extra argument passed to the generator program (repeatable)
        #[arg(long = "arg", allow_hyphen_values = true)]
        args: Vec<String>,

        /// Directory for generated audio
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Write completed audio into this ZIP archive when the run ends
        #[arg(short, long)]
        archive: Option<PathBuf>,

        /// Per-item generation timeout in seconds
        #[arg(long)]
        timeout: Option<f64>,

        /// Default voice for records without one
        #[arg(long)]
        voice: Option<String>,

        /// Default engine for records without one
        #[arg(long)]
        engine: Option<String>,

        /// Audio file extension produced by the generator
        #[arg(long)]
        extension: Option<String>,
    },
}

/// Input formats accepted on the command line.
#[derive(Clone, Copy, clap::ValueEnum)]
enum InputKind {
    Text,
    Csv,
    Json,
}

impl From<InputKind> for InputFormat {
    fn from(kind: InputKind) -> Self {
        match kind {
            InputKind::Text => Self::Text,
            InputKind::Csv => Self::Csv,
            InputKind::Json => Self::Json,
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let mut config = CliConfig::load(cli.config.as_deref())?;

    match command {
        Commands::Inspect {
            input,
            input_format,
            format,
            voice,
            engine,
        } => {
            config.apply_ingest_overrides(voice, engine);
            commands::inspect::inspect(&input, input_format.map(Into::into), format, &config)
        }
        Commands::Run {
            input,
            input_format,
            program,
            args,
            output_dir,
            archive,
            timeout,
            voice,
            engine,
            extension,
        } => {
            config.apply_ingest_overrides(voice, engine);
            config.apply_generator_overrides(program, args, output_dir, extension);
            if let Some(secs) = timeout {
                config.queue.generation_timeout_secs = Some(secs);
            }
            commands::run::run(
                &input,
                input_format.map(Into::into),
                archive.as_deref(),
                &config,
                cli.quiet,
            )
            .await
        }
    }
}
