//! vialeve CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "vialeve",
    version,
    about = "Pré-triagem para tratamento farmacológico de controle de peso"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive screening wizard
    Screen {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Where to save the screening record at the end
        #[arg(long, default_value = "vialeve-triagem.json")]
        output: PathBuf,
    },

    /// Evaluate a saved screening record
    Evaluate {
        /// Path to a screening record JSON
        #[arg(long)]
        answers: PathBuf,

        /// Reference date for age calculation (YYYY-MM-DD, default: today)
        #[arg(long)]
        reference_date: Option<NaiveDate>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the record with the stored result back to this path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a saved record for identification problems
    Validate {
        /// Path to a screening record JSON
        #[arg(long)]
        answers: PathBuf,
    },

    /// Export the answers document (requires full consent)
    Export {
        /// Path to a screening record JSON
        #[arg(long)]
        answers: PathBuf,

        /// Output path for the answers document
        #[arg(long)]
        output: PathBuf,
    },

    /// Create a starter config and screening record template
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vialeve=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Screen { config, output } => commands::screen::execute(config, output),
        Commands::Evaluate {
            answers,
            reference_date,
            format,
            output,
            config,
        } => commands::evaluate::execute(answers, reference_date, format, output, config),
        Commands::Validate { answers } => commands::validate::execute(answers),
        Commands::Export { answers, output } => commands::export::execute(answers, output),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
