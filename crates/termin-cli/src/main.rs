//! `terminfinder` binary.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use termin_cli::commands::{self, CliError};
use termin_cli::config;

const DEFAULT_CONFIG_PATH: &str = "terminfinder.toml";

#[derive(Parser)]
#[command(name = "terminfinder", version, about = "TerminFinder voice and profile tools")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, env = "TERMIN_CONFIG_PATH")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a voice command
    Intent {
        /// Transcript to classify
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Carry out a voice command on a page fixture
    Locate {
        /// JSON array of page elements
        #[arg(long)]
        page: Option<PathBuf>,
        /// Path of the page the command is spoken on
        #[arg(long)]
        current_page: Option<String>,
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Score practice profile completeness
    Score {
        /// extended or contact
        #[arg(long, default_value = "extended")]
        scheme: String,
        /// Profile JSON; fetched from the backend when omitted
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Send a recorded question through transcription, chat and synthesis
    Ask {
        /// Recorded audio (webm, ogg, wav)
        audio: PathBuf,
        /// Where to write the spoken reply
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value).map_err(|source| CliError::Json {
        path: "<stdout>".to_string(),
        source,
    })?;
    println!("{}", text);
    Ok(())
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let config = config::load_config(Some(config_path))?;
    termin_cli::init_tracing(&config.logging);
    tracing::debug!(path = config_path, "resolved configuration path");

    match cli.command {
        Command::Intent { text } => print_json(&commands::intent(&text.join(" "))?),
        Command::Locate {
            page,
            current_page,
            text,
        } => {
            let outcome =
                commands::locate(&config, &text.join(" "), page.as_deref(), current_page).await?;
            print_json(&outcome)
        }
        Command::Score { scheme, file } => {
            let report = commands::score(&config, &scheme, file.as_deref()).await?;
            tracing::info!(badge = %report.badge_text(), "profile completeness");
            print_json(&report)
        }
        Command::Ask { audio, output } => {
            let turn = commands::ask(&config, audio, output).await?;
            print_json(&turn)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
