//! modsource CLI
//!
//! Aggregates release metadata for configured mods and texture packs into a
//! single published catalog document.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use modsource_catalog::{load_config, write_if_changed};
use modsource_fetch::{GithubClient, SyncOptions, build_catalog, lint};

mod error;

use error::CliError;

#[derive(Parser)]
#[command(name = "modsource")]
#[command(about = "Aggregate mod release metadata into a published catalog", long_about = None)]
struct Cli {
    /// Path to the mod-source configuration file
    #[arg(short, long, global = true, default_value = "mod-sources.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch releases and publish the catalog (the default when no command is given)
    Sync {
        /// Output path for the catalog document
        #[arg(short, long, default_value = "mods.json")]
        output: PathBuf,

        /// Supported-game fallback for entries whose releases declare none
        #[arg(long, default_value = "jak1")]
        default_game: String,
    },

    /// Validate the configuration without any network access
    Lint,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Sync {
        output: PathBuf::from("mods.json"),
        default_game: "jak1".to_string(),
    });

    let result = match command {
        Commands::Sync {
            output,
            default_game,
        } => run_sync(&cli.config, &output, default_game),
        Commands::Lint => run_lint(&cli.config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!(
                "{} {e}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red())
            );
            ExitCode::FAILURE
        }
    }
}

/// Run the full sync: fetch releases, assemble the catalog, write on change.
fn run_sync(config_path: &Path, output: &Path, default_game: String) -> Result<(), CliError> {
    let config = load_config(config_path)?;

    let token = std::env::var("GITHUB_TOKEN").ok();
    if token.is_none() {
        log::warn!("GITHUB_TOKEN is not set; using the anonymous rate limit");
    }
    let client = GithubClient::new(token)?;
    let options = SyncOptions { default_game };

    let rt = tokio::runtime::Runtime::new().map_err(|e| CliError::Runtime(e.to_string()))?;
    let catalog = rt.block_on(build_catalog(&client, &config, &options))?;

    if write_if_changed(output, &catalog)? {
        log::info!(
            "{} Catalog written to {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            output.display()
        );
    } else {
        log::info!("Catalog unchanged; {} not rewritten", output.display());
    }
    Ok(())
}

/// Validate the configuration only: field presence and ignore-rule syntax.
fn run_lint(config_path: &Path) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    lint(&config)?;
    log::info!(
        "{} Configuration OK ({} mods, {} texture packs)",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        config.mods.len(),
        config.texture_packs.len()
    );
    Ok(())
}
