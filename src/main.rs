//! termsuggest command line tool
//!
//! Prints the query an autocomplete list would run for a term, or runs the
//! whole list against rows exported to a JSON file.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use termsuggest::{config, datasource::StaticDataSource, Autocomplete};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to settings.yml
    #[arg(short, long, env = "AUTOCOMPLETE_SETTINGS_PATH")]
    config: Option<PathBuf>,

    /// JSON array of rows ({"value", "label", ...}) returned for the query
    #[arg(long)]
    rows: Option<PathBuf>,

    /// Print the query plan instead of the suggestion list
    #[arg(long)]
    explain: bool,

    /// Search term
    term: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // The log level comes from the settings, so overrides that could not be
    // applied are reported once the subscriber is up
    let config::Loaded {
        settings,
        source,
        ignored_env,
    } = config::load(args.config.as_deref())?;

    // Log to stderr, stdout carries the JSON output
    let level = if settings.general.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("termsuggest v{}", termsuggest::VERSION);
    match &source {
        Some(path) => info!("Loaded settings from: {}", path.display()),
        None => info!("No settings file found, using defaults"),
    }
    for message in &ignored_env {
        warn!("{}", message);
    }

    let data_source = match &args.rows {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read rows from {}", path.display()))?;
            let source = StaticDataSource::from_json(&json)
                .with_context(|| format!("invalid rows in {}", path.display()))?;
            info!("Loaded rows from: {}", path.display());
            source
        }
        None => StaticDataSource::new(Vec::new()),
    };

    let autocomplete = Autocomplete::new(&settings.autocomplete, data_source)?;

    let output = if args.explain {
        match autocomplete.plan(&args.term) {
            Ok(plan) => serde_json::to_string_pretty(&plan)?,
            Err(e) => {
                let message = e.user_message(&settings.autocomplete.messages);
                serde_json::to_string_pretty(&serde_json::json!({
                    "error": message,
                    "detail": e.to_string(),
                }))?
            }
        }
    } else {
        serde_json::to_string_pretty(&autocomplete.create_list(&args.term))?
    };

    println!("{}", output);
    Ok(())
}
