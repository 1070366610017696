mod commands;
mod logging;
mod progress;
mod transport;

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use progress::CliReporter;
use squigrank_core::storage::HistoryStore;
use squigrank_core::{AppConfig, Engine};
use transport::HttpFetcher;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match squigrank_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    match args.command {
        Some(Commands::Sync) => {
            if let Err(err) = run_sync(&config) {
                error!("Error: {}", err);
            }
        }
        Some(Commands::Rank) => {
            if let Err(err) = run_rank(&config) {
                error!("Error: {}", err);
            }
        }
        Some(Commands::History { limit }) => {
            if let Err(err) = run_history(&config, limit) {
                error!("Error: {}", err);
            }
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
        }
        Some(Commands::ResetStore) => {
            match prompt_confirm(
                "Are you SURE you want to DELETE the persisted catalog and history?",
                Some(false),
            ) {
                Ok(true) => {
                    for path in [&config.catalog_path, &config.history_path] {
                        if Path::new(path).exists() {
                            if let Err(e) = fs::remove_file(path) {
                                error!("Error removing {}: {}", path, e);
                            } else {
                                println!("Removed {}", path);
                            }
                        }
                    }
                }
                _ => {
                    process::exit(0);
                }
            }
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }

    Ok(())
}

fn fetcher_for(config: &AppConfig) -> HttpFetcher {
    HttpFetcher::new(Duration::from_secs(config.fetch_timeout_secs))
}

fn run_sync(config: &AppConfig) -> anyhow::Result<()> {
    let engine = Engine::new(config.clone());
    let fetcher = fetcher_for(config);
    let reporter = CliReporter::new();
    let report = engine.sync(&fetcher, &reporter)?;

    println!();
    info!(
        "Fetch: {}, Ingest: {}",
        format!("{:.2}s", report.fetch_duration.as_secs_f64()).green(),
        format!("{:.2}s", report.ingest_duration.as_secs_f64()).green(),
    );
    info!(
        "{} sources checked, {} unreachable, {} new items",
        format!("{}", report.sources_checked).green(),
        format!("{}", report.sources_failed).red(),
        format!("{}", report.new_finds).cyan(),
    );

    Ok(())
}

fn run_rank(config: &AppConfig) -> anyhow::Result<()> {
    let engine = Engine::new(config.clone());
    let fetcher = fetcher_for(config);
    let reporter = CliReporter::new();
    let report = engine.rank(&fetcher, &reporter)?;

    println!();
    info!(
        "Fetch: {}, Score: {}",
        format!("{:.2}s", report.fetch_duration.as_secs_f64()).green(),
        format!("{:.2}s", report.score_duration.as_secs_f64()).green(),
    );
    info!(
        "{} items ranked, {} skipped",
        format!("{}", report.items_ranked).green(),
        format!("{}", report.items_skipped).red(),
    );
    for path in &report.outputs {
        info!("Rankings written to {}", path.display());
    }

    Ok(())
}

fn run_history(config: &AppConfig, limit: usize) -> anyhow::Result<()> {
    let history = HistoryStore::load(Path::new(&config.history_path))?;
    if history.is_empty() {
        println!("No history yet — run `squigrank sync` first.");
        return Ok(());
    }
    for find in history.entries().iter().take(limit) {
        println!(
            "{}  {}: {} ({})",
            find.date.dimmed(),
            find.reviewer.cyan(),
            find.item,
            find.link.dimmed(),
        );
    }
    Ok(())
}

fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        io::stdin().read_line(&mut input)?;

        match input.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}
