//! Solana price CLI - Show the current Solana market snapshot
//!
//! Prints price, 24h change, market cap, volume and 24h range for Solana,
//! served from a five-minute cache when possible.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use solprice::cache::CacheManager;
use solprice::cli::{Cli, OutputFormat, StartupConfig};
use solprice::data::CoinGeckoClient;
use solprice::logging::init_logging;
use solprice::price::PriceService;

/// Builds the price service described by the startup configuration
fn build_service(config: &StartupConfig) -> PriceService {
    let client = CoinGeckoClient::with_base_url(config.base_url.clone());

    match &config.cache_dir {
        Some(dir) => {
            tracing::debug!(cache_dir = %dir.display(), "using disk cache");
            PriceService::with_cache(client, Arc::new(CacheManager::with_dir(dir.clone())))
        }
        None => PriceService::new(client),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    let service = build_service(&config);

    if let Some(tag) = &config.invalidate_tag {
        return match service.invalidate(tag) {
            Ok(removed) => {
                let noun = if removed == 1 { "entry" } else { "entries" };
                println!("Removed {} cached {} tagged '{}'", removed, noun, tag);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let snapshot = service.get_snapshot().await;

    match config.output {
        OutputFormat::Text => println!("{}", snapshot),
        OutputFormat::Json => match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}
