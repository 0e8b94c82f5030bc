//! Command-line interface parsing for the Solana price CLI
//!
//! This module handles parsing of CLI arguments using clap and resolves them,
//! together with their environment fallbacks, into a `StartupConfig`.

use std::path::PathBuf;

use clap::Parser;
use reqwest::Url;
use thiserror::Error;

use crate::cache::CacheManager;
use crate::data::coingecko::COINGECKO_BASE_URL;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The API base URL is not an http(s) URL
    #[error("Invalid base URL: '{0}'. Expected an http:// or https:// URL")]
    InvalidBaseUrl(String),

    /// No cache directory was given and none could be determined
    #[error("Could not determine a cache directory; pass --cache-dir or use --no-cache")]
    CacheDirUnavailable,
}

/// Solana price CLI - Show the current Solana market snapshot
#[derive(Parser, Debug)]
#[command(name = "solprice")]
#[command(about = "Current Solana price, market cap and 24h figures from CoinGecko")]
#[command(version)]
pub struct Cli {
    /// Base URL of the CoinGecko coins API
    #[arg(long, value_name = "URL", env = "SOLPRICE_API_URL")]
    pub base_url: Option<String>,

    /// Directory for cached snapshots (defaults to the user cache directory)
    #[arg(long, value_name = "DIR", env = "SOLPRICE_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Always fetch from the API, bypassing the cache
    #[arg(long)]
    pub no_cache: bool,

    /// Print the snapshot as JSON
    #[arg(long)]
    pub json: bool,

    /// Drop cached snapshots carrying TAG and exit
    ///
    /// Examples:
    ///   solprice --invalidate solana
    ///   solprice --invalidate cryptocurrency
    #[arg(long, value_name = "TAG", conflicts_with = "no_cache")]
    pub invalidate: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// How the snapshot is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Text,
    /// Pretty-printed JSON object
    Json,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// API base URL
    pub base_url: String,
    /// Cache directory, `None` when caching is disabled
    pub cache_dir: Option<PathBuf>,
    /// Output format
    pub output: OutputFormat,
    /// Tag to invalidate instead of fetching
    pub invalidate_tag: Option<String>,
}

/// Validates an API base URL argument.
///
/// # Returns
/// * `Ok(String)` if the argument parses as an http or https URL
/// * `Err(CliError::InvalidBaseUrl)` otherwise
pub fn parse_base_url_arg(s: &str) -> Result<String, CliError> {
    match Url::parse(s) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(s.to_string()),
        _ => Err(CliError::InvalidBaseUrl(s.to_string())),
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if the base URL is invalid or no cache directory is available
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let base_url = match &cli.base_url {
            Some(url) => parse_base_url_arg(url)?,
            None => COINGECKO_BASE_URL.to_string(),
        };

        let cache_dir = if cli.no_cache {
            None
        } else {
            match &cli.cache_dir {
                Some(dir) => Some(dir.clone()),
                None => Some(
                    CacheManager::new()
                        .ok_or(CliError::CacheDirUnavailable)?
                        .cache_dir()
                        .to_path_buf(),
                ),
            }
        };

        let output = if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };

        Ok(StartupConfig {
            base_url,
            cache_dir,
            output,
            invalidate_tag: cli.invalidate.clone(),
        })
    }
}
