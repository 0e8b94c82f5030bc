//! Solana price CLI library
//!
//! Fetches the Solana market snapshot from CoinGecko, formats it for display
//! and memoizes it for a short revalidation window.

pub mod cache;
pub mod cli;
pub mod data;
pub mod format;
pub mod logging;
pub mod price;
