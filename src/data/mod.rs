//! Core data models for the price snapshot
//!
//! `MarketQuote` holds the raw figures parsed from the upstream API and
//! `PriceSnapshot` their display form.

pub mod coingecko;

pub use coingecko::{CoinGeckoClient, FetchError};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::format::{format_change, format_currency, format_date, format_large_number};

/// Sentinel shown when a figure is unavailable
pub const NOT_AVAILABLE: &str = "N/A";

/// Sentinel shown for the 24h change when it is unavailable
pub const NO_CHANGE: &str = "0.00";

/// Raw market figures for one asset, in USD
#[derive(Debug, Clone, PartialEq)]
pub struct MarketQuote {
    /// Current price
    pub current_price: f64,
    /// Price change over the last 24 hours, in percent
    pub change_24h: f64,
    /// Market capitalisation
    pub market_cap: f64,
    /// Trading volume over the last 24 hours
    pub total_volume: f64,
    /// Highest price over the last 24 hours
    pub high_24h: f64,
    /// Lowest price over the last 24 hours
    pub low_24h: f64,
    /// Upstream update timestamp, as sent by the API
    pub last_updated: Option<String>,
}

/// Formatted market snapshot, ready for display
///
/// Every field is always populated; missing data is represented by the
/// `"N/A"` / `"0.00"` sentinels rather than by absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSnapshot {
    /// Current price, e.g. `"150.50"`
    pub price: String,
    /// 24h change in percent, e.g. `"3.46"`
    #[serde(rename = "change24h")]
    pub change_24h: String,
    /// Abbreviated market capitalisation, e.g. `"72.00B"`
    pub market_cap: String,
    /// Abbreviated 24h trading volume, e.g. `"1.50B"`
    #[serde(rename = "volume24h")]
    pub volume_24h: String,
    /// Upstream update time in UTC, e.g. `"Jan 15, 10:30 AM"`
    pub last_updated: String,
    /// Highest price over the last 24 hours
    #[serde(rename = "high24h")]
    pub high_24h: String,
    /// Lowest price over the last 24 hours
    #[serde(rename = "low24h")]
    pub low_24h: String,
}

impl PriceSnapshot {
    /// The snapshot returned when no market data could be obtained
    pub fn placeholder() -> Self {
        Self {
            price: NOT_AVAILABLE.to_string(),
            change_24h: NO_CHANGE.to_string(),
            market_cap: NOT_AVAILABLE.to_string(),
            volume_24h: NOT_AVAILABLE.to_string(),
            last_updated: NOT_AVAILABLE.to_string(),
            high_24h: NOT_AVAILABLE.to_string(),
            low_24h: NOT_AVAILABLE.to_string(),
        }
    }

    /// Whether this is the no-data placeholder
    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }
}

impl From<&MarketQuote> for PriceSnapshot {
    fn from(quote: &MarketQuote) -> Self {
        Self {
            price: format_currency(quote.current_price),
            change_24h: format_change(quote.change_24h),
            market_cap: format_large_number(quote.market_cap),
            volume_24h: format_large_number(quote.total_volume),
            last_updated: quote
                .last_updated
                .as_deref()
                .map(format_date)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            high_24h: format_currency(quote.high_24h),
            low_24h: format_currency(quote.low_24h),
        }
    }
}

impl fmt::Display for PriceSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Price:        ${}", self.price)?;
        writeln!(f, "24h Change:   {}%", self.change_24h)?;
        writeln!(f, "24h High:     ${}", self.high_24h)?;
        writeln!(f, "24h Low:      ${}", self.low_24h)?;
        writeln!(f, "Market Cap:   ${}", self.market_cap)?;
        writeln!(f, "24h Volume:   ${}", self.volume_24h)?;
        write!(f, "Last Updated: {}", self.last_updated)
    }
}
