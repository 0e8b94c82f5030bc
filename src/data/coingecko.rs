//! CoinGecko market data client
//!
//! Fetches the market snapshot for a coin from the CoinGecko `/coins/{id}`
//! endpoint and parses it into a `MarketQuote`.

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::MarketQuote;

/// Base URL for the CoinGecko coins API
pub const COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3/coins";

/// CoinGecko identifier of the tracked asset
pub const COIN_ID: &str = "solana";

/// Query flags limiting the response to market data
const QUERY: &str = "localization=false&tickers=false&market_data=true&community_data=false&developer_data=false&sparkline=false";

/// Errors that can occur when fetching market data
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("CoinGecko API responded with status: {0}")]
    Status(u16),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response has no market data section
    #[error("No market data available")]
    MissingMarketData,
}

impl FetchError {
    /// Whether the failure is about the response body rather than transport
    pub fn is_data_shape(&self) -> bool {
        matches!(self, FetchError::Parse(_) | FetchError::MissingMarketData)
    }
}

/// Client for fetching market data from the CoinGecko API
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
    coin_id: String,
}

impl Default for CoinGeckoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CoinGeckoClient {
    /// Create a new CoinGeckoClient against the public API
    pub fn new() -> Self {
        Self::with_base_url(COINGECKO_BASE_URL)
    }

    /// Create a new CoinGeckoClient against a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into(),
            coin_id: COIN_ID.to_string(),
        }
    }

    /// Full request URL for the tracked coin
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}?{}",
            self.base_url.trim_end_matches('/'),
            self.coin_id,
            QUERY
        )
    }

    /// Fetch the current market quote
    ///
    /// # Returns
    /// * `Ok(MarketQuote)` - Raw market figures in USD
    /// * `Err(FetchError)` - If the request fails, the status is not 2xx, or
    ///   the body lacks the expected market data
    pub async fn fetch_quote(&self) -> Result<MarketQuote, FetchError> {
        let url = self.endpoint();
        tracing::debug!(%url, "requesting market data");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(ACCEPT_LANGUAGE, "en-US")
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        parse_quote(&text)
    }
}

/// Parse a `/coins/{id}` response body into a `MarketQuote`
fn parse_quote(body: &str) -> Result<MarketQuote, FetchError> {
    let response: CoinResponse = serde_json::from_str(body)?;
    let market = response.market_data.ok_or(FetchError::MissingMarketData)?;

    Ok(MarketQuote {
        current_price: market.current_price.usd,
        change_24h: market.price_change_percentage_24h,
        market_cap: market.market_cap.usd,
        total_volume: market.total_volume.usd,
        high_24h: market.high_24h.usd,
        low_24h: market.low_24h.usd,
        last_updated: response.last_updated,
    })
}

/// CoinGecko `/coins/{id}` response structure
#[derive(Debug, Deserialize)]
struct CoinResponse {
    #[serde(default)]
    last_updated: Option<String>,
    #[serde(default)]
    market_data: Option<MarketData>,
}

/// Market data section of the response
#[derive(Debug, Deserialize)]
struct MarketData {
    current_price: UsdValue,
    price_change_percentage_24h: f64,
    market_cap: UsdValue,
    total_volume: UsdValue,
    high_24h: UsdValue,
    low_24h: UsdValue,
}

/// Per-currency value map, of which only USD is read
#[derive(Debug, Deserialize)]
struct UsdValue {
    usd: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Trimmed CoinGecko `/coins/solana` response
    const VALID_RESPONSE: &str = r#"{
        "id": "solana",
        "symbol": "sol",
        "name": "Solana",
        "last_updated": "2024-01-15T10:30:00Z",
        "market_data": {
            "current_price": { "usd": 150.5, "eur": 138.2 },
            "price_change_percentage_24h": 3.456,
            "market_cap": { "usd": 72000000000, "eur": 66000000000 },
            "total_volume": { "usd": 1500000000 },
            "high_24h": { "usd": 152.0 },
            "low_24h": { "usd": 148.0 },
            "last_updated": "2024-01-15T10:30:00Z"
        }
    }"#;

    #[test]
    fn test_parse_valid_response() {
        let quote = parse_quote(VALID_RESPONSE).expect("Failed to parse valid response");

        assert!((quote.current_price - 150.5).abs() < 0.0001);
        assert!((quote.change_24h - 3.456).abs() < 0.0001);
        assert!((quote.market_cap - 7.2e10).abs() < 1.0);
        assert!((quote.total_volume - 1.5e9).abs() < 1.0);
        assert!((quote.high_24h - 152.0).abs() < 0.0001);
        assert!((quote.low_24h - 148.0).abs() < 0.0001);
        assert_eq!(quote.last_updated.as_deref(), Some("2024-01-15T10:30:00Z"));
    }

    #[test]
    fn test_parse_missing_market_data() {
        let body = r#"{ "id": "solana", "last_updated": "2024-01-15T10:30:00Z" }"#;

        let err = parse_quote(body).unwrap_err();

        assert!(matches!(err, FetchError::MissingMarketData));
        assert!(err.is_data_shape());
        assert_eq!(err.to_string(), "No market data available");
    }

    #[test]
    fn test_parse_null_market_data() {
        let body = r#"{ "market_data": null }"#;

        assert!(matches!(parse_quote(body), Err(FetchError::MissingMarketData)));
    }

    #[test]
    fn test_parse_null_change_is_error() {
        let body = VALID_RESPONSE.replace("3.456", "null");

        let err = parse_quote(&body).unwrap_err();

        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn test_parse_missing_usd_is_error() {
        let body = VALID_RESPONSE.replace(r#""high_24h": { "usd": 152.0 }"#, r#""high_24h": {}"#);

        assert!(matches!(parse_quote(&body), Err(FetchError::Parse(_))));
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_quote("<html>rate limited</html>");

        assert!(matches!(result, Err(FetchError::Parse(_))));
    }

    #[test]
    fn test_parse_without_last_updated() {
        let body = VALID_RESPONSE.replace(r#""last_updated": "2024-01-15T10:30:00Z","#, "");

        let quote = parse_quote(&body).expect("last_updated is optional");

        assert!(quote.last_updated.is_none());
    }

    #[test]
    fn test_endpoint_contains_fixed_query() {
        let client = CoinGeckoClient::new();

        assert_eq!(
            client.endpoint(),
            "https://api.coingecko.com/api/v3/coins/solana?localization=false&tickers=false&market_data=true&community_data=false&developer_data=false&sparkline=false"
        );
    }

    #[test]
    fn test_endpoint_with_trailing_slash_base() {
        let client = CoinGeckoClient::with_base_url("http://127.0.0.1:9000/api/");

        assert!(client
            .endpoint()
            .starts_with("http://127.0.0.1:9000/api/solana?"));
    }

    #[test]
    fn test_status_error_message() {
        assert_eq!(
            FetchError::Status(404).to_string(),
            "CoinGecko API responded with status: 404"
        );
        assert!(!FetchError::Status(500).is_data_shape());
    }
}
