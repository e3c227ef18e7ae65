//! Provider boundary for daily price acquisition.
//!
//! This module defines **only** the raw bar type, the fetch request and the
//! provider trait. No CSV logic, no float conversion, no date normalization
//! and no data-quality logic belong here.

use std::fmt;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Raw bar
// ---------------------------------------------------------------------------

/// A single daily OHLC row as returned verbatim by an upstream source
/// (provider response or CSV file).
///
/// Every field stays a string so that coercion and rejection happen in one
/// place ([`crate::normalizer::normalize`]) regardless of where the row came
/// from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBar {
    /// Instrument symbol exactly as given to the source (e.g. `"EUR/USD"`).
    pub symbol: String,
    /// Timestamp as supplied: a bare date, a naive datetime, RFC 3339, or
    /// epoch seconds.
    pub timestamp: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    /// Absent for sources that do not report volume (typical for FX).
    pub volume: Option<String>,
}

// ---------------------------------------------------------------------------
// Fetch request
// ---------------------------------------------------------------------------

/// Parameters for a historical daily fetch passed to a [`HistoricalProvider`].
#[derive(Debug, Clone)]
pub struct FetchBarsRequest {
    pub symbols: Vec<String>,
    /// Inclusive start date.
    pub start: NaiveDate,
    /// Inclusive end date.
    pub end: NaiveDate,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that a [`HistoricalProvider`] implementation may return.
#[derive(Debug)]
pub enum ProviderError {
    /// Network or transport failure.
    Transport(String),
    /// The upstream API returned an application-level error.
    Api { code: Option<i64>, message: String },
    /// A response payload could not be decoded.
    Decode(String),
    /// A required configuration value (e.g. API key) is missing or invalid.
    Config(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Transport(msg) => write!(f, "transport error: {msg}"),
            ProviderError::Api {
                code: Some(c),
                message,
            } => {
                write!(f, "provider api error code={c}: {message}")
            }
            ProviderError::Api {
                code: None,
                message,
            } => {
                write!(f, "provider api error: {message}")
            }
            ProviderError::Decode(msg) => write!(f, "decode error: {msg}"),
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Upstream market-data provider contract.
///
/// Object-safe so callers can hold a `Box<dyn HistoricalProvider>`.
#[async_trait::async_trait]
pub trait HistoricalProvider: Send + Sync {
    /// Short name identifying this provider (e.g. `"twelvedata"`).
    fn source_name(&self) -> &'static str;

    /// Fetch daily bars for the symbols and date range in `req`.
    ///
    /// Returns rows in the order supplied by the upstream API; callers are
    /// responsible for sorting and deduplication.
    async fn fetch_bars(&self, req: &FetchBarsRequest) -> Result<Vec<RawBar>, ProviderError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    struct MockProvider {
        bars: Vec<RawBar>,
    }

    #[async_trait::async_trait]
    impl HistoricalProvider for MockProvider {
        fn source_name(&self) -> &'static str {
            "mock"
        }

        async fn fetch_bars(&self, _req: &FetchBarsRequest) -> Result<Vec<RawBar>, ProviderError> {
            Ok(self.bars.clone())
        }
    }

    fn sample_bar(symbol: &str) -> RawBar {
        RawBar {
            symbol: symbol.to_string(),
            timestamp: "2022-03-10".to_string(),
            open: "1.1000".to_string(),
            high: "1.1050".to_string(),
            low: "1.0990".to_string(),
            close: "1.1030".to_string(),
            volume: None,
        }
    }

    #[tokio::test]
    async fn mock_provider_returns_configured_bars() {
        let bars = vec![sample_bar("EUR/USD"), sample_bar("GBP/USD")];
        let provider: Box<dyn HistoricalProvider> = Box::new(MockProvider { bars });

        let req = FetchBarsRequest {
            symbols: vec!["EUR/USD".to_string(), "GBP/USD".to_string()],
            start: NaiveDate::from_ymd_opt(2022, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2022, 3, 31).unwrap(),
        };

        let result = provider.fetch_bars(&req).await.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].symbol, "EUR/USD");
        assert_eq!(result[1].symbol, "GBP/USD");
        assert_eq!(provider.source_name(), "mock");
    }

    #[test]
    fn provider_error_display_api_with_code() {
        let err = ProviderError::Api {
            code: Some(400),
            message: "bad symbol".to_string(),
        };
        assert_eq!(err.to_string(), "provider api error code=400: bad symbol");
    }

    #[test]
    fn provider_error_display_api_no_code() {
        let err = ProviderError::Api {
            code: None,
            message: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "provider api error: rate limited");
    }

    #[test]
    fn provider_error_display_transport() {
        let err = ProviderError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "transport error: connection refused");
    }
}
