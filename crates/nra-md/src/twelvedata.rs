//! TwelveData-backed daily provider.

use serde::Deserialize;

use crate::provider::{FetchBarsRequest, HistoricalProvider, ProviderError, RawBar};

/// TwelveData `/time_series` provider at a fixed `1day` interval.
///
/// API key is read by the caller (CLI) and passed in; do not log it.
#[derive(Debug, Clone)]
pub struct TwelveDataHistoricalProvider {
    api_key: String,
    http: reqwest::Client,
    base_url: String,
}

impl TwelveDataHistoricalProvider {
    pub fn new(api_key: String) -> Self {
        Self::new_with_base_url(api_key, "https://api.twelvedata.com".to_string())
    }

    pub fn new_with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn build_time_series_url(&self) -> String {
        format!("{}/time_series", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl HistoricalProvider for TwelveDataHistoricalProvider {
    fn source_name(&self) -> &'static str {
        "twelvedata"
    }

    async fn fetch_bars(&self, req: &FetchBarsRequest) -> Result<Vec<RawBar>, ProviderError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::Config("twelvedata api key is empty".to_string()));
        }

        // Per-symbol requests keep the response shape uniform.
        let mut out: Vec<RawBar> = Vec::new();
        let start_s = req.start.format("%Y-%m-%d").to_string();
        let end_s = req.end.format("%Y-%m-%d").to_string();

        for sym in req.symbols.iter() {
            let resp = self
                .http
                .get(self.build_time_series_url())
                .query(&[
                    ("symbol", sym.as_str()),
                    ("interval", "1day"),
                    ("start_date", start_s.as_str()),
                    ("end_date", end_s.as_str()),
                    ("timezone", "UTC"),
                    ("order", "ASC"),
                    ("format", "JSON"),
                    ("apikey", self.api_key.as_str()),
                ])
                .send()
                .await
                .map_err(|e| ProviderError::Transport(e.to_string()))?;

            let status = resp.status();
            let body: TimeSeriesResponse = resp
                .json()
                .await
                .map_err(|e| ProviderError::Decode(format!("twelvedata json decode: {e}")))?;

            if !status.is_success() {
                return Err(ProviderError::Api {
                    code: Some(i64::from(status.as_u16())),
                    message: body.status_message(),
                });
            }
            if body.is_error() {
                return Err(ProviderError::Api {
                    code: body.code,
                    message: body.status_message(),
                });
            }

            for v in body.values.unwrap_or_default() {
                out.push(RawBar {
                    symbol: sym.to_string(),
                    timestamp: v.datetime,
                    open: v.open,
                    high: v.high,
                    low: v.low,
                    close: v.close,
                    volume: v.volume.filter(|s| !s.trim().is_empty()),
                });
            }
        }

        Ok(out)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TimeSeriesResponse {
    status: Option<String>,
    message: Option<String>,
    code: Option<i64>,
    values: Option<Vec<TimeSeriesValue>>,
}

impl TimeSeriesResponse {
    // TwelveData signals failure with `"status":"error"` and a 200 response.
    fn is_error(&self) -> bool {
        self.status.as_deref() == Some("error")
    }

    fn status_message(&self) -> String {
        match (&self.code, &self.message) {
            (Some(c), Some(m)) => format!("code={} {}", c, m),
            (_, Some(m)) => m.clone(),
            _ => "unknown".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TimeSeriesValue {
    datetime: String,
    open: String,
    high: String,
    low: String,
    close: String,
    #[serde(default)]
    volume: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_series_url_strips_trailing_slash() {
        let p = TwelveDataHistoricalProvider::new_with_base_url(
            "k".to_string(),
            "http://localhost:1234/".to_string(),
        );
        assert_eq!(p.build_time_series_url(), "http://localhost:1234/time_series");
    }

    #[test]
    fn status_message_prefers_code_and_message() {
        let r = TimeSeriesResponse {
            status: Some("error".to_string()),
            message: Some("symbol not found".to_string()),
            code: Some(404),
            values: None,
        };
        assert!(r.is_error());
        assert_eq!(r.status_message(), "code=404 symbol not found");
    }
}
