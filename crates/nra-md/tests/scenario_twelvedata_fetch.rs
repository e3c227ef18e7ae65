//! TwelveData provider against a local mock server (no network).
//!
//! GREEN when:
//! - a daily `/time_series` response becomes raw rows that normalize into
//!   date-sorted `PriceBar`s
//! - `"status":"error"` bodies surface as `ProviderError::Api`
//! - an empty API key is refused before any request is sent

use chrono::NaiveDate;
use chrono_tz::Tz;
use httpmock::prelude::*;
use nra_md::{
    normalize_rows, FetchBarsRequest, HistoricalProvider, ProviderError,
    TwelveDataHistoricalProvider,
};
use serde_json::json;

fn req() -> FetchBarsRequest {
    FetchBarsRequest {
        symbols: vec!["EUR/USD".to_string()],
        start: NaiveDate::from_ymd_opt(2022, 3, 9).unwrap(),
        end: NaiveDate::from_ymd_opt(2022, 3, 11).unwrap(),
    }
}

#[tokio::test]
async fn daily_series_fetched_and_normalized() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/time_series")
                .query_param("symbol", "EUR/USD")
                .query_param("interval", "1day")
                .query_param("apikey", "test-key");
            then.status(200).json_body(json!({
                "meta": { "symbol": "EUR/USD", "interval": "1day" },
                "values": [
                    { "datetime": "2022-03-11", "open": "1.1030", "high": "1.1040", "low": "1.0980", "close": "1.0995" },
                    { "datetime": "2022-03-09", "open": "1.0990", "high": "1.1010", "low": "1.0980", "close": "1.1000" },
                    { "datetime": "2022-03-10", "open": "1.1000", "high": "1.1050", "low": "1.0990", "close": "1.1030" }
                ],
                "status": "ok"
            }));
        })
        .await;

    let provider =
        TwelveDataHistoricalProvider::new_with_base_url("test-key".to_string(), server.base_url());
    let raw = provider.fetch_bars(&req()).await.unwrap();
    m.assert_async().await;

    assert_eq!(raw.len(), 3);
    assert!(raw.iter().all(|r| r.symbol == "EUR/USD" && r.volume.is_none()));

    let series = normalize_rows(&raw, Tz::UTC);
    assert_eq!(series.report.rows_rejected, 0);
    let dates: Vec<String> = series.bars.iter().map(|b| b.date.to_string()).collect();
    assert_eq!(dates, vec!["2022-03-09", "2022-03-10", "2022-03-11"]);
    assert_eq!(series.bars[1].close, 1.1030);
}

#[tokio::test]
async fn error_status_body_is_api_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/time_series");
            then.status(200).json_body(json!({
                "code": 400,
                "message": "**symbol** not found: EUR/XXX",
                "status": "error"
            }));
        })
        .await;

    let provider =
        TwelveDataHistoricalProvider::new_with_base_url("test-key".to_string(), server.base_url());
    let err = provider.fetch_bars(&req()).await.unwrap_err();
    match err {
        ProviderError::Api { code, message } => {
            assert_eq!(code, Some(400));
            assert!(message.contains("not found"));
        }
        other => panic!("expected Api error, got {other}"),
    }
}

#[tokio::test]
async fn empty_api_key_is_config_error() {
    let provider = TwelveDataHistoricalProvider::new_with_base_url(
        "  ".to_string(),
        "http://127.0.0.1:9".to_string(),
    );
    let err = provider.fetch_bars(&req()).await.unwrap_err();
    assert!(matches!(err, ProviderError::Config(_)));
}
