//! `nra prices fetch`: provider -> normalized daily bars -> price CSV.

use anyhow::{Context, Result};
use nra_config::{resolve_secrets, AnalysisConfig, ConfigMode};
use nra_md::{normalize_rows, FetchBarsRequest, HistoricalProvider, TwelveDataHistoricalProvider};
use std::fs::{self, File};
use std::path::PathBuf;
use tracing::info;

use super::{load_config, parse_date};

pub struct FetchArgs {
    pub symbol: Option<String>,
    pub start: String,
    pub end: String,
    pub out: PathBuf,
    pub config_paths: Vec<PathBuf>,
    pub base_url: String,
}

pub async fn fetch(args: FetchArgs) -> Result<()> {
    let loaded = load_config(&args.config_paths, ConfigMode::Fetch, false)?;
    let cfg = AnalysisConfig::from_json(&loaded.config_json)?;

    let symbol = args
        .symbol
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or(cfg.instrument.symbol);

    let start = parse_date("start", &args.start)?;
    let end = parse_date("end", &args.end)?;
    if end < start {
        anyhow::bail!("--end must be >= --start");
    }

    let secrets = resolve_secrets(&loaded.config_json, true)?;
    let api_key = secrets
        .twelvedata_api_key
        .with_context(|| format!("missing env var {}", secrets.twelvedata_api_key_var))?;

    let provider = TwelveDataHistoricalProvider::new_with_base_url(api_key, args.base_url);
    let req = FetchBarsRequest {
        symbols: vec![symbol.clone()],
        start,
        end,
    };

    let raw = provider
        .fetch_bars(&req)
        .await
        .with_context(|| format!("{} fetch failed for {symbol}", provider.source_name()))?;
    info!(source = provider.source_name(), %symbol, rows = raw.len(), "provider rows received");

    let series = normalize_rows(&raw, cfg.data.session_tz);

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create dir failed: {}", parent.display()))?;
    }
    let file = File::create(&args.out)
        .with_context(|| format!("create failed: {}", args.out.display()))?;
    nra_md::ingest_csv::write_price_csv(file, &series.bars)
        .with_context(|| format!("write price csv failed: {}", args.out.display()))?;

    let r = &series.report;
    println!("source={}", provider.source_name());
    println!("symbol={symbol}");
    println!(
        "rows_read={} rows_ok={} rejected={} duplicates={} missing_weekdays={}",
        r.rows_read,
        r.rows_accepted,
        r.rows_rejected,
        r.duplicates.len(),
        r.missing_weekdays_total()
    );
    println!("bars={}", series.bars.len());
    println!("out={}", args.out.display());
    Ok(())
}
