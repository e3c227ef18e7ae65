//! `nra analyze`: config -> prices + events -> engine -> artifacts + stdout.

use anyhow::{Context, Result};
use nra_artifacts::{ReportSink, RunArtifactsSink, RunMeta, TextReportSink};
use nra_calendar::{CsvEventSource, EventSource, ReferenceCalendar};
use nra_config::{AnalysisConfig, ConfigMode};
use nra_engine::{analyze, PipSize, PriceIndex};
use std::path::PathBuf;
use uuid::Uuid;

use super::{get_git_hash, load_config};

pub struct AnalyzeArgs {
    pub config_paths: Vec<PathBuf>,
    pub prices: Option<PathBuf>,
    pub events: Option<PathBuf>,
    pub exports: Option<PathBuf>,
    pub strict_config: bool,
}

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let loaded = load_config(&args.config_paths, ConfigMode::Analyze, args.strict_config)?;
    let mut cfg = AnalysisConfig::from_json(&loaded.config_json)?;

    if args.prices.is_some() {
        cfg.data.prices_csv = args.prices;
    }
    if args.events.is_some() {
        cfg.data.events_csv = args.events;
    }
    if let Some(root) = args.exports {
        cfg.export.root = root;
    }

    let pip = PipSize::new(cfg.instrument.pip_size)
        .with_context(|| format!("invalid pip size {}", cfg.instrument.pip_size))?;
    let prices_path = cfg
        .data
        .prices_csv
        .clone()
        .context("no price series: pass --prices or set data.prices_csv")?;

    let series = nra_md::load_price_csv(&prices_path, &cfg.instrument.symbol, cfg.data.session_tz)?;
    let index = PriceIndex::new(series.bars);

    let source: Box<dyn EventSource> = match &cfg.data.events_csv {
        Some(path) => Box::new(CsvEventSource::new(path)),
        None => Box::new(ReferenceCalendar),
    };
    let calendar = source
        .load()
        .with_context(|| format!("load events from {} source failed", source.name()))?;

    let report = analyze(&index, &calendar, pip);

    let run_id = Uuid::new_v4();
    let mut artifacts = RunArtifactsSink::new(
        &cfg.export.root,
        RunMeta {
            run_id,
            symbol: cfg.instrument.symbol.clone(),
            pip_size: pip.get(),
            git_hash: get_git_hash().unwrap_or_else(|| "UNKNOWN".to_string()),
            config_hash: loaded.config_hash.clone(),
            event_source: source.name().to_string(),
        },
    );
    artifacts.write_report(&report)?;

    let q = &series.report;
    println!("run_id={run_id}");
    println!("config_hash={}", loaded.config_hash);
    println!("symbol={}", cfg.instrument.symbol);
    println!("event_source={}", source.name());
    println!(
        "price_rows_read={} rows_ok={} rejected={} duplicates={} missing_weekdays={}",
        q.rows_read,
        q.rows_accepted,
        q.rows_rejected,
        q.duplicates.len(),
        q.missing_weekdays_total()
    );
    if let Some(dir) = artifacts.run_dir() {
        println!("run_dir={}", dir.display());
    }

    let stdout = std::io::stdout();
    TextReportSink::new(stdout.lock()).write_report(&report)?;
    Ok(())
}
