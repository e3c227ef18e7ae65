//! nra-artifacts
//!
//! Per-run export directory and the [`ReportSink`] seam between the engine
//! and any output format.
//!
//! Layout of `exports/<run_id>/`:
//!
//! ```text
//! manifest.json          run identity, instrument, config hash, artifact list
//! reaction_records.csv   one row per reaction record
//! group_summary.csv      one row per label
//! summary.json           overall + per-label statistics
//! ```

pub mod tables;
pub mod text;

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use nra_engine::{AnalysisReport, GroupSummary, OverallSummary};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

pub use tables::{format_pct, write_group_summary, write_reaction_records};
pub use text::TextReportSink;

pub const SCHEMA_VERSION: i32 = 1;

/// Anything that can take a finished report: files, a terminal, a chart
/// generator.
pub trait ReportSink {
    fn write_report(&mut self, report: &AnalysisReport) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: i32,
    pub run_id: Uuid,
    pub symbol: String,
    pub pip_size: f64,
    pub git_hash: String,
    pub config_hash: String,
    /// Name of the event source (`reference`, `csv`).
    pub event_source: String,
    pub created_at_utc: DateTime<Utc>,
    pub artifacts: ArtifactList,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactList {
    pub manifest_json: String,
    pub reaction_records_csv: String,
    pub group_summary_csv: String,
    pub summary_json: String,
}

impl Default for ArtifactList {
    fn default() -> Self {
        Self {
            manifest_json: "manifest.json".to_string(),
            reaction_records_csv: "reaction_records.csv".to_string(),
            group_summary_csv: "group_summary.csv".to_string(),
            summary_json: "summary.json".to_string(),
        }
    }
}

/// Identity of a run, fixed before the engine runs.
#[derive(Debug, Clone)]
pub struct RunMeta {
    pub run_id: Uuid,
    pub symbol: String,
    pub pip_size: f64,
    pub git_hash: String,
    pub config_hash: String,
    pub event_source: String,
}

pub struct InitRunArtifactsResult {
    pub run_dir: PathBuf,
    pub manifest_path: PathBuf,
}

/// Create `exports_root/<run_id>/` and write `manifest.json`.
pub fn init_run_artifacts(exports_root: &Path, meta: &RunMeta) -> Result<InitRunArtifactsResult> {
    let run_dir = exports_root.join(meta.run_id.to_string());
    fs::create_dir_all(&run_dir)
        .with_context(|| format!("create exports dir failed: {}", run_dir.display()))?;

    let manifest = RunManifest {
        schema_version: SCHEMA_VERSION,
        run_id: meta.run_id,
        symbol: meta.symbol.clone(),
        pip_size: meta.pip_size,
        git_hash: meta.git_hash.clone(),
        config_hash: meta.config_hash.clone(),
        event_source: meta.event_source.clone(),
        created_at_utc: Utc::now(),
        artifacts: ArtifactList::default(),
    };

    let manifest_path = run_dir.join(&manifest.artifacts.manifest_json);
    write_json(&manifest_path, &manifest)?;

    Ok(InitRunArtifactsResult {
        run_dir,
        manifest_path,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("serialize failed: {}", path.display()))?;
    fs::write(path, format!("{json}\n"))
        .with_context(|| format!("write failed: {}", path.display()))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let f = File::create(path).with_context(|| format!("create failed: {}", path.display()))?;
    Ok(BufWriter::new(f))
}

// ---------------------------------------------------------------------------
// Directory sink
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct SummaryDoc<'a> {
    symbol: &'a str,
    pip_size: f64,
    records: usize,
    dropped_events: usize,
    overall: Option<&'a OverallSummary>,
    groups: &'a [GroupSummary],
}

/// Writes one report into `exports_root/<run_id>/`.
pub struct RunArtifactsSink {
    exports_root: PathBuf,
    meta: RunMeta,
    run_dir: Option<PathBuf>,
}

impl RunArtifactsSink {
    pub fn new(exports_root: impl Into<PathBuf>, meta: RunMeta) -> Self {
        Self {
            exports_root: exports_root.into(),
            meta,
            run_dir: None,
        }
    }

    /// Set after a successful `write_report`.
    pub fn run_dir(&self) -> Option<&Path> {
        self.run_dir.as_deref()
    }
}

impl ReportSink for RunArtifactsSink {
    fn write_report(&mut self, report: &AnalysisReport) -> Result<()> {
        let init = init_run_artifacts(&self.exports_root, &self.meta)?;
        let names = ArtifactList::default();
        let dir = &init.run_dir;

        write_reaction_records(create(&dir.join(&names.reaction_records_csv))?, &report.records)?;
        write_group_summary(create(&dir.join(&names.group_summary_csv))?, &report.summaries)?;
        write_json(
            &dir.join(&names.summary_json),
            &SummaryDoc {
                symbol: &self.meta.symbol,
                pip_size: report.pip_size.get(),
                records: report.records.len(),
                dropped_events: report.dropped_events,
                overall: report.overall.as_ref(),
                groups: &report.summaries,
            },
        )?;

        info!(run_id = %self.meta.run_id, dir = %dir.display(), "run artifacts written");
        self.run_dir = Some(init.run_dir);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> RunMeta {
        RunMeta {
            run_id: Uuid::new_v4(),
            symbol: "EUR/USD".to_string(),
            pip_size: 0.0001,
            git_hash: "UNKNOWN".to_string(),
            config_hash: "abc".to_string(),
            event_source: "reference".to_string(),
        }
    }

    #[test]
    fn manifest_lands_under_run_id() {
        let dir = tempfile::tempdir().unwrap();
        let m = meta();
        let res = init_run_artifacts(dir.path(), &m).unwrap();
        assert_eq!(res.run_dir, dir.path().join(m.run_id.to_string()));

        let raw = fs::read_to_string(&res.manifest_path).unwrap();
        let parsed: RunManifest = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.run_id, m.run_id);
        assert_eq!(parsed.schema_version, SCHEMA_VERSION);
        assert_eq!(parsed.artifacts.group_summary_csv, "group_summary.csv");
    }
}
