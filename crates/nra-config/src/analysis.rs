//! Typed view over the merged config for `analyze` and `prices fetch`.
//!
//! ```yaml
//! instrument:
//!   symbol: "EUR/USD"
//!   pip_size: 0.0001
//! data:
//!   prices_csv: "data/eurusd_daily.csv"
//!   events_csv: "data/us_news_directory.csv"   # optional; reference calendar if absent
//!   session_tz: "UTC"
//! export:
//!   root: "exports"
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono_tz::Tz;
use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_SYMBOL: &str = "EUR/USD";
pub const DEFAULT_PIP_SIZE: f64 = 0.0001;
pub const DEFAULT_EXPORT_ROOT: &str = "exports";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentConfig {
    pub symbol: String,
    pub pip_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataConfig {
    pub prices_csv: Option<PathBuf>,
    pub events_csv: Option<PathBuf>,
    #[serde(serialize_with = "serialize_tz")]
    pub session_tz: Tz,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportConfig {
    pub root: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisConfig {
    pub instrument: InstrumentConfig,
    pub data: DataConfig,
    pub export: ExportConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            instrument: InstrumentConfig {
                symbol: DEFAULT_SYMBOL.to_string(),
                pip_size: DEFAULT_PIP_SIZE,
            },
            data: DataConfig {
                prices_csv: None,
                events_csv: None,
                session_tz: Tz::UTC,
            },
            export: ExportConfig {
                root: PathBuf::from(DEFAULT_EXPORT_ROOT),
            },
        }
    }
}

fn serialize_tz<S: serde::Serializer>(tz: &Tz, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(tz.name())
}

fn read_str_at<'a>(config: &'a Value, pointer: &str) -> Result<Option<&'a str>> {
    match config.pointer(pointer) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim())),
        Some(other) => bail!("CONFIG_TYPE {pointer}: expected string, got {other}"),
    }
}

impl AnalysisConfig {
    /// Read the typed view, filling defaults for absent keys.
    pub fn from_json(config: &Value) -> Result<Self> {
        let mut out = AnalysisConfig::default();

        if let Some(s) = read_str_at(config, "/instrument/symbol")? {
            out.instrument.symbol = s.to_string();
        }

        match config.pointer("/instrument/pip_size") {
            None | Some(Value::Null) => {}
            Some(v) => {
                let pip = v
                    .as_f64()
                    .with_context(|| format!("CONFIG_TYPE /instrument/pip_size: expected number, got {v}"))?;
                if !(pip.is_finite() && pip > 0.0) {
                    bail!("CONFIG_INVALID /instrument/pip_size must be finite and > 0 (got {pip})");
                }
                out.instrument.pip_size = pip;
            }
        }

        out.data.prices_csv = read_str_at(config, "/data/prices_csv")?.map(PathBuf::from);
        out.data.events_csv = read_str_at(config, "/data/events_csv")?.map(PathBuf::from);

        if let Some(name) = read_str_at(config, "/data/session_tz")? {
            out.data.session_tz = name
                .parse::<Tz>()
                .map_err(|e| anyhow::anyhow!("CONFIG_INVALID /data/session_tz '{name}': {e}"))?;
        }

        if let Some(root) = read_str_at(config, "/export/root")? {
            out.export.root = PathBuf::from(root);
        }

        Ok(out)
    }
}
