//! Command handlers for the `nra` binary.
//!
//! Shared utilities used by multiple command paths live here.

pub mod analyze;
pub mod calendar;
pub mod prices;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use nra_config::{report_unused_keys, ConfigMode, LoadedConfig, UnusedKeyPolicy};
use std::path::PathBuf;
use std::process::Command;
use tracing::warn;

/// Load layered config, or an empty one when no paths were given, and run the
/// unused-key guard for `mode`.
pub fn load_config(paths: &[PathBuf], mode: ConfigMode, strict: bool) -> Result<LoadedConfig> {
    let loaded = if paths.is_empty() {
        LoadedConfig::empty()?
    } else {
        nra_config::load_layered_yaml(paths)?
    };

    let policy = if strict {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    let report = report_unused_keys(mode, &loaded.config_json, policy)?;
    if !report.is_clean() {
        warn!(
            mode = %report.mode,
            unused = ?report.unused_leaf_pointers,
            "config has keys this command does not read"
        );
    }
    Ok(loaded)
}

pub fn parse_date(flag: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid --{flag} date: {raw} (expected YYYY-MM-DD)"))
}

/// Best-effort git hash (short).
pub fn get_git_hash() -> Option<String> {
    let out = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;

    if !out.status.success() {
        return None;
    }
    let s = String::from_utf8(out.stdout).ok()?;
    Some(s.trim().to_string())
}
