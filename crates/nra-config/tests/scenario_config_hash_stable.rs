//! Config hash stability.
//!
//! GREEN when:
//! - the same inputs hash identically
//! - key order inside YAML does not change the hash
//! - different values hash differently
//! - an overlay layer overrides the base and the merged hash is stable

use nra_config::{load_layered_yaml, load_layered_yaml_from_strings, AnalysisConfig};

const BASE_YAML: &str = r#"
instrument:
  symbol: "EUR/USD"
  pip_size: 0.0001
data:
  prices_csv: "data/eurusd_daily.csv"
  session_tz: "UTC"
export:
  root: "exports"
"#;

const BASE_YAML_REORDERED: &str = r#"
export:
  root: "exports"
data:
  session_tz: "UTC"
  prices_csv: "data/eurusd_daily.csv"
instrument:
  pip_size: 0.0001
  symbol: "EUR/USD"
"#;

const OVERLAY_YAML: &str = r#"
instrument:
  symbol: "USD/JPY"
  pip_size: 0.01
"#;

#[test]
fn same_input_produces_identical_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
}

#[test]
fn reordered_keys_produce_same_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML_REORDERED]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
}

#[test]
fn different_values_produce_different_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();
    assert_ne!(a.config_hash, b.config_hash);
}

#[test]
fn overlay_overrides_base() {
    let loaded = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();
    let cfg = AnalysisConfig::from_json(&loaded.config_json).unwrap();
    assert_eq!(cfg.instrument.symbol, "USD/JPY");
    assert_eq!(cfg.instrument.pip_size, 0.01);
    // untouched by the overlay
    assert_eq!(
        cfg.data.prices_csv.as_deref(),
        Some(std::path::Path::new("data/eurusd_daily.csv"))
    );
}

#[test]
fn hash_is_64_hex_chars() {
    let loaded = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(loaded.config_hash.len(), 64);
    assert!(loaded.config_hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn files_hash_like_strings() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("base.yaml");
    let overlay = dir.path().join("jpy.yaml");
    std::fs::write(&base, BASE_YAML).unwrap();
    std::fs::write(&overlay, OVERLAY_YAML).unwrap();

    let from_files = load_layered_yaml(&[base, overlay]).unwrap();
    let from_strings = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();
    assert_eq!(from_files.config_hash, from_strings.config_hash);
}

#[test]
fn missing_file_names_path() {
    let err = load_layered_yaml(&["/no/such/dir/analysis.yaml"])
        .unwrap_err()
        .to_string();
    assert!(err.contains("analysis.yaml"), "{err}");
}
