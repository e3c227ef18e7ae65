//! Price CSV load from disk.
//!
//! GREEN when:
//! - a Yahoo-style daily file loads into a sorted, unique series
//! - malformed rows are rejected and counted without failing the load
//! - a missing file is an error carrying the path

use std::io::Write;

use chrono_tz::Tz;
use nra_md::load_price_csv;

const CSV: &str = "\
Date,Open,High,Low,Close,Adj Close,Volume
2022-03-11,1.1030,1.1040,1.0980,1.0995,1.0995,0
2022-03-09,1.0990,1.1010,1.0980,1.1000,1.1000,0
2022-03-10,1.1000,1.1050,1.0990,1.1030,1.1030,0
2022-03-14,,,,,,
2022-03-15,1.10,1.09,1.11,1.10,1.10,0
";

#[test]
fn yahoo_file_loads_with_rejections_counted() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(CSV.as_bytes()).unwrap();

    let series = load_price_csv(f.path(), "EUR/USD", Tz::UTC).unwrap();

    assert_eq!(series.bars.len(), 3);
    assert_eq!(series.report.rows_read, 5);
    assert_eq!(series.report.rows_rejected, 2);
    assert!(series.bars.windows(2).all(|w| w[0].date < w[1].date));
    assert_eq!(series.bars[0].close, 1.1000);
    assert_eq!(series.bars[0].volume, Some(0.0));
}

#[test]
fn missing_file_is_error_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.csv");
    let err = load_price_csv(&path, "EUR/USD", Tz::UTC).unwrap_err();
    assert!(format!("{err:#}").contains("nope.csv"));
}
