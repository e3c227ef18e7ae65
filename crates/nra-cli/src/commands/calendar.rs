//! `nra calendar export`.

use anyhow::{Context, Result};
use nra_calendar::directory_csv::write_directory;
use nra_calendar::{EventSource, ReferenceCalendar};
use std::fs::{self, File};
use std::path::Path;

pub fn export_reference(out: &Path) -> Result<()> {
    let calendar = ReferenceCalendar.load()?;

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create dir failed: {}", parent.display()))?;
    }
    let file = File::create(out).with_context(|| format!("create failed: {}", out.display()))?;
    write_directory(file, &calendar)
        .with_context(|| format!("write event directory failed: {}", out.display()))?;

    println!("occurrences={}", calendar.len());
    println!("distinct_dates={}", calendar.occurrence_dates().len());
    println!("out={}", out.display());
    Ok(())
}
