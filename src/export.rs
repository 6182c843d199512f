use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use crate::roster::PlayerRecord;

/// Stable column contract for the exported table.
pub const CSV_COLUMNS: [&str; 6] = [
    "nickname",
    "position",
    "club",
    "average_score",
    "price",
    "efficiency",
];

pub struct ExportReport {
    pub path: PathBuf,
    pub rows: usize,
}

/// Serialize the normalized table, one row per record in listing order.
pub fn export_market_csv(path: &Path, records: &[PlayerRecord]) -> Result<ExportReport> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    writer
        .write_record(CSV_COLUMNS)
        .context("write csv header")?;
    for record in records {
        writer
            .write_record([
                record.nickname.clone(),
                record.position.label().to_string(),
                record.club.clone(),
                format!("{:.2}", record.average_score),
                format!("{:.2}", record.price),
                format!("{:.2}", record.efficiency),
            ])
            .context("write csv row")?;
    }
    writer.flush().context("flush csv")?;

    Ok(ExportReport {
        path: path.to_path_buf(),
        rows: records.len(),
    })
}

pub fn default_export_path() -> PathBuf {
    PathBuf::from(format!(
        "cartola_market_{}.csv",
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}
