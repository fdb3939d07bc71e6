//! Output serialization.
//!
//! Writes the final record sequence to JSON or CSV. The pipeline only
//! guarantees the record shape; everything here is presentation.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::records::CompanyRecord;

/// CSV column headers, in output order.
const CSV_HEADERS: [&str; 5] = [
    "Company Name",
    "Website URL",
    "Location",
    "Founded Year",
    "Services",
];

/// Separator used to flatten the services list into one CSV cell.
const SERVICES_SEPARATOR: &str = "; ";

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }
    Ok(())
}

/// Write records as pretty-printed JSON.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn save_to_json(records: &[CompanyRecord], path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;

    let json = serde_json::to_string_pretty(records).context("Failed to serialize records")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Saved JSON to {}", path.display());
    Ok(())
}

/// Write records as CSV, with services joined into a single column.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn save_to_csv(records: &[CompanyRecord], path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer
        .write_record(CSV_HEADERS)
        .context("Failed to write CSV header")?;

    for record in records {
        let services = record.services.join(SERVICES_SEPARATOR);
        writer
            .write_record([
                record.name.as_deref().unwrap_or_default(),
                record.website_url.as_deref().unwrap_or_default(),
                record.location.as_deref().unwrap_or_default(),
                record.founded_year.as_deref().unwrap_or_default(),
                services.as_str(),
            ])
            .context("Failed to write CSV record")?;
    }

    writer.flush().context("Failed to flush CSV output")?;
    info!("Saved CSV to {}", path.display());
    Ok(())
}
