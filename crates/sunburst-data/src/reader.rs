//! CSV dataset discovery and loading for the sunburst pipeline.
//!
//! Reads catalog export files (inconsistent column naming across datasets)
//! into open JSON rows keyed by header name, and normalizes them under each
//! dataset's category label for downstream aggregation.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde_json::Value;
use sunburst_core::config::DatasetSpec;
use sunburst_core::error::{Result, SunburstError};
use sunburst_core::models::{NormalizedRecord, ValueMode};
use sunburst_core::normalizer::RowNormalizer;
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.csv` files recursively under `data_path`, sorted by path.
pub fn find_csv_files(data_path: &Path) -> Vec<PathBuf> {
    if !data_path.exists() {
        warn!("Data path does not exist: {}", data_path.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "csv")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Read one CSV file into raw rows: one JSON object per record, keyed by the
/// header names.
///
/// Records whose field count differs from the header are skipped with a
/// warning; failing to open or parse the file itself is an error.
pub fn read_raw_rows(path: &Path) -> Result<Vec<Value>> {
    let file = File::open(path).map_err(|source| SunburstError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);
    let headers = reader.headers()?.clone();

    let mut rows: Vec<Value> = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                warn!(
                    "Skipping unreadable record {} in {}: {}",
                    index + 2,
                    path.display(),
                    err
                );
                continue;
            }
        };

        if record.len() != headers.len() {
            warn!(
                "Skipping record {} in {}: {} fields, expected {}",
                index + 2,
                path.display(),
                record.len(),
                headers.len()
            );
            continue;
        }

        let mut row = serde_json::Map::with_capacity(headers.len());
        for (header, field) in headers.iter().zip(record.iter()) {
            row.insert(header.to_string(), Value::String(field.to_string()));
        }
        rows.push(Value::Object(row));
    }

    Ok(rows)
}

/// Load every configured dataset and normalize its rows under the dataset's
/// category label, in the order the datasets are listed.
pub fn load_datasets(
    specs: &[DatasetSpec],
    normalizer: &RowNormalizer<'_>,
    mode: ValueMode,
) -> Result<Vec<NormalizedRecord>> {
    let mut records: Vec<NormalizedRecord> = Vec::new();

    for spec in specs {
        let rows = read_raw_rows(&spec.path)?;
        debug!(
            "Loaded {} rows from {} (category {})",
            rows.len(),
            spec.path.display(),
            spec.category
        );
        records.extend(
            rows.iter()
                .map(|row| normalizer.normalize(row, &spec.category, mode)),
        );
    }

    Ok(records)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
