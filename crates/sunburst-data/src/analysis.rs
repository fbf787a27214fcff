//! Top-level analysis pipeline.
//!
//! Orchestrates loading, normalization, genre expansion, leaf aggregation,
//! hierarchy building and pruning, returning a [`SunburstAnalysis`] ready
//! for a partition layout and its summary displays.

use chrono::Utc;
use serde_json::Value;
use sunburst_core::config::FieldConfig;
use sunburst_core::error::Result;
use sunburst_core::formatting::{format_value, spell_out_billions};
use sunburst_core::models::{HierarchyNode, NormalizedRecord, ValueMode};
use sunburst_core::normalizer::RowNormalizer;
use tracing::debug;

use crate::aggregator::{aggregate_leaf_tuples, expand_genres, expanded_total};
use crate::hierarchy::build_hierarchy;
use crate::reader::load_datasets;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    /// Measure family extracted from the rows.
    pub value_mode: ValueMode,
    /// Whether multi-genre records were expanded into one record per genre.
    pub split_multi_genres: bool,
    /// Number of raw rows normalized.
    pub rows_processed: usize,
    /// Number of records after genre expansion.
    pub records_expanded: usize,
    /// Number of surviving (positive-sum) leaf groups.
    pub groups_aggregated: usize,
    /// Wall-clock seconds spent loading and normalizing the datasets
    /// (zero when the caller supplied rows directly).
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent expanding, aggregating and building the tree.
    pub transform_time_seconds: f64,
}

/// The complete output of one aggregation pass.
#[derive(Debug, Clone)]
pub struct SunburstAnalysis {
    /// The pruned hierarchy, rooted at `"root"`.
    pub root: HierarchyNode,
    /// Grand total over the expanded records, before non-positive groups are
    /// dropped. Under split mode this intentionally counts multi-genre
    /// records once per genre.
    pub expanded_total: f64,
    /// The root's effective value: the total surviving in the tree.
    pub aggregated_total: f64,
    /// Metadata about this pass.
    pub metadata: AnalysisMetadata,
}

impl SunburstAnalysis {
    /// Prose total line for summary displays, e.g.
    /// `"Total data: 1.23 billion hours"` or `"Total data: 98.5M streams"`.
    pub fn summary_line(&self) -> String {
        format!(
            "Total data: {} {}",
            spell_out_billions(&format_value(self.expanded_total)),
            self.metadata.value_mode.measure_noun()
        )
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the aggregation pipeline over caller-supplied raw rows.
///
/// `datasets` pairs each category label with the raw rows it contributes.
/// The configuration is validated up front; an unusable configuration is the
/// only error this path can produce.
pub fn analyze_rows(
    datasets: &[(String, Vec<Value>)],
    config: &FieldConfig,
    mode: ValueMode,
    split: bool,
) -> Result<SunburstAnalysis> {
    config.validate()?;

    let normalizer = RowNormalizer::new(config);
    let records: Vec<NormalizedRecord> = datasets
        .iter()
        .flat_map(|(category, rows)| {
            rows.iter()
                .map(|row| normalizer.normalize(row, category, mode))
        })
        .collect();

    Ok(assemble(records, mode, split, 0.0))
}

/// Run the full pipeline over the datasets configured in `config`.
///
/// 1. Read and normalize every configured CSV dataset.
/// 2. Expand multi-genre records when `split` is set.
/// 3. Aggregate leaf tuples and drop non-positive groups.
/// 4. Build and prune the hierarchy.
pub fn analyze_catalog(
    config: &FieldConfig,
    mode: ValueMode,
    split: bool,
) -> Result<SunburstAnalysis> {
    config.validate()?;

    let load_start = std::time::Instant::now();
    let normalizer = RowNormalizer::new(config);
    let records = load_datasets(&config.datasets, &normalizer, mode)?;
    let load_time_seconds = load_start.elapsed().as_secs_f64();

    debug!(
        "Normalized {} records from {} datasets in {:.3}s",
        records.len(),
        config.datasets.len(),
        load_time_seconds
    );

    Ok(assemble(records, mode, split, load_time_seconds))
}

// ── Private ───────────────────────────────────────────────────────────────────

/// Shared back half of the pipeline: expansion, aggregation, tree building.
fn assemble(
    records: Vec<NormalizedRecord>,
    mode: ValueMode,
    split: bool,
    load_time_seconds: f64,
) -> SunburstAnalysis {
    let transform_start = std::time::Instant::now();

    let expanded = expand_genres(&records, split);
    let expanded_total = expanded_total(&expanded);
    let groups = aggregate_leaf_tuples(&expanded);
    let root = build_hierarchy(&groups);
    let aggregated_total = root.effective_value();

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        value_mode: mode,
        split_multi_genres: split,
        rows_processed: records.len(),
        records_expanded: expanded.len(),
        groups_aggregated: groups.len(),
        load_time_seconds,
        transform_time_seconds: transform_start.elapsed().as_secs_f64(),
    };

    debug!(
        "Aggregated {} groups from {} expanded records (total {})",
        metadata.groups_aggregated, metadata.records_expanded, expanded_total
    );

    SunburstAnalysis {
        root,
        expanded_total,
        aggregated_total,
        metadata,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
