//! Genre expansion and leaf-tuple aggregation.

use std::collections::BTreeMap;

use sunburst_core::models::{LeafKey, NormalizedRecord};

/// Expand multi-genre records into one observation per genre.
///
/// With `split` disabled, each record passes through unchanged (its primary
/// genre is already its first genre). With `split` enabled, each record is
/// cloned once per genre with `primary_genre` pinned to that genre — and the
/// FULL value is carried by every clone. The double counting across genres
/// is the intended policy: the measure answers "how much attention touched
/// this genre", not "how does total value partition across genres", so the
/// split-mode grand total is deliberately larger than the non-split one.
pub fn expand_genres(records: &[NormalizedRecord], split: bool) -> Vec<NormalizedRecord> {
    if !split {
        return records.to_vec();
    }

    records
        .iter()
        .flat_map(|record| {
            record.genres.iter().map(|genre| {
                let mut expanded = record.clone();
                expanded.primary_genre = genre.clone();
                expanded
            })
        })
        .collect()
}

/// Group records by (category, primary genre, language) and sum their values,
/// then drop every group whose sum is not positive.
///
/// The drop is unconditional: it covers naturally-zero groups, and acts as a
/// safety net against negative sums even though normalization already clamps
/// values at zero. `BTreeMap` keeps iteration deterministic in key order.
pub fn aggregate_leaf_tuples(records: &[NormalizedRecord]) -> BTreeMap<LeafKey, f64> {
    let mut groups: BTreeMap<LeafKey, f64> = BTreeMap::new();

    for record in records {
        *groups.entry(LeafKey::from_record(record)).or_insert(0.0) += record.value;
    }

    groups.retain(|_, sum| *sum > 0.0);
    groups
}

/// Grand total over a set of (expanded) records, before any group is dropped.
pub fn expanded_total(records: &[NormalizedRecord]) -> f64 {
    records.iter().map(|r| r.value).sum()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
