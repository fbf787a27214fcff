use serde::{Deserialize, Serialize};
use std::fmt;

/// Selects which measure family a pass extracts from the raw rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueMode {
    /// Total time viewers spent watching a title.
    Hours,
    /// Number of times a title was started.
    Views,
}

impl ValueMode {
    /// Lowercase wire name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueMode::Hours => "hours",
            ValueMode::Views => "views",
        }
    }

    /// Noun used in summary lines ("... hours" / "... streams").
    pub fn measure_noun(&self) -> &'static str {
        match self {
            ValueMode::Hours => "hours",
            ValueMode::Views => "streams",
        }
    }
}

/// A raw catalog row after normalization into the canonical schema.
///
/// Produced by [`crate::normalizer::RowNormalizer::normalize`]; the genre
/// expansion step re-uses the same shape with `primary_genre` pinned to one
/// specific entry of `genres`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Caller-supplied source label, e.g. `"Movie"` or `"TV"`.
    pub category: String,
    /// Resolved language label; never empty.
    pub language: String,
    /// Cleaned, canonicalized genre labels in source order; never empty.
    pub genres: Vec<String>,
    /// The single genre this record is attributed to for aggregation.
    pub primary_genre: String,
    /// Non-negative numeric measure for the active [`ValueMode`].
    pub value: f64,
}

/// The composite aggregation key: (category, genre, language).
///
/// Field order matters: derived `Ord` compares category first, then genre,
/// then language, so a `BTreeMap<LeafKey, f64>` iterates groups in exactly
/// that order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LeafKey {
    pub category: String,
    pub genre: String,
    pub language: String,
}

impl LeafKey {
    pub fn new(
        category: impl Into<String>,
        genre: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            genre: genre.into(),
            language: language.into(),
        }
    }

    /// Build the key for a record from its category, primary genre and
    /// language.
    pub fn from_record(record: &NormalizedRecord) -> Self {
        Self {
            category: record.category.clone(),
            genre: record.primary_genre.clone(),
            language: record.language.clone(),
        }
    }

    /// The key components in hierarchy order (category → genre → language).
    pub fn path(&self) -> [&str; 3] {
        [&self.category, &self.genre, &self.language]
    }
}

impl fmt::Display for LeafKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.category, self.genre, self.language)
    }
}

/// A node in the aggregation tree consumed by radial partition layouts.
///
/// Serializes to the `{"name": ..., "children": [...], "value": ...}` shape,
/// with `children` omitted when empty and `value` omitted when absent, so the
/// output can be handed to a layout engine unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    /// Label of this node (a category, genre or language — or `"root"`).
    pub name: String,
    /// Child nodes, unique by name, in insertion order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,
    /// Accumulated value; present only at leaf depth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl HierarchyNode {
    /// Reserved name of the synthetic root node.
    pub const ROOT_NAME: &'static str = "root";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            value: None,
        }
    }

    /// A fresh, empty root node.
    pub fn root() -> Self {
        Self::new(Self::ROOT_NAME)
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Immutable lookup of a direct child by name.
    pub fn find_child(&self, name: &str) -> Option<&HierarchyNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Find the direct child named `name`, creating and appending it when
    /// absent. Linear search-or-create; fine at this data scale.
    pub fn child_entry(&mut self, name: &str) -> &mut HierarchyNode {
        let idx = match self.children.iter().position(|c| c.name == name) {
            Some(idx) => idx,
            None => {
                self.children.push(HierarchyNode::new(name));
                self.children.len() - 1
            }
        };
        &mut self.children[idx]
    }

    /// Add `amount` into this node's accumulated value.
    pub fn add_value(&mut self, amount: f64) {
        *self.value.get_or_insert(0.0) += amount;
    }

    /// The node's own value if set, otherwise the sum of its children's
    /// effective values. For the root this is the aggregated grand total.
    pub fn effective_value(&self) -> f64 {
        match self.value {
            Some(v) => v,
            None => self.children.iter().map(|c| c.effective_value()).sum(),
        }
    }

    /// Number of leaves reachable from this node (1 for a leaf).
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(|c| c.leaf_count()).sum()
        }
    }

    /// This node's share of `total`, as a percentage rounded to one decimal
    /// (the precision used by center-label and breadcrumb displays).
    pub fn share_of(&self, total: f64) -> f64 {
        crate::formatting::percentage(self.effective_value(), total, 1)
    }
}
