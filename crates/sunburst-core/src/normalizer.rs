use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::config::FieldConfig;
use crate::models::{NormalizedRecord, ValueMode};

/// Language assigned when a title contains non-ASCII text but no keyword
/// rule matches.
pub const NON_ENGLISH: &str = "Non-English";

/// Language assigned when every other resolution step comes up empty.
pub const DEFAULT_LANGUAGE: &str = "English";

/// Sentinel genre for rows with no usable genre data.
pub const UNSPECIFIED_GENRE: &str = "Unspecified";

// ── RowNormalizer ─────────────────────────────────────────────────────────────

/// Converts one raw heterogeneous row into a [`NormalizedRecord`].
///
/// Pure with respect to its inputs: the same `(row, category, mode)` against
/// the same configuration always yields the same record. Malformed or
/// missing fields never error; they resolve to the documented defaults.
pub struct RowNormalizer<'a> {
    config: &'a FieldConfig,
    numeric: Regex,
    punctuation: Regex,
    genre_delimiter: Regex,
}

impl<'a> RowNormalizer<'a> {
    pub fn new(config: &'a FieldConfig) -> Self {
        Self {
            config,
            // Digits with at most one decimal point, after separator strip.
            numeric: Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("regex is valid"),
            punctuation: Regex::new(r"[().,;!?']").expect("regex is valid"),
            genre_delimiter: Regex::new(r"\s*[,|/;]\s*").expect("regex is valid"),
        }
    }

    /// Normalize `row` under the caller-supplied `category` label, extracting
    /// the measure selected by `mode`.
    pub fn normalize(&self, row: &Value, category: &str, mode: ValueMode) -> NormalizedRecord {
        let language = self.resolve_language(row);
        let genres = self.resolve_genres(row);
        let primary_genre = genres[0].clone();
        let value = self.resolve_value(row, mode);

        NormalizedRecord {
            category: category.to_string(),
            language,
            genres,
            primary_genre,
            value,
        }
    }

    // ── Language ──────────────────────────────────────────────────────────────

    /// Resolution order: explicit language columns (config priority), title
    /// keyword inference, non-ASCII heuristic, fixed default.
    fn resolve_language(&self, row: &Value) -> String {
        if let Some(lang) = Self::find_str(row, &self.config.language_fields) {
            return lang.to_string();
        }

        if let Some(title) = Self::find_str(row, &self.config.title_fields) {
            if let Some(lang) = self.infer_from_title(title) {
                return lang;
            }
            if title.chars().any(|c| !c.is_ascii()) {
                return NON_ENGLISH.to_string();
            }
        }

        DEFAULT_LANGUAGE.to_string()
    }

    /// Scan the title against the configured keyword rules, in table order.
    ///
    /// Single-token keywords match whole words of the lower-cased title;
    /// keywords with embedded whitespace match as substrings.
    fn infer_from_title(&self, title: &str) -> Option<String> {
        let lowered = title.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        for rule in &self.config.language_rules {
            for keyword in &rule.keywords {
                let matched = if keyword.contains(char::is_whitespace) {
                    lowered.contains(keyword.as_str())
                } else {
                    words.iter().any(|&w| w == keyword.as_str())
                };
                if matched {
                    return Some(rule.language.clone());
                }
            }
        }
        None
    }

    // ── Genres ────────────────────────────────────────────────────────────────

    /// Split, clean and canonicalize the first populated genre column.
    ///
    /// Always returns at least one element; rows with no usable genre data
    /// get the [`UNSPECIFIED_GENRE`] sentinel.
    fn resolve_genres(&self, row: &Value) -> Vec<String> {
        let raw = Self::find_str(row, &self.config.genre_fields).unwrap_or(UNSPECIFIED_GENRE);

        let mut genres = Vec::new();
        for piece in self.genre_delimiter.split(raw) {
            let cleaned = self.punctuation.replace_all(piece, "");
            let cleaned = cleaned.trim();
            if cleaned.is_empty() {
                continue;
            }
            let canonical = self
                .config
                .genre_aliases
                .get(&cleaned.to_lowercase())
                .cloned()
                .unwrap_or_else(|| cleaned.to_string());
            genres.push(canonical);
        }

        if genres.is_empty() {
            genres.push(UNSPECIFIED_GENRE.to_string());
        }
        genres
    }

    // ── Value ─────────────────────────────────────────────────────────────────

    /// Extract the measure for `mode` from the first *present* candidate
    /// column. Presence wins over content: an empty cell in an earlier
    /// candidate shadows a populated later one and parses to zero.
    fn resolve_value(&self, row: &Value, mode: ValueMode) -> f64 {
        let raw = Self::find_present(row, self.config.candidates_for(mode));
        self.parse_number(raw)
    }

    /// Strict numeric parse: strip thousands separators, trim, then require
    /// digits with at most one decimal point. Anything else is zero.
    fn parse_number(&self, raw: Option<&Value>) -> f64 {
        let Some(raw) = raw else { return 0.0 };
        let text = match raw {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return 0.0,
        };

        let stripped = text.replace(',', "");
        let stripped = stripped.trim();
        if !self.numeric.is_match(stripped) {
            if !stripped.is_empty() {
                warn!("discarding non-numeric value \"{}\"", text);
            }
            return 0.0;
        }
        stripped.parse::<f64>().unwrap_or(0.0)
    }

    // ── Field lookup ──────────────────────────────────────────────────────────

    /// First candidate field holding a non-empty trimmed string.
    fn find_str<'v>(row: &'v Value, candidates: &[String]) -> Option<&'v str> {
        for field in candidates {
            if let Some(s) = row.get(field).and_then(|v| v.as_str()) {
                let trimmed = s.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed);
                }
            }
        }
        None
    }

    /// First candidate field that exists at all, regardless of content.
    fn find_present<'v>(row: &'v Value, candidates: &[String]) -> Option<&'v Value> {
        candidates.iter().find_map(|field| row.get(field))
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
