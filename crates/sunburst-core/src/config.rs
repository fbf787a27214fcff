use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, SunburstError};
use crate::models::ValueMode;

// ── DatasetSpec ────────────────────────────────────────────────────────────────

/// One CSV file to load and the category label its rows contribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    /// Path to the CSV file.
    pub path: PathBuf,
    /// Category label applied to every row of the file, e.g. `"Movie"`.
    pub category: String,
}

impl DatasetSpec {
    pub fn new(path: impl Into<PathBuf>, category: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            category: category.into(),
        }
    }
}

// ── LanguageRule ───────────────────────────────────────────────────────────────

/// One entry of the title-based language inference table.
///
/// Rules are evaluated in table order and the first matching keyword wins.
/// Single-token keywords match whole words of the lower-cased title;
/// keywords containing whitespace match as substrings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageRule {
    /// Language label assigned on a match, e.g. `"Spanish"`.
    pub language: String,
    /// Lower-case keywords that trigger this rule.
    pub keywords: Vec<String>,
}

impl LanguageRule {
    fn new(language: &str, keywords: &[&str]) -> Self {
        Self {
            language: language.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

// ── ValueFieldSets ─────────────────────────────────────────────────────────────

/// Ordered candidate column names for each measure family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueFieldSets {
    /// Columns holding total watch time.
    pub hours: Vec<String>,
    /// Columns holding view counts.
    pub views: Vec<String>,
}

// ── FieldConfig ────────────────────────────────────────────────────────────────

/// Field-mapping and inference tables driving row normalization.
///
/// The defaults mirror the column names and alias tables of the Netflix
/// engagement datasets the pipeline was built around; consumers with other
/// datasets supply their own tables (or load them from JSON via
/// [`FieldConfig::load_from`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Value column candidates per [`ValueMode`].
    pub value_fields: ValueFieldSets,
    /// Explicit language columns, in priority order.
    pub language_fields: Vec<String>,
    /// Genre columns, in priority order.
    pub genre_fields: Vec<String>,
    /// Title columns scanned for language inference, in priority order.
    pub title_fields: Vec<String>,
    /// Lower-cased cleaned genre text → canonical genre label.
    pub genre_aliases: HashMap<String, String>,
    /// Ordered title-keyword inference table.
    pub language_rules: Vec<LanguageRule>,
    /// CSV datasets to load, with their category labels.
    pub datasets: Vec<DatasetSpec>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        let genre_aliases = [
            "sci-fi",
            "sci fi",
            "scifi",
            "science",
            "fiction",
            "science fiction",
            "science-fiction",
        ]
        .iter()
        .map(|variant| (variant.to_string(), "sci-fi".to_string()))
        .collect();

        Self {
            value_fields: ValueFieldSets {
                hours: [
                    "Watch Time",
                    "watch_time",
                    "WatchTime",
                    "Hours Viewed",
                    "hours_viewed",
                    "HoursViewed",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
                views: ["View Count", "view_count", "ViewCount", "Views", "views"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            },
            language_fields: ["originalLanguage", "language", "Language"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            genre_fields: ["genres", "Genres"].iter().map(|s| s.to_string()).collect(),
            title_fields: ["title", "Title", "name", "Name"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            genre_aliases,
            language_rules: vec![
                LanguageRule::new("Spanish", &["spanish", "español", "el", "la"]),
                LanguageRule::new("French", &["french", "français", "le"]),
                LanguageRule::new("German", &["german", "deutsch"]),
                LanguageRule::new("Korean", &["korean"]),
                LanguageRule::new("Japanese", &["japanese"]),
                LanguageRule::new("Chinese", &["chinese"]),
                LanguageRule::new("Italian", &["italian"]),
                LanguageRule::new("Portuguese", &["portuguese", "português"]),
                LanguageRule::new("Hindi", &["hindi"]),
                LanguageRule::new("Russian", &["russian"]),
                LanguageRule::new("Arabic", &["arabic"]),
            ],
            datasets: Vec::new(),
        }
    }
}

impl FieldConfig {
    /// Load a configuration from a JSON file.
    ///
    /// Missing keys fall back to their defaults (`#[serde(default)]`);
    /// unreadable files and malformed JSON are errors.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SunburstError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// The value column candidates for `mode`.
    pub fn candidates_for(&self, mode: ValueMode) -> &[String] {
        match mode {
            ValueMode::Hours => &self.value_fields.hours,
            ValueMode::Views => &self.value_fields.views,
        }
    }

    /// Fail fast on a configuration that cannot drive a pass.
    ///
    /// Every candidate list the normalizer consults must name at least one
    /// column, and every language rule must carry at least one keyword.
    pub fn validate(&self) -> Result<()> {
        if self.value_fields.hours.is_empty() {
            return Err(SunburstError::Config(
                "value_fields.hours must list at least one column".to_string(),
            ));
        }
        if self.value_fields.views.is_empty() {
            return Err(SunburstError::Config(
                "value_fields.views must list at least one column".to_string(),
            ));
        }
        if self.language_fields.is_empty() {
            return Err(SunburstError::Config(
                "language_fields must list at least one column".to_string(),
            ));
        }
        if self.genre_fields.is_empty() {
            return Err(SunburstError::Config(
                "genre_fields must list at least one column".to_string(),
            ));
        }
        if self.title_fields.is_empty() {
            return Err(SunburstError::Config(
                "title_fields must list at least one column".to_string(),
            ));
        }
        for rule in &self.language_rules {
            if rule.keywords.is_empty() {
                return Err(SunburstError::Config(format!(
                    "language rule for \"{}\" has no keywords",
                    rule.language
                )));
            }
        }
        for spec in &self.datasets {
            if spec.category.trim().is_empty() {
                return Err(SunburstError::Config(format!(
                    "dataset {} has an empty category label",
                    spec.path.display()
                )));
            }
        }
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn test_default_value_fields() {
        let config = FieldConfig::default();
        assert_eq!(config.value_fields.hours[0], "Watch Time");
        assert_eq!(config.value_fields.views[0], "View Count");
        assert!(config.value_fields.hours.contains(&"Hours Viewed".to_string()));
    }

    #[test]
    fn test_default_language_field_priority() {
        let config = FieldConfig::default();
        assert_eq!(
            config.language_fields,
            vec!["originalLanguage", "language", "Language"]
        );
    }

    #[test]
    fn test_default_genre_aliases_canonicalize_scifi_family() {
        let config = FieldConfig::default();
        for variant in ["sci fi", "scifi", "science fiction", "science-fiction"] {
            assert_eq!(
                config.genre_aliases.get(variant),
                Some(&"sci-fi".to_string()),
                "variant {variant:?} must map to sci-fi"
            );
        }
    }

    #[test]
    fn test_default_language_rules_start_with_spanish() {
        let config = FieldConfig::default();
        assert_eq!(config.language_rules[0].language, "Spanish");
        assert!(config.language_rules[0]
            .keywords
            .contains(&"spanish".to_string()));
    }

    #[test]
    fn test_default_validates() {
        assert!(FieldConfig::default().validate().is_ok());
    }

    // ── Serde round trip ──────────────────────────────────────────────────────

    #[test]
    fn test_config_json_round_trip() {
        let mut config = FieldConfig::default();
        config
            .datasets
            .push(DatasetSpec::new("data/movies.csv", "Movie"));
        let json = serde_json::to_string(&config).unwrap();
        let back: FieldConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: FieldConfig =
            serde_json::from_str(r#"{"genre_fields": ["Genre"]}"#).unwrap();
        assert_eq!(config.genre_fields, vec!["Genre"]);
        // Untouched sections keep their defaults.
        assert_eq!(config.language_fields, FieldConfig::default().language_fields);
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{"language_fields": ["lang"]}"#).expect("write");

        let config = FieldConfig::load_from(&path).expect("load");
        assert_eq!(config.language_fields, vec!["lang"]);
    }

    #[test]
    fn test_load_from_missing_file_errors() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let err = FieldConfig::load_from(&tmp.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read dataset"));
    }

    // ── validate ──────────────────────────────────────────────────────────────

    #[test]
    fn test_validate_rejects_empty_hours_candidates() {
        let mut config = FieldConfig::default();
        config.value_fields.hours.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("value_fields.hours"));
    }

    #[test]
    fn test_validate_rejects_empty_genre_fields() {
        let mut config = FieldConfig::default();
        config.genre_fields.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_keywordless_rule() {
        let mut config = FieldConfig::default();
        config.language_rules.push(LanguageRule {
            language: "Esperanto".to_string(),
            keywords: vec![],
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Esperanto"));
    }

    #[test]
    fn test_validate_rejects_blank_dataset_category() {
        let mut config = FieldConfig::default();
        config.datasets.push(DatasetSpec::new("data/x.csv", "  "));
        assert!(config.validate().is_err());
    }

    // ── candidates_for ────────────────────────────────────────────────────────

    #[test]
    fn test_candidates_for_selects_mode_family() {
        let config = FieldConfig::default();
        assert_eq!(config.candidates_for(ValueMode::Hours)[0], "Watch Time");
        assert_eq!(config.candidates_for(ValueMode::Views)[0], "View Count");
    }
}
