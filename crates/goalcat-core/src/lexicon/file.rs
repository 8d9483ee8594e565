//! Versioned lexicon file format
//!
//! ```toml
//! version = "1"
//!
//! [[group]]
//! category = "shopping"
//! subcategory = "necessities"
//! patterns = [
//!     ["boodschappen doen", 0.8],
//!     ["boodschappen", 0.7],
//! ]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GoalcatError, Result};

use super::{Lexicon, RawEntry};

/// Lexicon shipped with the crate
pub const BUILTIN_LEXICON: &str = include_str!("../../data/lexicon.toml");

/// Lexicon file versions this build understands
pub const SUPPORTED_LEXICON_VERSIONS: &[&str] = &["1"];

/// On-disk lexicon document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconFile {
    pub version: String,
    #[serde(default, rename = "group")]
    pub groups: Vec<EntryGroup>,
}

/// Patterns sharing one category/subcategory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryGroup {
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// `[pattern, confidence]` pairs in declaration order
    #[serde(default)]
    pub patterns: Vec<(String, f64)>,
}

impl LexiconFile {
    pub fn parse(content: &str) -> Result<Self> {
        let file: LexiconFile = toml::from_str(content)?;
        if !SUPPORTED_LEXICON_VERSIONS.contains(&file.version.as_str()) {
            return Err(GoalcatError::UnsupportedVersion {
                document: "lexicon".to_string(),
                version: file.version,
                supported: SUPPORTED_LEXICON_VERSIONS.join(", "),
            });
        }
        Ok(file)
    }

    /// Flatten groups into records, preserving declaration order
    pub fn records(&self) -> Vec<RawEntry> {
        self.groups
            .iter()
            .flat_map(|group| {
                group.patterns.iter().map(move |(pattern, confidence)| RawEntry {
                    pattern: pattern.clone(),
                    category: group.category.clone(),
                    subcategory: group.subcategory.clone(),
                    confidence: *confidence,
                })
            })
            .collect()
    }

    pub fn into_lexicon(self) -> Result<Lexicon> {
        let records = self.records();
        Lexicon::build(Some(self.version), records)
    }
}

impl Lexicon {
    /// Parse and validate a TOML lexicon document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        LexiconFile::parse(content)?.into_lexicon()
    }

    /// Load a lexicon file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let file = LexiconFile::parse(&content).map_err(|e| match e {
            GoalcatError::TomlDe(e) => GoalcatError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
            other => other,
        })?;
        file.into_lexicon()
    }

    /// Parse the lexicon embedded in the crate
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_LEXICON)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = r#"
version = "1"

[[group]]
category = "health"
subcategory = "sport"
patterns = [["sportschool", 0.9], ["naar de gym", 0.9]]

[[group]]
category = "other"
patterns = [["iets", 0.5]]
"#;

    #[test]
    fn test_records_flatten_in_order() {
        let file = LexiconFile::parse(SAMPLE).unwrap();
        let records = file.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].pattern, "sportschool");
        assert_eq!(records[1].subcategory.as_deref(), Some("sport"));
        assert_eq!(records[2].subcategory, None);
    }

    #[test]
    fn test_unsupported_version() {
        let err = LexiconFile::parse("version = \"9\"").unwrap_err();
        assert!(matches!(err, GoalcatError::UnsupportedVersion { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let lexicon = Lexicon::load(file.path()).unwrap();
        assert_eq!(lexicon.version(), Some("1"));
        assert_eq!(lexicon.len(), 3);
    }

    #[test]
    fn test_load_reports_path_on_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"version = ").unwrap();

        let err = Lexicon::load(file.path()).unwrap_err();
        assert!(matches!(err, GoalcatError::Parse { .. }));
    }

    #[test]
    fn test_builtin_lexicon_is_valid() {
        let lexicon = Lexicon::builtin().unwrap();
        assert!(lexicon.len() > 100);
        assert!(lexicon.phrases().count() > 10);
        assert!(!lexicon.words("sportschool").is_empty());
    }
}
