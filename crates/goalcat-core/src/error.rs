use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GoalcatError {
    #[error("Invalid lexicon: {} problem(s)\n{}", .problems.len(), ProblemList(.problems))]
    InvalidLexicon { problems: Vec<LexiconProblem> },

    #[error("Failed to build phrase index: {0}")]
    PhraseIndex(#[from] aho_corasick::BuildError),

    #[error("Invalid context rule '{rule}': {reason}")]
    InvalidRule { rule: String, reason: String },

    #[error("Unsupported {document} version: '{version}' (supported: {supported})")]
    UnsupportedVersion {
        document: String,
        version: String,
        supported: String,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unknown config key: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("Invalid value for {key}: '{value}' - {reason}")]
    InvalidConfigValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Home directory not found")]
    HomeNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, GoalcatError>;

impl GoalcatError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidLexicon { .. } | Self::PhraseIndex(_) | Self::InvalidRule { .. } => 2,
            Self::UnsupportedVersion { .. } | Self::Parse { .. } => 3,
            Self::ConfigParse { .. } => 4,
            Self::ConfigKeyNotFound { .. } | Self::InvalidConfigValue { .. } => 5,
            _ => 1,
        }
    }
}

/// A single offending lexicon entry, identified by its position in load order.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexiconProblem {
    #[error("entry #{index}: empty pattern")]
    EmptyPattern { index: usize },

    #[error("entry #{index}: pattern '{pattern}' must be lowercase")]
    NotLowercase { index: usize, pattern: String },

    #[error("entry #{index}: pattern '{pattern}' has confidence {confidence}, expected a value in (0, 1]")]
    ConfidenceOutOfRange {
        index: usize,
        pattern: String,
        confidence: f64,
    },

    #[error("entry #{index}: pattern '{pattern}' names unknown category '{category}'")]
    UnknownCategory {
        index: usize,
        pattern: String,
        category: String,
    },

    #[error("entry #{index}: pattern '{pattern}' names subcategory '{subcategory}', which is not allowed under '{category}'")]
    UnknownSubcategory {
        index: usize,
        pattern: String,
        category: String,
        subcategory: String,
    },
}

struct ProblemList<'a>(&'a [LexiconProblem]);

impl fmt::Display for ProblemList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, problem) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {}", problem)?;
        }
        Ok(())
    }
}
