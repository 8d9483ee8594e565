pub mod classifier;
pub mod config;
pub mod context;
pub mod error;
pub mod lexicon;
pub mod matcher;
pub mod normalize;
pub mod params;
pub mod score;
pub mod select;
pub mod taxonomy;
pub mod timeslot;

pub use classifier::{Classifier, DetectionResult, Explanation};
pub use config::{Config, SourceConfig};
pub use context::{ContextRule, RuleBook, RuleSet};
pub use error::{GoalcatError, LexiconProblem, Result};
pub use lexicon::{Lexicon, LexiconEntry, LexiconStats, RawEntry};
pub use matcher::{KeywordMatch, MatchKind};
pub use params::ScoringParams;
pub use score::CategoryScore;
pub use taxonomy::{Category, Subcategory};
pub use timeslot::TimeSlotRules;

/// Classify with the built-in lexicon, rules and default parameters.
///
/// `Ok(None)` means nothing cleared the confidence floor. An error means the
/// built-in data itself failed to load.
pub fn classify(
    title: &str,
    description: Option<&str>,
    time_slot: Option<&str>,
) -> Result<Option<DetectionResult>> {
    Ok(Classifier::builtin()?.classify(title, description, time_slot))
}
