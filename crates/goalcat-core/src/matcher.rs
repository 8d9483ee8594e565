//! Phrase and word matching.
//!
//! Phrases run first so that a word already covered by a longer phrase is not
//! counted a second time by the word pass.

use serde::Serialize;

use crate::lexicon::{Lexicon, LexiconEntry};
use crate::normalize::{clean_token, Normalized};
use crate::params::ScoringParams;
use crate::score::ScoreBoard;
use crate::taxonomy::{Category, Subcategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Phrase,
    Word,
}

/// One scored keyword hit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordMatch {
    pub pattern: String,
    pub kind: MatchKind,
    pub category: Category,
    pub subcategory: Option<Subcategory>,
    pub points: f64,
}

/// The matched set of a single classification
#[derive(Debug, Clone, Default)]
pub struct Matches {
    /// Matched phrases and tokens, each word cleaned like an input token
    covered: Vec<String>,
    records: Vec<KeywordMatch>,
}

impl Matches {
    pub fn is_empty(&self) -> bool {
        self.covered.is_empty()
    }

    pub fn covered(&self) -> &[String] {
        &self.covered
    }

    pub fn records(&self) -> &[KeywordMatch] {
        &self.records
    }

    pub fn into_records(self) -> Vec<KeywordMatch> {
        self.records
    }

    /// Whether `token` is a substring of anything already matched
    pub fn covers(&self, token: &str) -> bool {
        self.covered.iter().any(|t| t.contains(token))
    }

    /// Whether any word of any matched text satisfies `pred`
    pub fn any_word(&self, pred: impl FnMut(&str) -> bool) -> bool {
        self.covered.iter().flat_map(|t| t.split(' ')).any(pred)
    }

    fn cover(&mut self, text: String) {
        if !self.covered.contains(&text) {
            self.covered.push(text);
        }
    }

    fn record(&mut self, entry: &LexiconEntry, kind: MatchKind, points: f64) {
        self.records.push(KeywordMatch {
            pattern: entry.pattern.clone(),
            kind,
            category: entry.category,
            subcategory: entry.subcategory,
            points,
        });
    }
}

/// Score every lexicon phrase contained in the blob, longest first.
pub fn match_phrases(
    lexicon: &Lexicon,
    input: &Normalized,
    params: &ScoringParams,
    board: &mut ScoreBoard,
    matches: &mut Matches,
) {
    for entry in lexicon.phrases_in(&input.blob) {
        let points = entry.confidence + params.phrase_bonus * (entry.word_count() - 1) as f64;
        board.add(entry.category, entry.subcategory, points);
        matches.record(entry, MatchKind::Phrase, points);

        let cleaned: Vec<String> = entry.pattern.split(' ').map(clean_token).collect();
        matches.cover(cleaned.join(" "));
    }
}

/// Score single-word entries for tokens not covered by an earlier match.
pub fn match_words(
    lexicon: &Lexicon,
    input: &Normalized,
    board: &mut ScoreBoard,
    matches: &mut Matches,
) {
    for token in &input.tokens {
        if matches.covers(token) {
            continue;
        }

        let mut hit = false;
        for entry in lexicon.word_entries(token) {
            board.add(entry.category, entry.subcategory, entry.confidence);
            matches.record(entry, MatchKind::Word, entry.confidence);
            hit = true;
        }
        if hit {
            matches.cover(token.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::RawEntry;
    use crate::normalize::normalize;

    fn lexicon() -> Lexicon {
        Lexicon::from_entries(vec![
            RawEntry::new("boodschappen doen", "shopping", Some("necessities"), 0.8),
            RawEntry::new("boodschappen", "shopping", Some("necessities"), 0.7),
            RawEntry::new("naar de sportschool gaan", "health", Some("sport"), 0.9),
            RawEntry::new("sportschool", "health", Some("sport"), 0.9),
            RawEntry::new("training", "health", None, 0.5),
            RawEntry::new("training", "productivity", None, 0.4),
            RawEntry::new("e-mails beantwoorden", "productivity", Some("work"), 0.9),
            RawEntry::new("e-mails", "productivity", Some("work"), 0.7),
        ])
        .unwrap()
    }

    fn run(title: &str) -> (ScoreBoard, Matches) {
        let lexicon = lexicon();
        let input = normalize(title, None, None);
        let mut board = ScoreBoard::new();
        let mut matches = Matches::default();
        match_phrases(&lexicon, &input, &ScoringParams::default(), &mut board, &mut matches);
        match_words(&lexicon, &input, &mut board, &mut matches);
        (board, matches)
    }

    #[test]
    fn test_phrase_bonus_scales_with_word_count() {
        let (board, matches) = run("Naar de sportschool gaan");
        // 0.9 + 0.3 * 3
        assert!((board.score(Category::Health) - 1.8).abs() < 1e-9);
        assert_eq!(matches.records().len(), 1);
        assert_eq!(matches.records()[0].kind, MatchKind::Phrase);
    }

    #[test]
    fn test_phrase_words_are_not_counted_again() {
        let (board, matches) = run("boodschappen doen");
        assert!((board.score(Category::Shopping) - 1.1).abs() < 1e-9);
        assert_eq!(matches.covered(), &["boodschappen doen".to_string()]);
    }

    #[test]
    fn test_single_word_match() {
        let (board, matches) = run("boodschappen");
        assert!((board.score(Category::Shopping) - 0.7).abs() < 1e-9);
        assert_eq!(matches.records()[0].kind, MatchKind::Word);
    }

    #[test]
    fn test_repeated_token_scores_once() {
        let (board, _) = run("sportschool sportschool");
        assert!((board.score(Category::Health) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_word_in_several_categories_scores_each() {
        let (board, matches) = run("training");
        assert_eq!(board.score(Category::Health), 0.5);
        assert_eq!(board.score(Category::Productivity), 0.4);
        assert_eq!(matches.records().len(), 2);
        assert_eq!(matches.covered().len(), 1);
    }

    #[test]
    fn test_any_word_looks_inside_phrases() {
        let (_, matches) = run("boodschappen doen");
        assert!(matches.any_word(|w| w == "doen"));
        assert!(!matches.any_word(|w| w == "training"));
    }

    #[test]
    fn test_punctuated_phrase_covers_its_words() {
        let (board, matches) = run("E-mails beantwoorden");
        // 0.9 + 0.3, no extra 0.7 for the "emails" token
        assert!((board.score(Category::Productivity) - 1.2).abs() < 1e-9);
        assert_eq!(matches.records().len(), 1);
        assert_eq!(matches.covered(), &["emails beantwoorden".to_string()]);
        assert!(matches.covers("emails"));
    }

    #[test]
    fn test_punctuated_word_alone_still_matches() {
        let (board, matches) = run("E-mails");
        assert!((board.score(Category::Productivity) - 0.7).abs() < 1e-9);
        assert_eq!(matches.records()[0].kind, MatchKind::Word);
    }

    #[test]
    fn test_no_match() {
        let (_, matches) = run("xyz");
        assert!(matches.is_empty());
    }
}
