//! Lexicon entry types

use serde::{Deserialize, Serialize};

use crate::error::LexiconProblem;
use crate::normalize::clean_token;
use crate::taxonomy::{Category, Subcategory};

/// 未検証のレコード（設定データそのまま）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    pub pattern: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub confidence: f64,
}

impl RawEntry {
    pub fn new(pattern: &str, category: &str, subcategory: Option<&str>, confidence: f64) -> Self {
        Self {
            pattern: pattern.to_string(),
            category: category.to_string(),
            subcategory: subcategory.map(str::to_string),
            confidence,
        }
    }

    /// `index` はロード順の位置（エラー報告用）
    pub(crate) fn validate(self, index: usize) -> Result<LexiconEntry, LexiconProblem> {
        let pattern = self.pattern.split_whitespace().collect::<Vec<_>>().join(" ");

        if pattern.is_empty() || (!pattern.contains(' ') && clean_token(&pattern).is_empty()) {
            return Err(LexiconProblem::EmptyPattern { index });
        }
        if pattern != pattern.to_lowercase() {
            return Err(LexiconProblem::NotLowercase { index, pattern });
        }
        if !(self.confidence > 0.0 && self.confidence <= 1.0) {
            return Err(LexiconProblem::ConfidenceOutOfRange {
                index,
                pattern,
                confidence: self.confidence,
            });
        }

        let category: Category = match self.category.parse() {
            Ok(category) => category,
            Err(_) => {
                return Err(LexiconProblem::UnknownCategory {
                    index,
                    pattern,
                    category: self.category,
                })
            }
        };

        let subcategory = match self.subcategory {
            None => None,
            Some(name) => match category.subcategory(&name) {
                Some(sub) => Some(sub),
                None => {
                    return Err(LexiconProblem::UnknownSubcategory {
                        index,
                        pattern,
                        category: self.category,
                        subcategory: name,
                    })
                }
            },
        };

        Ok(LexiconEntry {
            pattern,
            category,
            subcategory,
            confidence: self.confidence,
        })
    }
}

/// 検証済みエントリ
#[derive(Debug, Clone, PartialEq)]
pub struct LexiconEntry {
    /// 小文字・空白正規化済みのパターン
    pub pattern: String,
    pub category: Category,
    pub subcategory: Option<Subcategory>,
    /// (0, 1]
    pub confidence: f64,
}

impl LexiconEntry {
    /// 空白を含むパターンはフレーズ
    pub fn is_phrase(&self) -> bool {
        self.pattern.contains(' ')
    }

    pub fn word_count(&self) -> usize {
        self.pattern.split(' ').count()
    }

    /// 索引と重複判定に使うキー
    ///
    /// 単語は入力トークンと同じく記号を除去する（"to-do" と "todo" は同じキー）。
    /// フレーズは部分文字列で照合するのでそのまま。
    pub(crate) fn lookup_key(&self) -> String {
        if self.is_phrase() {
            self.pattern.clone()
        } else {
            clean_token(&self.pattern)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_collapses_whitespace() {
        let entry = RawEntry::new("  boodschappen   doen ", "shopping", None, 0.8)
            .validate(0)
            .unwrap();
        assert_eq!(entry.pattern, "boodschappen doen");
        assert!(entry.is_phrase());
        assert_eq!(entry.word_count(), 2);
    }

    #[test]
    fn test_lookup_key() {
        let word = RawEntry::new("to-do", "productivity", None, 0.7)
            .validate(0)
            .unwrap();
        assert_eq!(word.lookup_key(), "todo");

        let phrase = RawEntry::new("to-do lijst", "productivity", None, 0.85)
            .validate(0)
            .unwrap();
        assert_eq!(phrase.lookup_key(), "to-do lijst");
    }

    #[test]
    fn test_validate_rejects_uppercase() {
        let problem = RawEntry::new("Gym", "health", None, 0.8)
            .validate(7)
            .unwrap_err();
        assert_eq!(
            problem,
            LexiconProblem::NotLowercase {
                index: 7,
                pattern: "Gym".to_string()
            }
        );
    }

    #[test]
    fn test_validate_confidence_bounds() {
        assert!(RawEntry::new("gym", "health", None, 1.0).validate(0).is_ok());
        assert!(RawEntry::new("gym", "health", None, 0.0).validate(0).is_err());
        assert!(RawEntry::new("gym", "health", None, f64::NAN)
            .validate(0)
            .is_err());
    }

    #[test]
    fn test_validate_punctuation_only_word() {
        let problem = RawEntry::new("!!", "other", None, 0.5)
            .validate(1)
            .unwrap_err();
        assert_eq!(problem, LexiconProblem::EmptyPattern { index: 1 });
    }

    #[test]
    fn test_validate_resolves_subcategory() {
        let entry = RawEntry::new("hypotheek", "finance", Some("bills"), 0.8)
            .validate(0)
            .unwrap();
        assert_eq!(entry.subcategory.unwrap().name(), "bills");
        assert_eq!(entry.category, Category::Finance);
    }
}
