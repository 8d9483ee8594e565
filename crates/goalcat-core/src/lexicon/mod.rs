//! # Lexicon Module
//!
//! 重み付きキーワード／フレーズ辞書。起動時に一度だけロード・検証され、
//! 以降は読み取り専用。
//!
//! ## モジュール構成
//!
//! - `entry`: エントリ型と検証
//! - `file`: バージョン付きTOMLファイル形式とビルトイン辞書
//!
//! ## 使用例
//!
//! ```rust
//! use goalcat_core::lexicon::{Lexicon, RawEntry};
//! use goalcat_core::Category;
//!
//! let lexicon = Lexicon::from_entries(vec![
//!     RawEntry::new("sportschool", "health", Some("sport"), 0.9),
//!     RawEntry::new("boodschappen doen", "shopping", Some("necessities"), 0.8),
//! ])?;
//!
//! assert_eq!(lexicon.len(), 2);
//! assert_eq!(lexicon.words("sportschool")[0].category, Category::Health);
//! assert_eq!(lexicon.phrases().count(), 1);
//! # Ok::<(), goalcat_core::GoalcatError>(())
//! ```

mod entry;
mod file;

use std::collections::HashMap;

use aho_corasick::AhoCorasick;
use tracing::{debug, warn};

use crate::error::{GoalcatError, Result};
use crate::taxonomy::{Category, Subcategory};

pub use entry::{LexiconEntry, RawEntry};
pub use file::{EntryGroup, LexiconFile, BUILTIN_LEXICON, SUPPORTED_LEXICON_VERSIONS};

/// 検証済みの辞書
#[derive(Debug, Clone)]
pub struct Lexicon {
    version: Option<String>,
    entries: Vec<LexiconEntry>,
    /// フレーズのインデックス（語数降順、同数は宣言順）
    phrases: Vec<usize>,
    /// `phrases` と同順のパターンで構築したオートマトン
    phrase_index: AhoCorasick,
    /// 単語キー → エントリのインデックス
    words: HashMap<String, Vec<usize>>,
}

/// Lexicon size summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexiconStats {
    pub entries: usize,
    pub phrases: usize,
    pub words: usize,
    pub per_category: Vec<(Category, usize)>,
}

type DedupKey = (String, Category, Option<Subcategory>);

impl Lexicon {
    /// レコード一覧から辞書を構築する
    ///
    /// 不正なエントリはすべて収集して `InvalidLexicon` として返す。
    /// 同じ (キー, category, subcategory) の重複は後勝ちで警告ログを出す。
    /// 単語のキーは記号を除去した形なので "to-do" と "todo" も重複扱い。
    pub fn from_entries(records: Vec<RawEntry>) -> Result<Self> {
        Self::build(None, records)
    }

    pub(crate) fn build(version: Option<String>, records: Vec<RawEntry>) -> Result<Self> {
        let mut problems = Vec::new();
        let mut entries: Vec<LexiconEntry> = Vec::with_capacity(records.len());
        let mut seen: HashMap<DedupKey, usize> = HashMap::new();

        for (index, record) in records.into_iter().enumerate() {
            let entry = match record.validate(index) {
                Ok(entry) => entry,
                Err(problem) => {
                    problems.push(problem);
                    continue;
                }
            };

            let key = (entry.lookup_key(), entry.category, entry.subcategory);
            match seen.get(&key) {
                Some(&slot) => {
                    warn!(
                        pattern = %entry.pattern,
                        category = %entry.category,
                        previous = entries[slot].confidence,
                        confidence = entry.confidence,
                        "duplicate lexicon entry, keeping the last one"
                    );
                    entries[slot] = entry;
                }
                None => {
                    seen.insert(key, entries.len());
                    entries.push(entry);
                }
            }
        }

        if !problems.is_empty() {
            return Err(GoalcatError::InvalidLexicon { problems });
        }

        let mut phrases = Vec::new();
        let mut words: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            if entry.is_phrase() {
                phrases.push(i);
            } else {
                words.entry(entry.lookup_key()).or_default().push(i);
            }
        }
        // stable: equal word counts keep declaration order
        phrases.sort_by(|a, b| entries[*b].word_count().cmp(&entries[*a].word_count()));
        let phrase_index = AhoCorasick::new(phrases.iter().map(|&i| entries[i].pattern.as_str()))?;

        debug!(
            version = version.as_deref().unwrap_or("-"),
            entries = entries.len(),
            phrases = phrases.len(),
            "lexicon loaded"
        );

        Ok(Self {
            version,
            entries,
            phrases,
            phrase_index,
            words,
        })
    }

    /// ファイル上のバージョン文字列
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 全エントリ（宣言順）
    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    /// フレーズエントリ（語数の多い順）
    pub fn phrases(&self) -> impl Iterator<Item = &LexiconEntry> {
        self.phrases.iter().map(move |&i| &self.entries[i])
    }

    /// `blob` に部分文字列として現れるフレーズ（`phrases()` と同じ順）
    ///
    /// 重なり合う一致もすべて拾う。同じフレーズが何度現れても一度だけ返す。
    pub fn phrases_in(&self, blob: &str) -> Vec<&LexiconEntry> {
        let mut hits: Vec<usize> = self
            .phrase_index
            .find_overlapping_iter(blob)
            .map(|m| m.pattern().as_usize())
            .collect();
        hits.sort_unstable();
        hits.dedup();
        hits.into_iter()
            .map(|slot| &self.entries[self.phrases[slot]])
            .collect()
    }

    /// 単語エントリを検索する（トークンは正規化済みであること）
    pub fn words(&self, token: &str) -> Vec<&LexiconEntry> {
        self.words
            .get(token)
            .map(|ids| ids.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    pub(crate) fn word_entries(&self, token: &str) -> impl Iterator<Item = &LexiconEntry> {
        self.words
            .get(token)
            .into_iter()
            .flatten()
            .map(move |&i| &self.entries[i])
    }

    pub fn stats(&self) -> LexiconStats {
        let per_category = Category::ALL
            .into_iter()
            .map(|c| (c, self.entries.iter().filter(|e| e.category == c).count()))
            .collect();

        LexiconStats {
            entries: self.entries.len(),
            phrases: self.phrases.len(),
            words: self.entries.len() - self.phrases.len(),
            per_category,
        }
    }
}
