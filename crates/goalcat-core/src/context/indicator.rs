//! Indicator word sets

use std::collections::HashSet;

use crate::normalize::{clean_token, Normalized};

/// A set of context words.
///
/// Single words match whole tokens; entries containing a space match as
/// substrings of the blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicatorSet {
    words: HashSet<String>,
    phrases: Vec<String>,
}

impl IndicatorSet {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for item in items {
            let lowered = item.as_ref().to_lowercase();
            let parts: Vec<&str> = lowered.split_whitespace().collect();
            match parts.len() {
                0 => {}
                1 => {
                    let word = clean_token(parts[0]);
                    if !word.is_empty() {
                        set.words.insert(word);
                    }
                }
                _ => {
                    let phrase = parts.join(" ");
                    if !set.phrases.contains(&phrase) {
                        set.phrases.push(phrase);
                    }
                }
            }
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.phrases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len() + self.phrases.len()
    }

    /// Whether `word` (an already cleaned token) is one of the single words
    pub fn contains_word(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Whether any indicator occurs in the normalized input
    pub fn present(&self, input: &Normalized) -> bool {
        input.tokens.iter().any(|t| self.words.contains(t))
            || self.phrases.iter().any(|p| input.blob.contains(p.as_str()))
    }
}
