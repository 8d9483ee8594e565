//! Input normalization.
//!
//! Turns the three user-authored fields into one lowercase searchable blob
//! plus a token list.

/// Normalized classifier input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    /// All fields joined with a space and lowercased
    pub blob: String,
    /// Whitespace-separated tokens with non-alphanumeric characters removed
    pub tokens: Vec<String>,
}

impl Normalized {
    /// Whether `word` occurs as a whole token
    pub fn has_token(&self, word: &str) -> bool {
        self.tokens.iter().any(|t| t == word)
    }
}

/// Normalize title, description and time slot into a blob and tokens.
pub fn normalize(title: &str, description: Option<&str>, time_slot: Option<&str>) -> Normalized {
    let mut joined = String::with_capacity(
        title.len() + description.map_or(0, str::len) + time_slot.map_or(0, str::len) + 2,
    );
    joined.push_str(title);
    for field in [description, time_slot].into_iter().flatten() {
        joined.push(' ');
        joined.push_str(field);
    }

    let blob = joined.to_lowercase();
    let tokens = blob
        .split_whitespace()
        .map(clean_token)
        .filter(|t| !t.is_empty())
        .collect();

    Normalized { blob, tokens }
}

/// Strip every non-alphanumeric character from a token.
pub fn clean_token(raw: &str) -> String {
    raw.chars().filter(|c| c.is_alphanumeric()).collect()
}
