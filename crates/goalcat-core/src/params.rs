//! Tunable scoring parameters.
//!
//! The defaults are the hand-tuned values the classifier has always shipped
//! with; existing classifications depend on them.

use serde::{Deserialize, Serialize};

use crate::error::{GoalcatError, Result};

/// Numeric knobs for every scoring stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    /// Minimum adjusted score for a category to be returned
    pub confidence_floor: f64,
    /// Extra score per additional word in a matched phrase
    pub phrase_bonus: f64,

    /// Shopping boost when a purchase indicator is present
    pub purchase_boost: f64,
    /// Reduction applied to the purchased item's own category
    pub item_category_penalty: f64,
    /// Shopping subcategory boost once the item domain is known
    pub purchase_subcategory_boost: f64,
    /// Shopping/necessities boost when no item is recognised but need is stated
    pub necessity_fallback_boost: f64,
    /// Boost for the winning side of a one-sided context split
    pub context_boost: f64,

    /// Health/sport bonus for activity words at gym hours
    pub time_sport_bonus: f64,

    /// Shopping score above which Health is penalised
    pub shopping_dominance: f64,
    /// Productivity score above which Household is penalised
    pub productivity_dominance: f64,
    /// Health or Productivity score above which Shopping is penalised
    pub specific_dominance: f64,
    /// Amount subtracted by each cross-category penalty
    pub cross_penalty: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            confidence_floor: 0.5,
            phrase_bonus: 0.3,
            purchase_boost: 0.8,
            item_category_penalty: 0.3,
            purchase_subcategory_boost: 0.5,
            necessity_fallback_boost: 0.3,
            context_boost: 0.5,
            time_sport_bonus: 0.3,
            shopping_dominance: 0.7,
            productivity_dominance: 0.7,
            specific_dominance: 0.8,
            cross_penalty: 0.3,
        }
    }
}

impl ScoringParams {
    /// Parameter names, in declaration order
    pub const KEYS: &'static [&'static str] = &[
        "confidence_floor",
        "phrase_bonus",
        "purchase_boost",
        "item_category_penalty",
        "purchase_subcategory_boost",
        "necessity_fallback_boost",
        "context_boost",
        "time_sport_bonus",
        "shopping_dominance",
        "productivity_dominance",
        "specific_dominance",
        "cross_penalty",
    ];

    pub fn get(&self, key: &str) -> Option<f64> {
        let value = match key {
            "confidence_floor" => self.confidence_floor,
            "phrase_bonus" => self.phrase_bonus,
            "purchase_boost" => self.purchase_boost,
            "item_category_penalty" => self.item_category_penalty,
            "purchase_subcategory_boost" => self.purchase_subcategory_boost,
            "necessity_fallback_boost" => self.necessity_fallback_boost,
            "context_boost" => self.context_boost,
            "time_sport_bonus" => self.time_sport_bonus,
            "shopping_dominance" => self.shopping_dominance,
            "productivity_dominance" => self.productivity_dominance,
            "specific_dominance" => self.specific_dominance,
            "cross_penalty" => self.cross_penalty,
            _ => return None,
        };
        Some(value)
    }

    /// Set a parameter by name. Values must be finite and non-negative.
    pub fn set(&mut self, key: &str, value: f64) -> Result<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(GoalcatError::InvalidConfigValue {
                key: format!("scoring.{}", key),
                value: value.to_string(),
                reason: "must be a finite, non-negative number".to_string(),
            });
        }

        let slot = match key {
            "confidence_floor" => &mut self.confidence_floor,
            "phrase_bonus" => &mut self.phrase_bonus,
            "purchase_boost" => &mut self.purchase_boost,
            "item_category_penalty" => &mut self.item_category_penalty,
            "purchase_subcategory_boost" => &mut self.purchase_subcategory_boost,
            "necessity_fallback_boost" => &mut self.necessity_fallback_boost,
            "context_boost" => &mut self.context_boost,
            "time_sport_bonus" => &mut self.time_sport_bonus,
            "shopping_dominance" => &mut self.shopping_dominance,
            "productivity_dominance" => &mut self.productivity_dominance,
            "specific_dominance" => &mut self.specific_dominance,
            "cross_penalty" => &mut self.cross_penalty,
            _ => {
                return Err(GoalcatError::ConfigKeyNotFound {
                    key: format!("scoring.{}", key),
                })
            }
        };
        *slot = value;
        Ok(())
    }
}
