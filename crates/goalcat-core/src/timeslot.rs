//! Time-slot rules.
//!
//! A wake-up goal scheduled early in the morning is decided by time alone.
//! Activity words at typical gym hours earn a small sport bonus.

use std::ops::RangeInclusive;

use crate::context::IndicatorSet;
use crate::normalize::Normalized;
use crate::params::ScoringParams;
use crate::score::ScoreBoard;
use crate::taxonomy::Subcategory;

#[derive(Debug, Clone)]
pub struct TimeSlotRules {
    pub morning_hours: RangeInclusive<u32>,
    /// Matched as substrings of the lowercased slot
    pub morning_words: Vec<String>,
    pub wake_words: IndicatorSet,
    pub gym_hours: Vec<RangeInclusive<u32>>,
    pub activity_words: IndicatorSet,
    /// Result of the early wake-up short-circuit
    pub sleep: Subcategory,
    /// Target of the gym-hour bonus
    pub sport: Subcategory,
}

impl TimeSlotRules {
    pub fn is_morning(&self, slot: &str) -> bool {
        let slot = slot.to_lowercase();
        if self.morning_words.iter().any(|w| slot.contains(w.as_str())) {
            return true;
        }
        leading_hour(&slot).is_some_and(|h| self.morning_hours.contains(&h))
    }

    pub fn is_gym_hour(&self, slot: &str) -> bool {
        leading_hour(slot).is_some_and(|h| self.gym_hours.iter().any(|r| r.contains(&h)))
    }

    /// Early slot plus a wake-up word decides the classification outright
    pub fn short_circuit(&self, slot: &str, text: &Normalized) -> Option<Subcategory> {
        (self.is_morning(slot) && self.wake_words.present(text)).then_some(self.sleep)
    }

    /// Returns whether the sport bonus was applied
    pub fn apply_bonus(
        &self,
        slot: &str,
        text: &Normalized,
        board: &mut ScoreBoard,
        params: &ScoringParams,
    ) -> bool {
        if !(self.is_gym_hour(slot) && self.activity_words.present(text)) {
            return false;
        }
        board.add(self.sport.category(), Some(self.sport), params.time_sport_bonus);
        true
    }
}

/// First one- or two-digit number in the slot, read as an hour of the day
pub fn leading_hour(slot: &str) -> Option<u32> {
    let start = slot.find(|c: char| c.is_ascii_digit())?;
    let digits: String = slot[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.len() > 2 {
        return None;
    }
    digits.parse().ok().filter(|h| *h < 24)
}
