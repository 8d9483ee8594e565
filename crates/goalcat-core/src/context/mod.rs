//! # Context Module
//!
//! 曖昧なキーワードを共起語で解決する、順序付き・名前付きのルール列。
//!
//! ルールはデータ（`rules.toml`）から構築され、宣言順に適用される。
//! 後のルールは前のルールが設定した状態（購入意図など）を参照できるため、
//! 順序そのものが正しさの一部である。
//!
//! ## モジュール構成
//!
//! - `indicator`: 共起語セット
//! - `file`: ルール定義ファイルとビルトイン定義
//!
//! ## 使用例
//!
//! ```rust
//! use goalcat_core::context::RuleBook;
//!
//! let book = RuleBook::builtin()?;
//! let names: Vec<_> = book.context.names().collect();
//! assert_eq!(names[0], "purchase_intent");
//! assert_eq!(names.len(), 6);
//! # Ok::<(), goalcat_core::GoalcatError>(())
//! ```

mod file;
mod indicator;

use tracing::trace;

use crate::matcher::Matches;
use crate::normalize::Normalized;
use crate::params::ScoringParams;
use crate::score::ScoreBoard;
use crate::taxonomy::{Category, Subcategory};
use crate::timeslot::TimeSlotRules;

pub use file::{ItemSpec, RuleSpec, RulesFile, SideSpec, BUILTIN_RULES, SUPPORTED_RULES_VERSIONS};
pub use indicator::IndicatorSet;

/// Context rules plus time-slot rules, as loaded from one rules document
#[derive(Debug, Clone)]
pub struct RuleBook {
    pub context: RuleSet,
    pub time_slot: TimeSlotRules,
}

/// Inputs every rule may inspect
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub text: &'a Normalized,
    pub matches: &'a Matches,
}

/// State shared by the rules of a single pass
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleState {
    /// Set once the purchase-intent rule has fired
    pub purchase_intent: bool,
}

/// Ordered list of context rules
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<ContextRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<ContextRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ContextRule] {
        &self.rules
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(ContextRule::name)
    }

    /// Apply every rule in order, returning the names of those that fired.
    pub fn apply(
        &self,
        input: RuleInput<'_>,
        board: &mut ScoreBoard,
        params: &ScoringParams,
    ) -> Vec<String> {
        let mut state = RuleState::default();
        let mut fired = Vec::new();

        for rule in &self.rules {
            if rule.apply(input, &mut state, board, params) {
                trace!(rule = rule.name(), "context rule fired");
                fired.push(rule.name().to_string());
            }
        }

        fired
    }
}

/// A named disambiguation step
#[derive(Debug, Clone)]
pub enum ContextRule {
    PurchaseIntent(PurchaseIntent),
    Split(ContextSplit),
}

impl ContextRule {
    pub fn name(&self) -> &str {
        match self {
            Self::PurchaseIntent(rule) => &rule.name,
            Self::Split(rule) => &rule.name,
        }
    }

    /// Returns whether the rule adjusted the board
    pub fn apply(
        &self,
        input: RuleInput<'_>,
        state: &mut RuleState,
        board: &mut ScoreBoard,
        params: &ScoringParams,
    ) -> bool {
        match self {
            Self::PurchaseIntent(rule) => rule.apply(input, state, board, params),
            Self::Split(rule) => rule.apply(input, state, board, params),
        }
    }
}

/// Item vocabulary for one domain, used to recognise what is being bought
#[derive(Debug, Clone)]
pub struct ItemDomain {
    pub category: Category,
    pub items: IndicatorSet,
    /// Shopping subcategory used when neither need nor desire is stated
    pub default_subcategory: Subcategory,
}

/// Purchase intent: the text is about buying something.
///
/// Shopping gets a boost, the purchased item's own category is suppressed and
/// the Shopping subcategory is decided from need vs. desire words.
#[derive(Debug, Clone)]
pub struct PurchaseIntent {
    pub name: String,
    pub purchase: IndicatorSet,
    pub necessity: IndicatorSet,
    pub lifestyle: IndicatorSet,
    /// Checked in order; the first matching domain wins
    pub items: Vec<ItemDomain>,
    pub necessities: Subcategory,
    pub lifestyle_subcategory: Subcategory,
}

impl PurchaseIntent {
    fn apply(
        &self,
        input: RuleInput<'_>,
        state: &mut RuleState,
        board: &mut ScoreBoard,
        params: &ScoringParams,
    ) -> bool {
        if state.purchase_intent || !self.purchase.present(input.text) {
            return false;
        }
        state.purchase_intent = true;

        board.add(Category::Shopping, None, params.purchase_boost);
        let necessity = self.necessity.present(input.text);

        match self.items.iter().find(|d| d.items.present(input.text)) {
            Some(domain) => {
                board.subtract(domain.category, params.item_category_penalty);
                let sub = if necessity {
                    self.necessities
                } else if self.lifestyle.present(input.text) {
                    self.lifestyle_subcategory
                } else {
                    domain.default_subcategory
                };
                board.add_subscore(sub, params.purchase_subcategory_boost);
            }
            None if necessity => {
                board.add(
                    Category::Shopping,
                    Some(self.necessities),
                    params.necessity_fallback_boost,
                );
            }
            None => {}
        }

        true
    }
}

/// One side of a context split
#[derive(Debug, Clone)]
pub struct SplitSide {
    pub context: IndicatorSet,
    pub category: Category,
    pub subcategory: Option<Subcategory>,
}

/// Resolve a generic keyword towards one of two readings.
///
/// Fires only when a trigger keyword matched and exactly one side's context
/// words are present.
#[derive(Debug, Clone)]
pub struct ContextSplit {
    pub name: String,
    pub trigger: IndicatorSet,
    pub sides: [SplitSide; 2],
    pub skip_after_purchase: bool,
}

impl ContextSplit {
    fn apply(
        &self,
        input: RuleInput<'_>,
        state: &mut RuleState,
        board: &mut ScoreBoard,
        params: &ScoringParams,
    ) -> bool {
        if self.skip_after_purchase && state.purchase_intent {
            return false;
        }
        if !input.matches.any_word(|w| self.trigger.contains_word(w)) {
            return false;
        }

        let [left, right] = &self.sides;
        let side = match (left.context.present(input.text), right.context.present(input.text)) {
            (true, false) => left,
            (false, true) => right,
            _ => return false,
        };

        board.add(side.category, side.subcategory, params.context_boost);
        true
    }
}
