//! Per-call score accumulator.

use serde::Serialize;

use crate::taxonomy::{Category, Subcategory};

#[derive(Debug, Clone)]
struct Slot {
    score: f64,
    /// Indexed like `Category::subcategory_names`
    subscores: Vec<f64>,
}

/// Category and subcategory scores for a single classification.
///
/// Created zeroed for every call and dropped with it.
#[derive(Debug, Clone)]
pub struct ScoreBoard {
    slots: [Slot; Category::COUNT],
}

/// Read-only view of one category's final scores
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub category: Category,
    pub score: f64,
    pub subscores: Vec<(Subcategory, f64)>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|i| Slot {
                score: 0.0,
                subscores: vec![0.0; Category::ALL[i].subcategory_names().len()],
            }),
        }
    }

    /// Add `amount` to the category and, when given, to the subcategory.
    pub fn add(&mut self, category: Category, subcategory: Option<Subcategory>, amount: f64) {
        self.slots[category.index()].score += amount;
        if let Some(sub) = subcategory {
            self.add_subscore(sub, amount);
        }
    }

    pub fn add_subscore(&mut self, subcategory: Subcategory, amount: f64) {
        self.slots[subcategory.category().index()].subscores[subcategory.index()] += amount;
    }

    pub fn subtract(&mut self, category: Category, amount: f64) {
        self.slots[category.index()].score -= amount;
    }

    pub fn score(&self, category: Category) -> f64 {
        self.slots[category.index()].score
    }

    pub fn subscore(&self, subcategory: Subcategory) -> f64 {
        self.slots[subcategory.category().index()].subscores[subcategory.index()]
    }

    /// Highest category, earliest declared on ties
    pub fn leader(&self) -> (Category, f64) {
        let mut best = (Category::ALL[0], self.slots[0].score);
        for category in Category::ALL.into_iter().skip(1) {
            let score = self.score(category);
            if score > best.1 {
                best = (category, score);
            }
        }
        best
    }

    /// Highest positive subscore within `category`, earliest allowlisted on ties
    pub fn best_subcategory(&self, category: Category) -> Option<Subcategory> {
        let mut best: Option<(Subcategory, f64)> = None;
        for sub in category.subcategories() {
            let value = self.subscore(sub);
            if value > 0.0 && best.map_or(true, |(_, top)| value > top) {
                best = Some((sub, value));
            }
        }
        best.map(|(sub, _)| sub)
    }

    pub fn snapshot(&self) -> Vec<CategoryScore> {
        Category::ALL
            .into_iter()
            .map(|category| CategoryScore {
                category,
                score: self.score(category),
                subscores: category
                    .subcategories()
                    .map(|sub| (sub, self.subscore(sub)))
                    .filter(|(_, v)| *v != 0.0)
                    .collect(),
            })
            .collect()
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_zeroed() {
        let board = ScoreBoard::new();
        for category in Category::ALL {
            assert_eq!(board.score(category), 0.0);
        }
        assert_eq!(board.best_subcategory(Category::Health), None);
    }

    #[test]
    fn test_add_updates_category_and_subcategory() {
        let mut board = ScoreBoard::new();
        let sport = Category::Health.subcategory("sport").unwrap();
        board.add(Category::Health, Some(sport), 0.9);
        board.add(Category::Health, None, 0.1);

        assert!((board.score(Category::Health) - 1.0).abs() < 1e-9);
        assert_eq!(board.subscore(sport), 0.9);
        assert_eq!(board.best_subcategory(Category::Health), Some(sport));
    }

    #[test]
    fn test_leader_prefers_declaration_order_on_tie() {
        let mut board = ScoreBoard::new();
        board.add(Category::Finance, None, 0.6);
        board.add(Category::Social, None, 0.6);
        assert_eq!(board.leader(), (Category::Social, 0.6));
    }

    #[test]
    fn test_best_subcategory_ties_follow_allowlist() {
        let mut board = ScoreBoard::new();
        let lifestyle = Category::Shopping.subcategory("lifestyle").unwrap();
        let necessities = Category::Shopping.subcategory("necessities").unwrap();
        board.add_subscore(lifestyle, 0.5);
        board.add_subscore(necessities, 0.5);
        assert_eq!(board.best_subcategory(Category::Shopping), Some(necessities));
    }

    #[test]
    fn test_snapshot_omits_zero_subscores() {
        let mut board = ScoreBoard::new();
        let romantic = Category::Social.subcategory("romantic").unwrap();
        board.add(Category::Social, Some(romantic), 0.5);
        board.subtract(Category::Health, 0.3);

        let snapshot = board.snapshot();
        let social = snapshot.iter().find(|s| s.category == Category::Social).unwrap();
        assert_eq!(social.subscores, vec![(romantic, 0.5)]);
        let health = snapshot.iter().find(|s| s.category == Category::Health).unwrap();
        assert_eq!(health.score, -0.3);
        assert!(health.subscores.is_empty());
    }
}
