//! Winner selection.
//!
//! Generic keywords overlap categories, so raw additive scores favour whichever
//! category happens to collect more hits. Cross-category penalties correct for
//! that before the winner is read off the board.

use crate::classifier::DetectionResult;
use crate::params::ScoringParams;
use crate::score::ScoreBoard;
use crate::taxonomy::Category;

pub const SHOPPING_OVER_HEALTH: &str = "shopping_over_health";
pub const PRODUCTIVITY_OVER_HOUSEHOLD: &str = "productivity_over_household";
pub const SPECIFIC_OVER_SHOPPING: &str = "specific_over_shopping";

/// Apply cross-category penalties in order, returning the names of those
/// applied. Each check sees the scores left by the previous one.
pub fn apply_penalties(board: &mut ScoreBoard, params: &ScoringParams) -> Vec<&'static str> {
    let mut applied = Vec::new();

    if board.score(Category::Shopping) > params.shopping_dominance {
        board.subtract(Category::Health, params.cross_penalty);
        applied.push(SHOPPING_OVER_HEALTH);
    }

    if board.score(Category::Productivity) > params.productivity_dominance {
        board.subtract(Category::Household, params.cross_penalty);
        applied.push(PRODUCTIVITY_OVER_HOUSEHOLD);
    }

    if board.score(Category::Health) > params.specific_dominance
        || board.score(Category::Productivity) > params.specific_dominance
    {
        board.subtract(Category::Shopping, params.cross_penalty);
        applied.push(SPECIFIC_OVER_SHOPPING);
    }

    applied
}

/// Pick the leading category if it clears the confidence floor.
pub fn pick_winner(board: &ScoreBoard, params: &ScoringParams) -> Option<DetectionResult> {
    let (category, score) = board.leader();
    if score < params.confidence_floor {
        return None;
    }

    Some(DetectionResult {
        category,
        subcategory: board.best_subcategory(category),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_floor_is_none() {
        let mut board = ScoreBoard::new();
        board.add(Category::Finance, None, 0.49);
        assert_eq!(pick_winner(&board, &ScoringParams::default()), None);
    }

    #[test]
    fn test_floor_is_inclusive() {
        let mut board = ScoreBoard::new();
        board.add(Category::Finance, None, 0.5);
        let result = pick_winner(&board, &ScoringParams::default()).unwrap();
        assert_eq!(result.category, Category::Finance);
        assert_eq!(result.subcategory, None);
    }

    #[test]
    fn test_empty_board_is_none() {
        let board = ScoreBoard::new();
        assert_eq!(pick_winner(&board, &ScoringParams::default()), None);
    }

    #[test]
    fn test_shopping_dominance_penalises_health() {
        let mut board = ScoreBoard::new();
        board.add(Category::Shopping, None, 0.75);
        board.add(Category::Health, None, 0.7);

        let applied = apply_penalties(&mut board, &ScoringParams::default());
        assert_eq!(applied, vec![SHOPPING_OVER_HEALTH]);
        assert!((board.score(Category::Health) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_productivity_dominance_penalises_household() {
        let mut board = ScoreBoard::new();
        board.add(Category::Productivity, None, 0.8);
        board.add(Category::Household, None, 0.8);

        let applied = apply_penalties(&mut board, &ScoringParams::default());
        assert_eq!(applied, vec![PRODUCTIVITY_OVER_HOUSEHOLD]);
        assert!((board.score(Category::Household) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_penalties_are_sequential() {
        // Health starts above the specific threshold but is pulled below it
        // by the shopping penalty, so Shopping keeps its score.
        let mut board = ScoreBoard::new();
        board.add(Category::Shopping, None, 0.9);
        board.add(Category::Health, None, 1.0);

        let applied = apply_penalties(&mut board, &ScoringParams::default());
        assert_eq!(applied, vec![SHOPPING_OVER_HEALTH]);
        assert_eq!(board.score(Category::Shopping), 0.9);
    }

    #[test]
    fn test_strong_health_penalises_shopping() {
        let mut board = ScoreBoard::new();
        board.add(Category::Health, None, 0.9);
        board.add(Category::Shopping, None, 0.6);

        let applied = apply_penalties(&mut board, &ScoringParams::default());
        assert_eq!(applied, vec![SPECIFIC_OVER_SHOPPING]);
        assert!((board.score(Category::Shopping) - 0.3).abs() < 1e-9);
    }
}
