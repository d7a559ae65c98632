use super::config::CompetitionSettings;
use crate::model::{Game, Tip};

/// How a tip's points were put together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointsBreakdown {
    pub base: i32,               // correct_tip_points, 0 when wrong or unresolved
    pub multiplier: Option<u32>, // confidence applied to base
    pub margin_bonus: i32,
}

impl PointsBreakdown {
    pub fn total(&self) -> i32 {
        let base = match self.multiplier {
            Some(confidence) => multiply(self.base, confidence),
            None => self.base,
        };
        base.saturating_add(self.margin_bonus)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TipEvaluation {
    pub points: i32,
    /// `None` while the game has no result to compare against
    pub is_correct: Option<bool>,
    pub margin_accuracy: Option<u32>,
    pub breakdown: PointsBreakdown,
}

/// Points earned by a single tip.
///
/// Nothing is scored until the game is complete with a winner. A wrong pick
/// scores 0 whatever its margin or confidence. A correct pick earns
/// `correct_tip_points`, multiplied by the confidence value when confidence
/// scoring is on, plus the margin bonus (not multiplied) when the predicted
/// margin is within the threshold.
pub fn compute_points(tip: &Tip, game: &Game, settings: &CompetitionSettings) -> i32 {
    evaluate_tip(tip, game, settings).points
}

pub fn evaluate_tip(tip: &Tip, game: &Game, settings: &CompetitionSettings) -> TipEvaluation {
    let margin_accuracy = tip.margin_error(game);

    let winner = match game.winner {
        Some(winner) if game.is_complete => winner,
        _ => {
            return TipEvaluation {
                points: 0,
                is_correct: None,
                margin_accuracy,
                breakdown: PointsBreakdown::default(),
            }
        }
    };

    if tip.predicted_winner != winner {
        return TipEvaluation {
            points: 0,
            is_correct: Some(false),
            margin_accuracy,
            breakdown: PointsBreakdown::default(),
        };
    }

    let mut breakdown = PointsBreakdown {
        base: settings.correct_tip_points,
        ..Default::default()
    };

    if settings.confidence_enabled {
        breakdown.multiplier = tip.confidence;
    }

    if settings.margin_bonus_enabled {
        // margin_error is None when the tip has no margin or a score is missing
        if let Some(diff) = margin_accuracy {
            if diff <= settings.margin_bonus_threshold {
                breakdown.margin_bonus = settings.margin_bonus_points;
            }
        }
    }

    TipEvaluation {
        points: breakdown.total(),
        is_correct: Some(true),
        margin_accuracy,
        breakdown,
    }
}

fn multiply(points: i32, confidence: u32) -> i32 {
    let confidence = i32::try_from(confidence).unwrap_or(i32::MAX);
    points.saturating_mul(confidence)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: u32 = 1;
    const AWAY: u32 = 2;

    fn completed_game(home_score: i32, away_score: i32) -> Game {
        Game::scheduled(1, 1, HOME, AWAY).final_result(home_score, away_score)
    }

    fn tip_for(team: u32) -> Tip {
        Tip::new("user", 1, "comp", team)
    }

    #[test]
    fn test_incomplete_game_scores_zero() {
        let game = Game::scheduled(1, 1, HOME, AWAY);
        let settings = CompetitionSettings::default()
            .with_confidence()
            .with_margin_bonus(100, 10);
        let tip = tip_for(HOME).with_confidence(5).with_margin(10);

        let result = evaluate_tip(&tip, &game, &settings);
        assert_eq!(result.points, 0);
        assert_eq!(result.is_correct, None);
    }

    #[test]
    fn test_complete_without_winner_scores_zero() {
        let mut game = completed_game(90, 80);
        game.winner = None;
        assert_eq!(compute_points(&tip_for(HOME), &game, &CompetitionSettings::default()), 0);
    }

    #[test]
    fn test_draw_scores_zero_for_both_picks() {
        let game = completed_game(70, 70);
        let settings = CompetitionSettings::default();
        assert_eq!(compute_points(&tip_for(HOME), &game, &settings), 0);
        assert_eq!(compute_points(&tip_for(AWAY), &game, &settings), 0);
    }

    #[test]
    fn test_correct_tip_base_points() {
        let game = completed_game(100, 85);
        let settings = CompetitionSettings::default().with_correct_tip_points(2);
        let result = evaluate_tip(&tip_for(HOME), &game, &settings);
        assert_eq!(result.points, 2);
        assert_eq!(result.is_correct, Some(true));
    }

    #[test]
    fn test_wrong_tip_no_partial_credit() {
        let game = completed_game(100, 85);
        let settings = CompetitionSettings::default()
            .with_confidence()
            .with_margin_bonus(100, 10);
        let tip = tip_for(AWAY).with_margin(15).with_confidence(9);

        let result = evaluate_tip(&tip, &game, &settings);
        assert_eq!(result.points, 0);
        assert_eq!(result.is_correct, Some(false));
        assert_eq!(result.margin_accuracy, Some(0));
    }

    #[test]
    fn test_confidence_multiplies() {
        let game = completed_game(100, 85);
        let settings = CompetitionSettings::default()
            .with_correct_tip_points(2)
            .with_confidence();
        let tip = tip_for(HOME).with_confidence(3);
        assert_eq!(compute_points(&tip, &game, &settings), 6);
    }

    #[test]
    fn test_zero_confidence_zeroes_points() {
        let game = completed_game(100, 85);
        let settings = CompetitionSettings::default().with_confidence();
        let tip = tip_for(HOME).with_confidence(0);
        assert_eq!(compute_points(&tip, &game, &settings), 0);
    }

    #[test]
    fn test_confidence_ignored_when_disabled() {
        let game = completed_game(100, 85);
        let tip = tip_for(HOME).with_confidence(4);
        assert_eq!(compute_points(&tip, &game, &CompetitionSettings::default()), 1);
    }

    #[test]
    fn test_confidence_enabled_without_value() {
        let game = completed_game(100, 85);
        let settings = CompetitionSettings::default().with_confidence();
        assert_eq!(compute_points(&tip_for(HOME), &game, &settings), 1);
    }

    #[test]
    fn test_margin_bonus_within_threshold() {
        // actual 8, predicted 5, diff 3
        let game = completed_game(88, 80);
        let settings = CompetitionSettings::default().with_margin_bonus(10, 2);
        let tip = tip_for(HOME).with_margin(5);
        assert_eq!(compute_points(&tip, &game, &settings), 3);
    }

    #[test]
    fn test_margin_bonus_outside_threshold() {
        // actual 8, predicted 23, diff 15
        let game = completed_game(88, 80);
        let settings = CompetitionSettings::default().with_margin_bonus(10, 2);
        let tip = tip_for(HOME).with_margin(23);
        assert_eq!(compute_points(&tip, &game, &settings), 1);
    }

    #[test]
    fn test_margin_bonus_threshold_inclusive() {
        let game = completed_game(88, 80);
        let settings = CompetitionSettings::default().with_margin_bonus(3, 2);
        let tip = tip_for(HOME).with_margin(5);
        assert_eq!(compute_points(&tip, &game, &settings), 3);
    }

    #[test]
    fn test_margin_bonus_needs_margin() {
        let game = completed_game(88, 80);
        let settings = CompetitionSettings::default().with_margin_bonus(10, 2);
        assert_eq!(compute_points(&tip_for(HOME), &game, &settings), 1);
    }

    #[test]
    fn test_margin_bonus_needs_scores() {
        let mut game = Game::scheduled(1, 1, HOME, AWAY);
        game.is_complete = true;
        game.winner = Some(HOME);
        let settings = CompetitionSettings::default().with_margin_bonus(10, 2);
        let result = evaluate_tip(&tip_for(HOME).with_margin(5), &game, &settings);
        assert_eq!(result.points, 1);
        assert_eq!(result.margin_accuracy, None);
    }

    #[test]
    fn test_margin_bonus_disabled() {
        let game = completed_game(88, 80);
        let tip = tip_for(HOME).with_margin(8);
        assert_eq!(compute_points(&tip, &game, &CompetitionSettings::default()), 1);
    }

    #[test]
    fn test_margin_bonus_not_multiplied() {
        // home 100, away 85: margin 15, predicted 12, diff 3
        let game = completed_game(100, 85);
        let settings = CompetitionSettings::default()
            .with_confidence()
            .with_margin_bonus(5, 3);
        let tip = tip_for(HOME).with_margin(12).with_confidence(5);

        let result = evaluate_tip(&tip, &game, &settings);
        assert_eq!(result.points, 8);
        assert_eq!(
            result.breakdown,
            PointsBreakdown {
                base: 1,
                multiplier: Some(5),
                margin_bonus: 3,
            }
        );
    }

    #[test]
    fn test_negative_predicted_margin_treated_as_absolute() {
        let game = completed_game(100, 85);
        let settings = CompetitionSettings::default().with_margin_bonus(0, 4);
        let tip = tip_for(HOME).with_margin(-15);
        assert_eq!(compute_points(&tip, &game, &settings), 5);
    }

    #[test]
    fn test_huge_confidence_saturates() {
        let game = completed_game(100, 85);
        let settings = CompetitionSettings::default()
            .with_correct_tip_points(10)
            .with_confidence();
        let tip = tip_for(HOME).with_confidence(u32::MAX);
        assert_eq!(compute_points(&tip, &game, &settings), i32::MAX);
    }
}
