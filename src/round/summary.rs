use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::aggregator::aggregate_round;
use crate::model::{Game, TipRecord};
use crate::scoring::CompetitionSettings;

/// Round statistics across every participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u32,
    pub total_games: u32,
    pub completed_games: u32,
    pub participants: u32,
    pub average_score: f64,
    /// Participants whose decided tips were all correct
    pub perfect_rounds: u32,
}

/// Summarize `round` from the competition's tips.
///
/// `games` may list fixtures nobody tipped on; they still count towards the
/// game totals. Games are counted once by id whichever list they come from.
pub fn summarize_round(
    records: &[TipRecord],
    games: &[Game],
    settings: &CompetitionSettings,
    round: u32,
) -> RoundSummary {
    let mut fixtures: BTreeMap<u64, bool> = BTreeMap::new();
    for game in games.iter().filter(|g| g.round == round) {
        fixtures.insert(game.id, game.is_complete);
    }

    let mut by_user: BTreeMap<&str, Vec<&TipRecord>> = BTreeMap::new();
    for record in records.iter().filter(|r| r.round() == round) {
        fixtures
            .entry(record.game.id)
            .or_insert(record.game.is_complete);
        by_user
            .entry(record.tip.user_id.as_str())
            .or_default()
            .push(record);
    }

    let results: Vec<_> = by_user
        .values()
        .map(|tips| aggregate_round(round, tips.iter().copied(), settings))
        .collect();

    let participants = results.len() as u32;
    let total_points: i64 = results.iter().map(|r| i64::from(r.points)).sum();
    let average_score = if participants > 0 {
        total_points as f64 / f64::from(participants)
    } else {
        0.0
    };

    tracing::debug!(round, participants, "summarized round");

    RoundSummary {
        round,
        total_games: fixtures.len() as u32,
        completed_games: fixtures.values().filter(|complete| **complete).count() as u32,
        participants,
        average_score,
        perfect_rounds: results.iter().filter(|r| r.is_perfect()).count() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Member, Tip};

    fn record(user: &str, game: &Game, pick: u32) -> TipRecord {
        TipRecord::new(
            Tip::new(user, game.id, "comp", pick),
            game.clone(),
            Member::new(user, user),
        )
    }

    #[test]
    fn test_summary_counts() {
        let g1 = Game::scheduled(1, 3, 1, 2).final_result(100, 50);
        let g2 = Game::scheduled(2, 3, 3, 4).final_result(60, 70);
        let g3 = Game::scheduled(3, 3, 5, 6);
        let records = vec![
            record("alice", &g1, 1),
            record("alice", &g2, 4),
            record("bob", &g1, 2),
            record("bob", &g2, 4),
            record("bob", &g3, 5),
        ];

        let summary = summarize_round(&records, &[], &CompetitionSettings::default(), 3);
        assert_eq!(summary.total_games, 3);
        assert_eq!(summary.completed_games, 2);
        assert_eq!(summary.participants, 2);
        assert_eq!(summary.average_score, 1.5);
        assert_eq!(summary.perfect_rounds, 1);
    }

    #[test]
    fn test_untipped_fixtures_counted() {
        let g1 = Game::scheduled(1, 1, 1, 2).final_result(100, 50);
        let g2 = Game::scheduled(2, 1, 3, 4);
        let records = vec![record("alice", &g1, 1)];

        let summary = summarize_round(&records, &[g1.clone(), g2], &CompetitionSettings::default(), 1);
        assert_eq!(summary.total_games, 2);
        assert_eq!(summary.completed_games, 1);
        assert_eq!(summary.participants, 1);
    }

    #[test]
    fn test_average_includes_bonus() {
        let g1 = Game::scheduled(1, 1, 1, 2).final_result(100, 50);
        let records = vec![record("alice", &g1, 1), record("bob", &g1, 2)];
        let settings = CompetitionSettings::default().with_all_correct_bonus(3);

        let summary = summarize_round(&records, &[], &settings, 1);
        assert_eq!(summary.average_score, 2.0);
        assert_eq!(summary.perfect_rounds, 1);
    }

    #[test]
    fn test_empty_round() {
        let summary = summarize_round(&[], &[], &CompetitionSettings::default(), 7);
        assert_eq!(summary.total_games, 0);
        assert_eq!(summary.participants, 0);
        assert_eq!(summary.average_score, 0.0);
    }
}
