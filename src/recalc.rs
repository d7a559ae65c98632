use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::leaderboard::margin_ranks;
use crate::model::{CompetitionId, GameId, Tip, TipRecord, UserId};
use crate::round::aggregate_round;
use crate::scoring::{evaluate_tip, CompetitionSettings};

/// Computed values to store back on one tip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipScore {
    pub user_id: UserId,
    pub game_id: GameId,
    pub competition_id: CompetitionId,
    pub round: u32,
    pub points: i32,
    pub is_correct: Option<bool>,
    pub margin_accuracy: Option<u32>,
    pub margin_rank: Option<u32>,
}

impl TipScore {
    /// Overwrite the computed fields of `tip`
    pub fn write_to(&self, tip: &mut Tip) {
        tip.points = self.points;
        tip.is_correct = self.is_correct;
        tip.margin_accuracy = self.margin_accuracy;
        tip.margin_rank = self.margin_rank;
    }
}

/// All-correct bonus earned by one user in one round of one competition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundBonus {
    pub user_id: UserId,
    pub competition_id: CompetitionId,
    pub round: u32,
    pub points: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recalculation {
    /// Ordered by competition, user, then game id
    pub tips: Vec<TipScore>,
    pub bonuses: Vec<RoundBonus>,
    pub calculated_at: DateTime<Utc>,
}

impl Recalculation {
    pub fn score_for(&self, user_id: &str, game_id: GameId) -> Option<&TipScore> {
        self.tips
            .iter()
            .find(|s| s.user_id == user_id && s.game_id == game_id)
    }

    /// Per-tip points with each round bonus added to the first tip (lowest
    /// game id) of that user's round, for stores without a bonus ledger.
    pub fn fold_bonuses_into_tips(&self) -> Vec<TipScore> {
        let mut tips = self.tips.clone();
        for bonus in &self.bonuses {
            let first = tips
                .iter_mut()
                .filter(|s| {
                    s.user_id == bonus.user_id
                        && s.competition_id == bonus.competition_id
                        && s.round == bonus.round
                })
                .min_by_key(|s| s.game_id);
            if let Some(score) = first {
                score.points = score.points.saturating_add(bonus.points);
            }
        }
        tips
    }

    pub fn total_points(&self) -> i64 {
        let tips: i64 = self.tips.iter().map(|s| i64::from(s.points)).sum();
        let bonuses: i64 = self.bonuses.iter().map(|b| i64::from(b.points)).sum();
        tips + bonuses
    }
}

/// Recompute every tip's stored values from scratch. Running it twice on the
/// same input gives the same values; nothing is accumulated.
pub fn recalculate(records: &[TipRecord], settings: &CompetitionSettings) -> Recalculation {
    let mut per_game: BTreeMap<(&str, GameId), Vec<&TipRecord>> = BTreeMap::new();
    let mut per_round: BTreeMap<(&str, &str, u32), Vec<&TipRecord>> = BTreeMap::new();
    for record in records {
        let competition = record.tip.competition_id.as_str();
        per_game
            .entry((competition, record.game.id))
            .or_default()
            .push(record);
        per_round
            .entry((competition, record.tip.user_id.as_str(), record.round()))
            .or_default()
            .push(record);
    }

    let mut ranks: HashMap<(&str, GameId, UserId), u32> = HashMap::new();
    for ((competition, game_id), game_records) in &per_game {
        let game = &game_records[0].game;
        let tips: Vec<Tip> = game_records.iter().map(|r| r.tip.clone()).collect();
        for (user_id, rank) in margin_ranks(game, &tips) {
            ranks.entry((*competition, *game_id, user_id)).or_insert(rank);
        }
    }

    let mut tips: Vec<TipScore> = records
        .iter()
        .map(|record| {
            let evaluation = evaluate_tip(&record.tip, &record.game, settings);
            TipScore {
                user_id: record.tip.user_id.clone(),
                game_id: record.game.id,
                competition_id: record.tip.competition_id.clone(),
                round: record.round(),
                points: evaluation.points,
                is_correct: evaluation.is_correct,
                margin_accuracy: evaluation.margin_accuracy,
                margin_rank: ranks
                    .get(&(
                        record.tip.competition_id.as_str(),
                        record.game.id,
                        record.tip.user_id.clone(),
                    ))
                    .copied(),
            }
        })
        .collect();
    tips.sort_by(|a, b| {
        a.competition_id
            .cmp(&b.competition_id)
            .then_with(|| a.user_id.cmp(&b.user_id))
            .then_with(|| a.game_id.cmp(&b.game_id))
    });

    let bonuses: Vec<RoundBonus> = per_round
        .into_iter()
        .filter_map(|((competition, user_id, round), round_records)| {
            let result = aggregate_round(round, round_records, settings);
            (result.bonus != 0).then(|| RoundBonus {
                user_id: user_id.to_string(),
                competition_id: competition.to_string(),
                round,
                points: result.bonus,
            })
        })
        .collect();

    tracing::debug!(
        tips = tips.len(),
        bonuses = bonuses.len(),
        "recalculated competition scores"
    );

    Recalculation {
        tips,
        bonuses,
        calculated_at: Utc::now(),
    }
}
