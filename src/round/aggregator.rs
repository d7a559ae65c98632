use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::TipRecord;
use crate::scoring::{evaluate_tip, CompetitionSettings};

/// One user's results for one round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round: u32,
    /// Tip points plus any all-correct bonus
    pub points: i32,
    pub correct: u32,
    /// Every tip in the round, decided or not
    pub total: u32,
    /// Tips on games that are complete with a winner
    pub decided: u32,
    pub bonus: i32,
    pub margin_diff: u32,
}

impl RoundResult {
    pub fn empty(round: u32) -> Self {
        Self {
            round,
            ..Default::default()
        }
    }

    /// Every decided tip was correct, and there was at least one
    pub fn is_perfect(&self) -> bool {
        self.decided > 0 && self.correct == self.decided
    }

    pub fn tip_points(&self) -> i32 {
        self.points - self.bonus
    }
}

/// Aggregate a single user's tips for `round`.
///
/// Records from other rounds are ignored. The all-correct bonus is added once
/// to the round total, never per tip, and only when every decided tip in the
/// round is correct; the result does not depend on record order.
pub fn aggregate_round<'a, I>(round: u32, records: I, settings: &CompetitionSettings) -> RoundResult
where
    I: IntoIterator<Item = &'a TipRecord>,
{
    let mut result = RoundResult::empty(round);

    for record in records.into_iter().filter(|r| r.round() == round) {
        result.total += 1;

        let evaluation = evaluate_tip(&record.tip, &record.game, settings);
        if let Some(diff) = evaluation.margin_accuracy {
            result.margin_diff = result.margin_diff.saturating_add(diff);
        }

        if let Some(correct) = evaluation.is_correct {
            result.decided += 1;
            if correct {
                result.correct += 1;
            }
            result.points = result.points.saturating_add(evaluation.points);
        }
    }

    result.bonus = all_correct_bonus(&result, settings);
    result.points = result.points.saturating_add(result.bonus);
    result
}

/// Bonus earned by a round, 0 when the rule is off or the round is not perfect
pub fn all_correct_bonus(result: &RoundResult, settings: &CompetitionSettings) -> i32 {
    if settings.all_correct_bonus && result.is_perfect() {
        settings.all_correct_bonus_points
    } else {
        0
    }
}

/// Group records by round number
pub fn group_by_round<'a, I>(records: I) -> BTreeMap<u32, Vec<&'a TipRecord>>
where
    I: IntoIterator<Item = &'a TipRecord>,
{
    let mut rounds: BTreeMap<u32, Vec<&'a TipRecord>> = BTreeMap::new();
    for record in records {
        rounds.entry(record.round()).or_default().push(record);
    }
    rounds
}

/// Full round breakdown for one user's tips, skipping rounds after `up_to_round`
pub fn aggregate_rounds<'a, I>(
    records: I,
    settings: &CompetitionSettings,
    up_to_round: Option<u32>,
) -> BTreeMap<u32, RoundResult>
where
    I: IntoIterator<Item = &'a TipRecord>,
{
    group_by_round(records)
        .into_iter()
        .filter(|(round, _)| up_to_round.map_or(true, |limit| *round <= limit))
        .map(|(round, tips)| (round, aggregate_round(round, tips, settings)))
        .collect()
}
