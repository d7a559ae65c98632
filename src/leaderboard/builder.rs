use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Member, TipRecord, UserId};
use crate::round::{aggregate_rounds, RoundResult};
use crate::scoring::CompetitionSettings;

/// A leaderboard row. Built fresh from tips on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStanding {
    pub user_id: UserId,
    pub username: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub total_points: i32,
    pub total_correct: u32,
    pub total_tips: u32,
    /// Tips on decided games; the accuracy denominator
    pub total_decided: u32,
    pub accuracy: f64,
    pub total_margin_diff: u32,
    pub rounds: BTreeMap<u32, RoundResult>,
    pub rank: u32,
    /// Positions gained since the previous round, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<i32>,
}

impl UserStanding {
    fn new(member: &Member) -> Self {
        Self {
            user_id: member.user_id.clone(),
            username: member.username.clone(),
            avatar: member.avatar.clone(),
            total_points: 0,
            total_correct: 0,
            total_tips: 0,
            total_decided: 0,
            accuracy: 0.0,
            total_margin_diff: 0,
            rounds: BTreeMap::new(),
            rank: 0,
            change: None,
        }
    }

    fn absorb_rounds(&mut self, rounds: BTreeMap<u32, RoundResult>) {
        for result in rounds.values() {
            self.total_points = self.total_points.saturating_add(result.points);
            self.total_correct += result.correct;
            self.total_tips += result.total;
            self.total_decided += result.decided;
            self.total_margin_diff = self.total_margin_diff.saturating_add(result.margin_diff);
        }
        self.accuracy = if self.total_decided > 0 {
            f64::from(self.total_correct) / f64::from(self.total_decided) * 100.0
        } else {
            0.0
        };
        self.rounds = rounds;
    }
}

/// Build the ranked leaderboard from a competition's tips.
///
/// Only users with at least one tip (up to `up_to_round`) appear; use
/// [`build_leaderboard_with_members`] to list every member.
pub fn build_leaderboard(
    records: &[TipRecord],
    settings: &CompetitionSettings,
    up_to_round: Option<u32>,
) -> Vec<UserStanding> {
    build_leaderboard_with_members(records, &[], settings, up_to_round)
}

/// Build the leaderboard with every member of `members` present, even those
/// with no tips (all-zero rows).
pub fn build_leaderboard_with_members(
    records: &[TipRecord],
    members: &[Member],
    settings: &CompetitionSettings,
    up_to_round: Option<u32>,
) -> Vec<UserStanding> {
    let mut grouped: BTreeMap<&str, (&Member, Vec<&TipRecord>)> = BTreeMap::new();

    for member in members {
        grouped
            .entry(member.user_id.as_str())
            .or_insert_with(|| (member, Vec::new()));
    }

    for record in records {
        if up_to_round.map_or(false, |limit| record.round() > limit) {
            continue;
        }
        grouped
            .entry(record.tip.user_id.as_str())
            .or_insert_with(|| (&record.member, Vec::new()))
            .1
            .push(record);
    }

    let mut standings: Vec<UserStanding> = grouped
        .into_values()
        .map(|(member, tips)| {
            let mut standing = UserStanding::new(member);
            standing.absorb_rounds(aggregate_rounds(tips, settings, up_to_round));
            standing
        })
        .collect();

    rank_standings(&mut standings);

    tracing::debug!(
        users = standings.len(),
        up_to_round = ?up_to_round,
        "built leaderboard"
    );

    standings
}

/// Leaderboard order: points (desc), margin difference (asc), accuracy
/// (desc), username (asc). User id settles identical usernames.
pub fn compare_standings(a: &UserStanding, b: &UserStanding) -> Ordering {
    b.total_points
        .cmp(&a.total_points)
        .then_with(|| a.total_margin_diff.cmp(&b.total_margin_diff))
        .then_with(|| b.accuracy.total_cmp(&a.accuracy))
        .then_with(|| a.username.cmp(&b.username))
        .then_with(|| a.user_id.cmp(&b.user_id))
}

/// Sort and assign 1-based ranks. Ranks are never shared.
pub fn rank_standings(standings: &mut [UserStanding]) {
    standings.sort_by(compare_standings);
    for (idx, standing) in standings.iter_mut().enumerate() {
        standing.rank = idx as u32 + 1;
    }
}
