use std::collections::HashMap;

use anyhow::Result;

use super::builder::UserStanding;
use crate::store::CompetitionSource;

/// Fill `change` on each current standing from its rank in `previous`.
/// Positive means the user moved up. Users missing from `previous` get `None`.
pub fn apply_rank_changes(mut current: Vec<UserStanding>, previous: &[UserStanding]) -> Vec<UserStanding> {
    let previous_ranks: HashMap<&str, u32> = previous
        .iter()
        .map(|s| (s.user_id.as_str(), s.rank))
        .collect();

    for standing in &mut current {
        standing.change = previous_ranks
            .get(standing.user_id.as_str())
            .map(|prev| *prev as i32 - standing.rank as i32);
    }
    current
}

/// Leaderboard as of `current_round` with position changes against the round before.
///
/// Round 1 (or 0) has nothing to compare with, so every `change` is `None`.
/// If the previous-round leaderboard cannot be produced the current one is
/// still returned, just without changes.
pub fn with_rank_changes<S>(source: &S, competition_id: &str, current_round: u32) -> Result<Vec<UserStanding>>
where
    S: CompetitionSource + ?Sized,
{
    let current = source.leaderboard(competition_id, Some(current_round))?;
    if current_round <= 1 {
        return Ok(current);
    }

    match source.leaderboard(competition_id, Some(current_round - 1)) {
        Ok(previous) => Ok(apply_rank_changes(current, &previous)),
        Err(e) => {
            tracing::warn!(
                competition_id,
                current_round,
                error = %e,
                "previous round leaderboard unavailable, returning without rank changes"
            );
            Ok(current)
        }
    }
}
