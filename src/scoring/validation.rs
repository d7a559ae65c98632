use std::collections::{BTreeMap, HashMap, HashSet};

use super::config::SettingsConfig;
use crate::model::{Game, GameId, TipRecord};

/// Validate scoring settings before they are resolved.
/// Returns all validation errors at once (not just the first).
pub fn validate_settings(config: &SettingsConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(points) = config.correct_tip_points {
        if points < 0 {
            errors.push("scoring.correct_tip_points: must be non-negative".to_string());
        }
    }

    if let Some(points) = config.margin_bonus_points {
        if points < 0 {
            errors.push("scoring.margin_bonus_points: must be non-negative".to_string());
        }
    }

    if let Some(points) = config.all_correct_bonus_points {
        if points < 0 {
            errors.push("scoring.all_correct_bonus_points: must be non-negative".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check a competition's tips for data problems the scorer tolerates but a
/// tipping admin should know about. Returns warnings, never fails.
///
/// - more than one tip for the same (user, game, competition)
/// - confidence outside 1..=N, where N is the number of fixtures in the round
/// - the same confidence value used twice by one user in one round
///
/// `games` is the competition's fixture list; a tipped game missing from it
/// still counts towards its round.
pub fn validate_tips(records: &[TipRecord], games: &[Game]) -> Vec<String> {
    let mut warnings = Vec::new();

    let mut games_per_round: HashMap<u32, HashSet<GameId>> = HashMap::new();
    for game in games {
        games_per_round.entry(game.round).or_default().insert(game.id);
    }
    for record in records {
        games_per_round
            .entry(record.round())
            .or_default()
            .insert(record.game.id);
    }

    let mut seen_slots = HashSet::new();
    // (user, competition, round) -> confidence -> games using it
    let mut confidence_use: BTreeMap<(&str, &str, u32), BTreeMap<u32, Vec<GameId>>> =
        BTreeMap::new();

    for record in records {
        let tip = &record.tip;
        let slot = (tip.user_id.as_str(), tip.game_id, tip.competition_id.as_str());
        if !seen_slots.insert(slot) {
            warnings.push(format!(
                "tips: duplicate tip for user '{}' on game {} in competition '{}'",
                tip.user_id, tip.game_id, tip.competition_id
            ));
            continue;
        }

        if let Some(confidence) = tip.confidence {
            let round = record.round();
            let games_in_round = games_per_round.get(&round).map_or(0, HashSet::len);
            if confidence == 0 || confidence as usize > games_in_round {
                warnings.push(format!(
                    "tips: user '{}' game {}: confidence {} outside 1..={} for round {}",
                    tip.user_id, tip.game_id, confidence, games_in_round, round
                ));
            }
            confidence_use
                .entry((tip.user_id.as_str(), tip.competition_id.as_str(), round))
                .or_default()
                .entry(confidence)
                .or_default()
                .push(tip.game_id);
        }
    }

    for ((user_id, _, round), by_value) in &confidence_use {
        for (confidence, games) in by_value {
            if games.len() > 1 {
                warnings.push(format!(
                    "tips: user '{}' used confidence {} on {} games in round {}",
                    user_id,
                    confidence,
                    games.len(),
                    round
                ));
            }
        }
    }

    warnings
}
