use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{CompetitionId, Game, GameId, Member, Tip, TipRecord};
use crate::recalc::{Recalculation, RoundBonus};
use crate::scoring::SettingsConfig;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything the engine needs to score one competition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionData {
    pub version: u32,
    pub id: CompetitionId,
    pub name: String,
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub games: Vec<Game>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub tips: Vec<Tip>,
    #[serde(default)]
    pub round_bonuses: Vec<RoundBonus>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CompetitionData {
    pub fn new(id: impl Into<CompetitionId>, name: impl Into<String>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            id: id.into(),
            name: name.into(),
            settings: SettingsConfig::default(),
            games: Vec::new(),
            members: Vec::new(),
            tips: Vec::new(),
            round_bonuses: Vec::new(),
            updated_at: None,
        }
    }

    pub fn game(&self, game_id: GameId) -> Option<&Game> {
        self.games.iter().find(|g| g.id == game_id)
    }

    /// Insert a tip, replacing any existing tip for the same
    /// (user, game, competition). Returns true if a tip was replaced.
    ///
    /// Computed values belong to recalculation: a replacement with the same
    /// prediction keeps the stored ones, anything else starts unscored.
    pub fn upsert_tip(&mut self, mut tip: Tip) -> bool {
        match self.tips.iter_mut().find(|existing| existing.same_slot(&tip)) {
            Some(existing) => {
                if existing.same_prediction(&tip) {
                    tip.points = existing.points;
                    tip.is_correct = existing.is_correct;
                    tip.margin_accuracy = existing.margin_accuracy;
                    tip.margin_rank = existing.margin_rank;
                } else {
                    tip.clear_scores();
                }
                *existing = tip;
                true
            }
            None => {
                tip.clear_scores();
                self.tips.push(tip);
                false
            }
        }
    }

    /// Round numbers that have fixtures, ascending
    pub fn rounds(&self) -> Vec<u32> {
        self.games
            .iter()
            .map(|g| g.round)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Highest round with at least one completed game
    pub fn latest_completed_round(&self) -> Option<u32> {
        self.games
            .iter()
            .filter(|g| g.is_complete)
            .map(|g| g.round)
            .max()
    }

    /// Join this competition's tips with their games and members.
    ///
    /// Tips for another competition or an unknown game are skipped. A tipper
    /// missing from `members` is shown under their user id.
    pub fn records(&self, up_to_round: Option<u32>) -> Vec<TipRecord> {
        let games: HashMap<GameId, &Game> = self.games.iter().map(|g| (g.id, g)).collect();
        let members: HashMap<&str, &Member> = self
            .members
            .iter()
            .map(|m| (m.user_id.as_str(), m))
            .collect();

        self.tips
            .iter()
            .filter(|tip| tip.competition_id == self.id)
            .filter_map(|tip| {
                let Some(game) = games.get(&tip.game_id) else {
                    tracing::warn!(
                        competition = %self.id,
                        user = %tip.user_id,
                        game_id = tip.game_id,
                        "tip references unknown game, skipping"
                    );
                    return None;
                };
                if up_to_round.map_or(false, |limit| game.round > limit) {
                    return None;
                }
                let member = members
                    .get(tip.user_id.as_str())
                    .map(|m| (*m).clone())
                    .unwrap_or_else(|| Member::new(tip.user_id.clone(), tip.user_id.clone()));
                Some(TipRecord::new(tip.clone(), (*game).clone(), member))
            })
            .collect()
    }

    /// Store recalculated values on the tips and replace this competition's
    /// bonus ledger.
    pub fn apply_recalculation(&mut self, recalculation: &Recalculation) -> usize {
        let id = self.id.clone();
        let scores: HashMap<(&str, GameId), _> = recalculation
            .tips
            .iter()
            .filter(|s| s.competition_id == id)
            .map(|s| ((s.user_id.as_str(), s.game_id), s))
            .collect();

        let mut updated = 0;
        for tip in self.tips.iter_mut().filter(|t| t.competition_id == id) {
            if let Some(score) = scores.get(&(tip.user_id.as_str(), tip.game_id)) {
                score.write_to(tip);
                updated += 1;
            }
        }

        self.round_bonuses.retain(|b| b.competition_id != id);
        self.round_bonuses.extend(
            recalculation
                .bonuses
                .iter()
                .filter(|b| b.competition_id == id)
                .cloned(),
        );
        self.updated_at = Some(recalculation.calculated_at);
        updated
    }
}
