use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use super::storage::load_competition;
use super::types::CompetitionData;
use crate::leaderboard::{build_leaderboard_with_members, UserStanding};
use crate::model::{CompetitionId, Game, Member, TipRecord};
use crate::scoring::{CompetitionSettings, SettingsConfig};

/// Where competition data comes from. Passed explicitly to anything that
/// needs to fetch; the scoring functions themselves only take values.
pub trait CompetitionSource {
    /// Scoring settings, fully resolved against defaults
    fn settings(&self, competition_id: &str) -> Result<CompetitionSettings>;

    fn members(&self, competition_id: &str) -> Result<Vec<Member>>;

    fn games(&self, competition_id: &str) -> Result<Vec<Game>>;

    /// Tips joined with games and members, excluding rounds after `up_to_round`
    fn tip_records(&self, competition_id: &str, up_to_round: Option<u32>) -> Result<Vec<TipRecord>>;

    fn leaderboard(&self, competition_id: &str, up_to_round: Option<u32>) -> Result<Vec<UserStanding>> {
        let settings = self.settings(competition_id)?;
        let members = self.members(competition_id)?;
        let records = self.tip_records(competition_id, up_to_round)?;
        Ok(build_leaderboard_with_members(&records, &members, &settings, up_to_round))
    }
}

/// Competitions held in memory, keyed by id
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    competitions: HashMap<CompetitionId, CompetitionData>,
    defaults: SettingsConfig,
}

impl InMemorySource {
    pub fn new(competitions: Vec<CompetitionData>) -> Self {
        Self {
            competitions: competitions.into_iter().map(|c| (c.id.clone(), c)).collect(),
            defaults: SettingsConfig::default(),
        }
    }

    /// Settings used for options a competition leaves unset
    pub fn with_defaults(mut self, defaults: SettingsConfig) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn get(&self, competition_id: &str) -> Result<&CompetitionData> {
        match self.competitions.get(competition_id) {
            Some(data) => Ok(data),
            None => bail!("Unknown competition '{}'", competition_id),
        }
    }
}

impl CompetitionSource for InMemorySource {
    fn settings(&self, competition_id: &str) -> Result<CompetitionSettings> {
        Ok(self.get(competition_id)?.settings.merge(&self.defaults).resolve())
    }

    fn members(&self, competition_id: &str) -> Result<Vec<Member>> {
        Ok(self.get(competition_id)?.members.clone())
    }

    fn games(&self, competition_id: &str) -> Result<Vec<Game>> {
        Ok(self.get(competition_id)?.games.clone())
    }

    fn tip_records(&self, competition_id: &str, up_to_round: Option<u32>) -> Result<Vec<TipRecord>> {
        Ok(self.get(competition_id)?.records(up_to_round))
    }
}

/// A competition snapshot on disk, re-read on every call
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    defaults: SettingsConfig,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, defaults: SettingsConfig) -> Self {
        Self {
            path: path.into(),
            defaults,
        }
    }

    fn load(&self, competition_id: &str) -> Result<CompetitionData> {
        let data = load_competition(&self.path)?;
        if data.id != competition_id {
            bail!(
                "{} holds competition '{}', not '{}'",
                self.path.display(),
                data.id,
                competition_id
            );
        }
        Ok(data)
    }
}

impl CompetitionSource for FileSource {
    fn settings(&self, competition_id: &str) -> Result<CompetitionSettings> {
        let data = self.load(competition_id)?;
        Ok(data.settings.merge(&self.defaults).resolve())
    }

    fn members(&self, competition_id: &str) -> Result<Vec<Member>> {
        Ok(self.load(competition_id)?.members)
    }

    fn games(&self, competition_id: &str) -> Result<Vec<Game>> {
        Ok(self.load(competition_id)?.games)
    }

    fn tip_records(&self, competition_id: &str, up_to_round: Option<u32>) -> Result<Vec<TipRecord>> {
        let data = self
            .load(competition_id)
            .with_context(|| format!("Failed to load tips for '{}'", competition_id))?;
        Ok(data.records(up_to_round))
    }
}
