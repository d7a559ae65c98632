use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::scoring::SettingsConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Competition snapshot to read (default: ~/.config/tip-ladder/competition.json)
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Scoring options used wherever a competition leaves one unset
    #[serde(default)]
    pub scoring: Option<SettingsConfig>,
}

impl Config {
    pub fn default_scoring(&self) -> SettingsConfig {
        self.scoring.clone().unwrap_or_default()
    }
}
