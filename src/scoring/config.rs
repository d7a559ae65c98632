use serde::{Deserialize, Serialize};

pub const DEFAULT_CORRECT_TIP_POINTS: i32 = 1;
pub const DEFAULT_MARGIN_BONUS_THRESHOLD: u32 = 5;
pub const DEFAULT_MARGIN_BONUS_POINTS: i32 = 1;
pub const DEFAULT_ALL_CORRECT_BONUS_POINTS: i32 = 1;

/// Competition scoring options as written in config or stored with a
/// competition. Any option left out falls back to its default on `resolve()`.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   correct_tip_points: 2
///   confidence_enabled: true
///   margin_bonus_enabled: true
///   margin_bonus_threshold: 6
///   margin_bonus_points: 3
///   all_correct_bonus: true
///   all_correct_bonus_points: 5
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SettingsConfig {
    /// Points for picking the winner (default: 1)
    #[serde(default)]
    pub correct_tip_points: Option<i32>,

    /// Multiply correct-tip points by the tip's confidence value
    #[serde(default)]
    pub confidence_enabled: Option<bool>,

    #[serde(default)]
    pub margin_bonus_enabled: Option<bool>,

    /// Largest |actual margin - predicted margin| that still earns the bonus
    #[serde(default)]
    pub margin_bonus_threshold: Option<u32>,

    #[serde(default)]
    pub margin_bonus_points: Option<i32>,

    /// Award a bonus once per round when every decided tip was correct
    #[serde(default)]
    pub all_correct_bonus: Option<bool>,

    #[serde(default)]
    pub all_correct_bonus_points: Option<i32>,
}

impl SettingsConfig {
    /// Layer `self` over `fallback`: options set here win, the rest come from `fallback`.
    pub fn merge(&self, fallback: &SettingsConfig) -> SettingsConfig {
        SettingsConfig {
            correct_tip_points: self.correct_tip_points.or(fallback.correct_tip_points),
            confidence_enabled: self.confidence_enabled.or(fallback.confidence_enabled),
            margin_bonus_enabled: self.margin_bonus_enabled.or(fallback.margin_bonus_enabled),
            margin_bonus_threshold: self
                .margin_bonus_threshold
                .or(fallback.margin_bonus_threshold),
            margin_bonus_points: self.margin_bonus_points.or(fallback.margin_bonus_points),
            all_correct_bonus: self.all_correct_bonus.or(fallback.all_correct_bonus),
            all_correct_bonus_points: self
                .all_correct_bonus_points
                .or(fallback.all_correct_bonus_points),
        }
    }

    /// Fill every unset option with its default
    pub fn resolve(&self) -> CompetitionSettings {
        let defaults = CompetitionSettings::default();
        CompetitionSettings {
            correct_tip_points: self
                .correct_tip_points
                .unwrap_or(defaults.correct_tip_points),
            confidence_enabled: self
                .confidence_enabled
                .unwrap_or(defaults.confidence_enabled),
            margin_bonus_enabled: self
                .margin_bonus_enabled
                .unwrap_or(defaults.margin_bonus_enabled),
            margin_bonus_threshold: self
                .margin_bonus_threshold
                .unwrap_or(defaults.margin_bonus_threshold),
            margin_bonus_points: self
                .margin_bonus_points
                .unwrap_or(defaults.margin_bonus_points),
            all_correct_bonus: self.all_correct_bonus.unwrap_or(defaults.all_correct_bonus),
            all_correct_bonus_points: self
                .all_correct_bonus_points
                .unwrap_or(defaults.all_correct_bonus_points),
        }
    }
}

/// Fully resolved scoring settings. This is the only form the scoring
/// functions accept, so every option always has a value.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct CompetitionSettings {
    pub correct_tip_points: i32,
    pub confidence_enabled: bool,
    pub margin_bonus_enabled: bool,
    pub margin_bonus_threshold: u32,
    pub margin_bonus_points: i32,
    pub all_correct_bonus: bool,
    pub all_correct_bonus_points: i32,
}

impl Default for CompetitionSettings {
    fn default() -> Self {
        Self {
            correct_tip_points: DEFAULT_CORRECT_TIP_POINTS,
            confidence_enabled: false,
            margin_bonus_enabled: false,
            margin_bonus_threshold: DEFAULT_MARGIN_BONUS_THRESHOLD,
            margin_bonus_points: DEFAULT_MARGIN_BONUS_POINTS,
            all_correct_bonus: false,
            all_correct_bonus_points: DEFAULT_ALL_CORRECT_BONUS_POINTS,
        }
    }
}

impl CompetitionSettings {
    pub fn with_correct_tip_points(mut self, points: i32) -> Self {
        self.correct_tip_points = points;
        self
    }

    pub fn with_confidence(mut self) -> Self {
        self.confidence_enabled = true;
        self
    }

    pub fn with_margin_bonus(mut self, threshold: u32, points: i32) -> Self {
        self.margin_bonus_enabled = true;
        self.margin_bonus_threshold = threshold;
        self.margin_bonus_points = points;
        self
    }

    pub fn with_all_correct_bonus(mut self, points: i32) -> Self {
        self.all_correct_bonus = true;
        self.all_correct_bonus_points = points;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = CompetitionSettings::default();

        assert_eq!(settings.correct_tip_points, 1);
        assert!(!settings.confidence_enabled);
        assert!(!settings.margin_bonus_enabled);
        assert!(!settings.all_correct_bonus);
    }

    #[test]
    fn test_empty_config_resolves_to_defaults() {
        let config: SettingsConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, SettingsConfig::default());
        assert_eq!(config.resolve(), CompetitionSettings::default());
    }

    #[test]
    fn test_partial_config_parse() {
        let yaml = r#"
correct_tip_points: 2
confidence_enabled: true
"#;
        let config: SettingsConfig = serde_saphyr::from_str(yaml).unwrap();
        let settings = config.resolve();
        assert_eq!(settings.correct_tip_points, 2);
        assert!(settings.confidence_enabled);
        assert!(!settings.margin_bonus_enabled);
        assert_eq!(settings.margin_bonus_threshold, DEFAULT_MARGIN_BONUS_THRESHOLD);
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
correct_tip_points: 1
confidence_enabled: true
margin_bonus_enabled: true
margin_bonus_threshold: 10
margin_bonus_points: 2
all_correct_bonus: true
all_correct_bonus_points: 5
"#;
        let config: SettingsConfig = serde_saphyr::from_str(yaml).unwrap();
        let settings = config.resolve();
        assert_eq!(
            settings,
            CompetitionSettings::default()
                .with_confidence()
                .with_margin_bonus(10, 2)
                .with_all_correct_bonus(5)
        );
    }

    #[test]
    fn test_unknown_option_rejected() {
        let yaml = "confidence_multiplier: 2";
        let result: Result<SettingsConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_numeric_threshold_rejected() {
        let yaml = "margin_bonus_threshold: lots";
        let result: Result<SettingsConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_prefers_own_values() {
        let competition = SettingsConfig {
            correct_tip_points: Some(3),
            ..Default::default()
        };
        let app = SettingsConfig {
            correct_tip_points: Some(1),
            margin_bonus_enabled: Some(true),
            ..Default::default()
        };

        let merged = competition.merge(&app);
        assert_eq!(merged.correct_tip_points, Some(3));
        assert_eq!(merged.margin_bonus_enabled, Some(true));
        assert!(merged.all_correct_bonus.is_none());
    }

    #[test]
    fn test_settings_serde_roundtrip() {
        let settings = CompetitionSettings::default().with_margin_bonus(6, 3);
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: CompetitionSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, parsed);
    }
}
