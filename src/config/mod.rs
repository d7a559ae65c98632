mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/tip-ladder/)
pub fn get_config_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(".config").join("tip-ladder"),
        None => PathBuf::from(".tip-ladder"),
    }
}

/// Get the default config file path (~/.config/tip-ladder/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/tip-ladder/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
///
/// A missing default config file is not an error; every option has a default.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_missing_explicit_config_errors() {
        let path = env::temp_dir().join("tip_ladder_test_no_config.yaml");
        let _ = fs::remove_file(&path);
        assert!(load_config(Some(path)).is_err());
    }

    #[test]
    fn test_load_config_file() {
        let path = env::temp_dir().join("tip_ladder_test_config.yaml");
        fs::write(
            &path,
            r#"
data_file: /tmp/comp.json
scoring:
  correct_tip_points: 2
  all_correct_bonus: true
"#,
        )
        .unwrap();

        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.data_file, Some(PathBuf::from("/tmp/comp.json")));
        let settings = config.default_scoring().resolve();
        assert_eq!(settings.correct_tip_points, 2);
        assert!(settings.all_correct_bonus);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_yaml_errors() {
        let path = env::temp_dir().join("tip_ladder_test_bad_config.yaml");
        fs::write(&path, "scoring:\n  correct_tip_points: [1, 2]\n").unwrap();
        assert!(load_config(Some(path.clone())).is_err());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_empty_config_parse() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }
}
