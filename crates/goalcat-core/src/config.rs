use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GoalcatError, Result};
use crate::params::ScoringParams;

const CONFIG_FILE: &str = "config.toml";
const CONFIG_DIR: &str = ".goalcat";

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# goalcat configuration file
# Location: ~/.goalcat/config.toml

[lexicon]
# Keyword lexicon to use instead of the built-in one
# Default: built-in
# Example: path = "/home/me/goalcat/lexicon.toml"

[rules]
# Context rules to use instead of the built-in ones
# Default: built-in
# Example: path = "/home/me/goalcat/rules.toml"

[scoring]
# Minimum adjusted score for a category to be returned
confidence_floor = 0.5
# Extra score per additional word in a matched phrase
phrase_bonus = 0.3

# Purchase intent
purchase_boost = 0.8
item_category_penalty = 0.3
purchase_subcategory_boost = 0.5
necessity_fallback_boost = 0.3

# Boost for the winning side of a context split
context_boost = 0.5

# Health/sport bonus for activity words at gym hours
time_sport_bonus = 0.3

# Cross-category penalties
shopping_dominance = 0.7
productivity_dominance = 0.7
specific_dominance = 0.8
cross_penalty = 0.3
"#;

/// Global configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub lexicon: SourceConfig,

    #[serde(default)]
    pub rules: SourceConfig,

    #[serde(default)]
    pub scoring: ScoringParams,
}

/// Location of an external data document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SourceConfig {
    /// Use the built-in document when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content).map_err(|e| GoalcatError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// `~/.goalcat`
    pub fn default_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(GoalcatError::HomeNotFound)?;
        Ok(home.join(CONFIG_DIR))
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "lexicon.path" => Some(display_path(&self.lexicon.path)),
            "rules.path" => Some(display_path(&self.rules.path)),
            _ => {
                let param = key.strip_prefix("scoring.")?;
                self.scoring.get(param).map(|v| v.to_string())
            }
        }
    }

    /// Set a config value by dot-notation key
    ///
    /// An empty path resets the source to the built-in document.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "lexicon.path" => {
                self.lexicon.path = parse_path(value);
                Ok(())
            }
            "rules.path" => {
                self.rules.path = parse_path(value);
                Ok(())
            }
            _ => {
                let param =
                    key.strip_prefix("scoring.")
                        .ok_or_else(|| GoalcatError::ConfigKeyNotFound {
                            key: key.to_string(),
                        })?;
                let number: f64 =
                    value
                        .trim()
                        .parse()
                        .map_err(|_| GoalcatError::InvalidConfigValue {
                            key: key.to_string(),
                            value: value.to_string(),
                            reason: "expected a number".to_string(),
                        })?;
                self.scoring.set(param, number)
            }
        }
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        let mut entries = vec![
            ("lexicon.path".to_string(), display_path(&self.lexicon.path)),
            ("rules.path".to_string(), display_path(&self.rules.path)),
        ];
        for key in ScoringParams::KEYS {
            if let Some(value) = self.scoring.get(key) {
                entries.push((format!("scoring.{}", key), value.to_string()));
            }
        }
        entries
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => p.display().to_string(),
        None => "(builtin)".to_string(),
    }
}

fn parse_path(value: &str) -> Option<PathBuf> {
    let trimmed = value.trim().trim_matches('"').trim_matches('\'');
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(temp.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_template_matches_defaults() {
        let temp = TempDir::new().unwrap();
        let path = Config::init(temp.path()).unwrap();
        assert!(path.exists());

        let config = Config::load(temp.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_init_keeps_existing_file() {
        let temp = TempDir::new().unwrap();
        fs::write(Config::path(temp.path()), "[scoring]\nphrase_bonus = 0.4\n").unwrap();

        Config::init(temp.path()).unwrap();
        let config = Config::load(temp.path()).unwrap();
        assert_eq!(config.scoring.phrase_bonus, 0.4);
    }

    #[test]
    fn test_partial_scoring_section() {
        let temp = TempDir::new().unwrap();
        fs::write(
            Config::path(temp.path()),
            "[scoring]\nconfidence_floor = 0.7\n",
        )
        .unwrap();

        let config = Config::load(temp.path()).unwrap();
        assert_eq!(config.scoring.confidence_floor, 0.7);
        assert_eq!(config.scoring.phrase_bonus, 0.3);
        assert_eq!(config.lexicon.path, None);
    }

    #[test]
    fn test_config_get_set() {
        let mut config = Config::default();

        config.set("scoring.context_boost", "0.6").unwrap();
        assert_eq!(config.get("scoring.context_boost").unwrap(), "0.6");

        config.set("lexicon.path", "/tmp/lexicon.toml").unwrap();
        assert_eq!(config.get("lexicon.path").unwrap(), "/tmp/lexicon.toml");

        config.set("lexicon.path", "").unwrap();
        assert_eq!(config.lexicon.path, None);
        assert_eq!(config.get("lexicon.path").unwrap(), "(builtin)");
    }

    #[test]
    fn test_unknown_keys() {
        let mut config = Config::default();
        assert!(config.get("profile.exclude").is_none());
        assert!(config.get("scoring.nope").is_none());

        let err = config.set("scoring.nope", "1").unwrap_err();
        assert!(matches!(err, GoalcatError::ConfigKeyNotFound { ref key } if key == "scoring.nope"));

        let err = config.set("nope", "1").unwrap_err();
        assert!(matches!(err, GoalcatError::ConfigKeyNotFound { .. }));
    }

    #[test]
    fn test_invalid_values() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("scoring.phrase_bonus", "lots"),
            Err(GoalcatError::InvalidConfigValue { .. })
        ));
        assert!(matches!(
            config.set("scoring.phrase_bonus", "-1"),
            Err(GoalcatError::InvalidConfigValue { .. })
        ));
        assert_eq!(config.scoring.phrase_bonus, 0.3);
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.set("rules.path", "rules.toml").unwrap();
        config.set("scoring.cross_penalty", "0.25").unwrap();
        config.save(temp.path()).unwrap();

        let loaded = Config::load(temp.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_list_covers_every_key() {
        let config = Config::default();
        let keys: Vec<_> = config.list().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys.len(), 2 + ScoringParams::KEYS.len());
        for key in &keys {
            assert!(config.get(key).is_some(), "{key} should be readable");
        }
    }

    #[test]
    fn test_parse_error_names_file() {
        let temp = TempDir::new().unwrap();
        fs::write(Config::path(temp.path()), "[scoring\n").unwrap();

        let err = Config::load(temp.path()).unwrap_err();
        assert!(matches!(err, GoalcatError::ConfigParse { .. }));
        assert_eq!(err.exit_code(), 4);
    }
}
