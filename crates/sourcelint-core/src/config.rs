//! Configuration schema (sourcelint.toml)

use crate::rule_id::RuleId;
use serde::{Deserialize, Serialize};

/// Which rules to run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSelection {
    /// Rule ids (`module.Name`) to leave out of the rule set
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl RuleSelection {
    /// Parse the disabled list into rule ids
    pub fn disabled_ids(&self) -> Result<Vec<RuleId>, ConfigError> {
        self.disabled
            .iter()
            .map(|s| s.parse().map_err(|_| ConfigError::UnknownRule(s.clone())))
            .collect()
    }

    /// Check if a rule should run
    pub fn is_enabled(&self, rule: RuleId) -> bool {
        !self.disabled.iter().any(|s| s == rule.as_str())
    }

    /// Disable a rule
    pub fn disable(&mut self, rule: RuleId) {
        if self.is_enabled(rule) {
            self.disabled.push(rule.as_str().to_string());
        }
    }
}

/// Extra host lists on top of the built-in ones
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainLists {
    /// Hosts known to serve https (exact match on the `www.`-less domain)
    #[serde(default)]
    pub secure: Vec<String>,

    /// Multi-tenant parents whose every subdomain serves https
    #[serde(default)]
    pub secure_suffixes: Vec<String>,

    /// Twitter mirror and embed-fixer hosts
    #[serde(default)]
    pub twitter_mirrors: Vec<String>,
}

/// Length thresholds for the free-text misuse rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MisuseThresholds {
    /// Minimum length (in characters) for a source to look like a tag list
    #[serde(default = "default_tags_min_length")]
    pub tags_min_length: usize,

    /// Minimum length (in characters) for a source to look like a message
    #[serde(default = "default_text_min_length")]
    pub text_min_length: usize,
}

fn default_tags_min_length() -> usize {
    70
}

fn default_text_min_length() -> usize {
    50
}

impl Default for MisuseThresholds {
    fn default() -> Self {
        Self {
            tags_min_length: default_tags_min_length(),
            text_min_length: default_text_min_length(),
        }
    }
}

/// Batch scan settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Scan posts in parallel
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_parallel() -> bool {
    true
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Rule selection
    #[serde(default)]
    pub rules: RuleSelection,

    /// Host lists
    #[serde(default)]
    pub domains: DomainLists,

    /// Misuse rule thresholds
    #[serde(default)]
    pub misuse: MisuseThresholds,

    /// Scan settings
    #[serde(default)]
    pub scan: ScanSettings,

    /// Directory the config was loaded from (for resolving relative paths)
    #[serde(skip)]
    pub project_root: std::path::PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules: RuleSelection::default(),
            domains: DomainLists::default(),
            misuse: MisuseThresholds::default(),
            scan: ScanSettings::default(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rules.disabled_ids()?;
        if self.misuse.text_min_length == 0 || self.misuse.tags_min_length == 0 {
            return Err(ConfigError::InvalidValue(
                "misuse thresholds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Unknown rule id in [rules].disabled: {0}")]
    UnknownRule(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
