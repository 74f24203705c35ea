use crate::constants::{get_supported_sites, DEFAULT_USER_AGENT};
use crate::error::{Result, ScoutError};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::Semaphore;

pub const CONFIG_PATH_ENV: &str = "TALENT_SCOUT_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub acquisition: AcquisitionConfig,
    pub scoring: ScoringConfig,
    pub skills: SkillsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Enabled sites, in result order
    pub sites: Vec<String>,
    /// Upper bound on in-flight profile page requests
    pub max_concurrent_fetches: usize,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            sites: get_supported_sites().into_iter().map(String::from).collect(),
            max_concurrent_fetches: 8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub skills_weight: f64,
    pub position_weight: f64,
    pub experience_weight: f64,
    pub location_weight: f64,
    pub employment_type_weight: f64,
    pub experience_bonus_cap: f64,
    pub experience_penalty_rate: f64,
    pub clamp_to_hundred: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            skills_weight: 25.0,
            position_weight: 25.0,
            experience_weight: 35.0,
            location_weight: 10.0,
            employment_type_weight: 10.0,
            experience_bonus_cap: 0.3,
            experience_penalty_rate: 0.4,
            clamp_to_hundred: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SkillsConfig {
    /// Canonical skill -> synonyms, merged over the built-in table
    pub synonyms: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: String,
    pub file_name: String,
    /// Used when RUST_LOG is not set
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            file_name: "talent_scout.log".to_string(),
            default_filter: "talent_scout=info,warn".to_string(),
        }
    }
}

impl Config {
    /// `$TALENT_SCOUT_CONFIG`, falling back to `config.toml`
    pub fn default_path() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Loads from [`default_path`](Self::default_path). Returns `None` as the
    /// source when no file exists and defaults were used.
    pub fn load() -> Result<(Self, Option<PathBuf>)> {
        let path = Self::default_path();
        if !path.exists() {
            return Ok((Self::default(), None));
        }
        let config = Self::load_from(&path)?;
        Ok((config, Some(path)))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScoutError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let fetches = self.acquisition.max_concurrent_fetches;
        if fetches == 0 || fetches > Semaphore::MAX_PERMITS {
            return Err(ScoutError::Config(format!(
                "acquisition.max_concurrent_fetches must be between 1 and {}, got {}",
                Semaphore::MAX_PERMITS,
                fetches
            )));
        }
        let weights = [
            ("skills_weight", self.scoring.skills_weight),
            ("position_weight", self.scoring.position_weight),
            ("experience_weight", self.scoring.experience_weight),
            ("location_weight", self.scoring.location_weight),
            ("employment_type_weight", self.scoring.employment_type_weight),
            ("experience_bonus_cap", self.scoring.experience_bonus_cap),
            ("experience_penalty_rate", self.scoring.experience_penalty_rate),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoutError::Config(format!(
                    "scoring.{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
