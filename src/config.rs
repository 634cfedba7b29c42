//! Wizard Configuration
//!
//! Loads `WizardConfig` from a YAML file, then applies environment overrides.
//! A missing file is not an error: every field has a default matching the
//! agency's production setup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::ConfigError;
use crate::handoff::{HandoffTarget, DEFAULT_HANDOFF_NUMBER};
use crate::language::Language;

/// Env var naming the config file
pub const CONFIG_PATH_ENV: &str = "WIZARD_CONFIG";

/// Config file used when `WIZARD_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "config/wizard.yaml";

/// "Typing" delays applied before each assistant line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Delays {
    /// Before the welcome line
    pub welcome_ms: u64,
    /// Between the welcome line and the first question
    pub first_prompt_ms: u64,
    /// Before each later question
    pub prompt_ms: u64,
    /// Before the summary block
    pub summary_ms: u64,
}

impl Delays {
    /// No pacing at all
    pub const NONE: Delays = Delays {
        welcome_ms: 0,
        first_prompt_ms: 0,
        prompt_ms: 0,
        summary_ms: 0,
    };

    pub fn welcome(&self) -> Duration {
        Duration::from_millis(self.welcome_ms)
    }

    pub fn first_prompt(&self) -> Duration {
        Duration::from_millis(self.first_prompt_ms)
    }

    pub fn prompt(&self) -> Duration {
        Duration::from_millis(self.prompt_ms)
    }

    pub fn summary(&self) -> Duration {
        Duration::from_millis(self.summary_ms)
    }
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            welcome_ms: 500,
            first_prompt_ms: 500,
            prompt_ms: 500,
            summary_ms: 1500,
        }
    }
}

/// Runtime configuration of the wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// WhatsApp number receiving the handoff
    pub handoff_number: String,
    /// Currency shown after prices
    pub currency_label: String,
    /// Language a new session starts in
    pub default_language: Language,
    pub delays: Delays,
    /// YAML catalog replacing the built-in one
    pub catalog_path: Option<PathBuf>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            handoff_number: DEFAULT_HANDOFF_NUMBER.to_string(),
            currency_label: "DHS".to_string(),
            default_language: Language::Fr,
            delays: Delays::default(),
            catalog_path: None,
        }
    }
}

impl WizardConfig {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!("Loading wizard configuration from {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config: WizardConfig =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Parse a config file if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load from `WIZARD_CONFIG` (or the default path) and apply env overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load_or_default(Path::new(&path))?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `WIZARD_HANDOFF_NUMBER`, `WIZARD_LANGUAGE`, `WIZARD_CURRENCY`
    /// and `WIZARD_CATALOG` from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(number) = lookup("WIZARD_HANDOFF_NUMBER") {
            self.handoff_number = number;
        }
        if let Some(tag) = lookup("WIZARD_LANGUAGE") {
            self.default_language = tag.parse().map_err(|e| ConfigError::Invalid {
                key: "WIZARD_LANGUAGE".to_string(),
                message: format!("{}", e),
            })?;
        }
        if let Some(currency) = lookup("WIZARD_CURRENCY") {
            self.currency_label = currency;
        }
        if let Some(path) = lookup("WIZARD_CATALOG") {
            self.catalog_path = Some(PathBuf::from(path));
        }
        self.validate()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.currency_label.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "currency_label".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        self.handoff_target().map(|_| ())
    }

    pub fn handoff_target(&self) -> Result<HandoffTarget, ConfigError> {
        HandoffTarget::new(&self.handoff_number)
    }

    /// The configured catalog, or the built-in one
    pub fn catalog(&self) -> Result<Catalog, ConfigError> {
        match &self.catalog_path {
            Some(path) => Ok(Catalog::load(path)?),
            None => Ok(Catalog::builtin()),
        }
    }
}
