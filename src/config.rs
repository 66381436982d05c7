use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use validator::Validate;

use crate::core::DiversityReranker;
use crate::models::{EngineTables, ScoringWeights};
use crate::services::{AuditRules, FieldProtector, ProtectionError, ProtectionSettings};

/// Errors that can occur while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Engine configuration
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct Settings {
    #[serde(default)]
    #[validate(nested)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub tables: EngineTables,
    #[serde(default)]
    #[validate(nested)]
    pub rerank: RerankSettings,
    #[serde(default)]
    pub moderation: AuditRules,
    #[serde(default)]
    pub protection: ProtectionSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ScoringSettings {
    #[serde(default)]
    #[validate(nested)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WeightsConfig {
    #[serde(default = "default_interest_weight")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub interest: f64,
    #[serde(default = "default_needs_weight")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub needs: f64,
    #[serde(default = "default_values_weight")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub values: f64,
    #[serde(default = "default_appearance_weight")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub appearance: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            interest: default_interest_weight(),
            needs: default_needs_weight(),
            values: default_values_weight(),
            appearance: default_appearance_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            interest: config.interest,
            needs: config.needs,
            values: config.values,
            appearance: config.appearance,
        }
    }
}

fn default_interest_weight() -> f64 { 0.4 }
fn default_needs_weight() -> f64 { 0.3 }
fn default_values_weight() -> f64 { 0.2 }
fn default_appearance_weight() -> f64 { 0.1 }

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RerankSettings {
    #[serde(default = "default_penalty_per_tag")]
    #[validate(range(min = 0.0))]
    pub penalty_per_tag: f64,
    #[serde(default = "default_top_n")]
    #[validate(range(min = 1))]
    pub top_n: usize,
}

impl Default for RerankSettings {
    fn default() -> Self {
        Self {
            penalty_per_tag: default_penalty_per_tag(),
            top_n: default_top_n(),
        }
    }
}

impl From<&RerankSettings> for DiversityReranker {
    fn from(settings: &RerankSettings) -> Self {
        DiversityReranker::new(settings.penalty_per_tag, settings.top_n)
    }
}

fn default_penalty_per_tag() -> f64 { 0.1 }
fn default_top_n() -> usize { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MATCH_)
    pub fn load() -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., MATCH__SCORING__WEIGHTS__INTEREST -> scoring.weights.interest
            .add_source(environment())
            .build()?;

        Self::finish(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        Self::finish(settings)
    }

    fn finish(settings: Config) -> Result<Self, SettingsError> {
        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }

    pub fn reranker(&self) -> DiversityReranker {
        DiversityReranker::from(&self.rerank)
    }

    /// Build the field protector from the configured key source
    pub fn field_protector(&self) -> Result<FieldProtector, ProtectionError> {
        FieldProtector::from_settings(&self.protection)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
