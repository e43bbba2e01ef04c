//! Toolkit settings, loaded from defaults, an optional TOML file and
//! environment variables (highest priority).
//!
//! Environment overrides use the pattern `FORMBOX__<section>__<key>`,
//! e.g. `FORMBOX__DISPATCH__DEBUG_MODE=true`. The config file path
//! defaults to `config/formbox.toml` and can be overridden with
//! `FORMBOX_CONFIG`.

use std::env;
use std::path::PathBuf;

use config::{Environment, File};
use serde::Deserialize;
use thiserror::Error;

const CONFIG_ENV_VAR: &str = "FORMBOX_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/formbox.toml";
const ENV_PREFIX: &str = "FORMBOX";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dispatch: DispatchSettings,
    pub forms: FormSettings,
}

/// Settings consumed by the dispatcher.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    /// When set, unknown-exception pages include the error message.
    pub debug_mode: bool,
}

/// Defaults applied when building form schemas.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FormSettings {
    /// Year window on each side of the reference date for date fields.
    pub date_past_years: i32,
    pub date_future_years: i32,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            date_past_years: 10,
            date_future_years: 10,
        }
    }
}

impl Settings {
    /// Loads settings from all sources (optional file + environment).
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = env::var(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load_from_path(config_path)
    }

    /// Loads settings from a specific path; useful for tests.
    pub fn load_from_path(config_path: PathBuf) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if config_path.exists() {
            tracing::info!("Loading configuration from: {}", config_path.display());
            builder = builder.add_source(File::from(config_path).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        );

        let settings = builder.build()?;
        Ok(settings.try_deserialize()?)
    }
}
