//! # cspm-config
//!
//! Layered configuration loading for cspm-utils using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CSPM_*` prefix, `__` as separator)
//! 2. Legacy `SYSDIG_API_TOKEN` / `SYSDIG_API_URL` variables
//! 3. An explicit config file (`--config <path>`)
//! 4. Project-level `.cspm/config.toml`
//! 5. User-level `~/.config/cspm-utils/config.toml`
//! 6. Built-in defaults
//!
//! Command-line flags are merged on top by the binary.
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CSPM_API__TOKEN` -> `api.token`, `CSPM_COLLECT__BATCH_SIZE` ->
//! `collect.batch_size`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use cspm_config::CspmConfig;
//!
//! let config = CspmConfig::load(None).expect("config");
//! println!("API: {}", config.api.url);
//! ```

mod api;
mod collect;
mod database;
mod error;

pub use api::{ApiConfig, DEFAULT_API_URL};
pub use collect::{CollectConfig, DEFAULT_ZONE};
pub use database::DatabaseConfig;
pub use error::ConfigError;

use figment::{
    Figment, Provider,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variables read for backwards compatibility with older scripts.
const LEGACY_ENV: [&str; 2] = ["SYSDIG_API_TOKEN", "SYSDIG_API_URL"];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CspmConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub collect: CollectConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl CspmConfig {
    /// Load configuration from all sources.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_overrides`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source cannot be parsed or a
    /// value has the wrong type.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::figment(config_file).extract().map_err(ConfigError::from)
    }

    /// Load configuration after reading `.env` from the current directory,
    /// with `overrides` (typically command-line flags) merged above every
    /// other source.
    ///
    /// Variables already present in the process environment are not
    /// overwritten by the file.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_overrides<P: Provider>(
        config_file: Option<&Path>,
        overrides: P,
    ) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::figment(config_file)
            .merge(overrides)
            .extract()
            .map_err(ConfigError::from)
    }

    /// Build the figment provider chain.
    ///
    /// Public so callers can merge further providers (command-line flags) on top.
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".cspm/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Explicit file. Missing files are an error here, not skipped.
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file_exact(path));
        }

        // Layer 4: Legacy variables
        figment = figment.merge(Env::raw().only(&LEGACY_ENV).map(|key| {
            key.as_str()
                .to_ascii_lowercase()
                .replacen("sysdig_api_", "api.", 1)
                .into()
        }));

        // Layer 5: Prefixed environment variables (highest priority)
        figment.merge(Env::prefixed("CSPM_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cspm-utils").join("config.toml"))
    }
}
