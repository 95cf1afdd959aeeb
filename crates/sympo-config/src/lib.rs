//! # sympo-config
//!
//! Layered configuration loading for the proceedings tools using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SYMPO_*` prefix, `__` as separator)
//! 2. Project-level `./sympo.toml`, or the file given with `--config`
//! 3. User-level `~/.config/sympo/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SYMPO_SHEET__TZ_OFFSET_H` -> `sheet.tz_offset_h`,
//! `SYMPO_GENERAL__FIRST_PAGE` -> `general.first_page`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use sympo_config::SympoConfig;
//!
//! let config = SympoConfig::load().expect("config");
//! let loader = config.sheet.loader();
//! ```

mod error;
mod general;
mod sheet;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use sheet::SheetConfig;

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Project-local config file, relative to the working directory.
pub const LOCAL_CONFIG_FILE: &str = "sympo.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SympoConfig {
    #[serde(default)]
    pub sheet: SheetConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl SympoConfig {
    /// Load configuration from all default sources.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` for unreadable or mistyped sources and
    /// `ConfigError::InvalidValue` for out-of-range settings.
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(Self::figment())
    }

    /// Load configuration with `path` in place of `./sympo.toml`.
    ///
    /// # Errors
    ///
    /// As [`Self::load`], plus `ConfigError::MissingFile` if `path` does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.to_path_buf(),
            });
        }
        Self::extract(Self::figment_with(Some(path)))
    }

    /// Build the default figment provider chain.
    ///
    /// Public so tests can inspect the figment or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_with(None)
    }

    fn figment_with(local: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local or explicit config
        let local_path = local.map_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE), Path::to_path_buf);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("SYMPO_").split("__"))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.sheet.validate()?;
        Ok(config)
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sympo").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = SympoConfig::default();
        assert_eq!(config.sheet.tz_offset_h, 0);
        assert_eq!(config.general.first_page, 1);
    }

    #[test]
    fn figment_builds_without_files() {
        let figment = SympoConfig::figment();
        let config: SympoConfig = figment.extract().expect("should extract defaults");
        assert_eq!(config.sheet.presentation_minutes, 20);
        assert_eq!(config.sheet.columns.paper_id, "Paper ID");
    }
}
