//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the SPM
//! reference tables from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{CostLevelsConfig, ForecastConfig, SpmConfig, StatesConfig, ThresholdsConfig};

const EMBEDDED_THRESHOLDS: &str = include_str!("../../config/spm/thresholds.yaml");
const EMBEDDED_FORECAST: &str = include_str!("../../config/spm/forecast.yaml");
const EMBEDDED_COST_LEVELS: &str = include_str!("../../config/spm/cost_levels.yaml");
const EMBEDDED_STATES: &str = include_str!("../../config/spm/states.yaml");

/// Loads and provides access to the SPM reference tables.
///
/// The `ConfigLoader` reads YAML configuration files from a directory, or
/// from the copies compiled into the crate, and validates them into an
/// [`SpmConfig`].
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/spm/
/// ├── thresholds.yaml   # Published base thresholds by year and tenure
/// ├── forecast.yaml     # Projected inflation for later years
/// ├── cost_levels.yaml  # Named GEOADJ presets
/// └── states.yaml       # GEOADJ by state
/// ```
///
/// # Example
///
/// ```no_run
/// use spm_threshold::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/spm").unwrap();
/// let state = loader.config().state("HI").unwrap();
/// println!("{}: {}", state.name, state.geoadj);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: SpmConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/spm")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The tables violate an invariant (see [`SpmConfig::new`])
    ///
    /// # Example
    ///
    /// ```no_run
    /// use spm_threshold::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/spm")?;
    /// # Ok::<(), spm_threshold::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let thresholds = Self::load_yaml::<ThresholdsConfig>(&path.join("thresholds.yaml"))?;
        let forecast = Self::load_yaml::<ForecastConfig>(&path.join("forecast.yaml"))?;
        let cost_levels = Self::load_yaml::<CostLevelsConfig>(&path.join("cost_levels.yaml"))?;
        let states = Self::load_yaml::<StatesConfig>(&path.join("states.yaml"))?;

        let config = SpmConfig::new(thresholds, forecast, cost_levels, states)?;
        debug!(
            path = %path.display(),
            latest_published_year = config.latest_published_year(),
            "Loaded SPM configuration"
        );

        Ok(Self { config })
    }

    /// Loads the reference tables compiled into the crate.
    ///
    /// These are the same files as `config/spm/` at build time.
    pub fn embedded() -> EngineResult<Self> {
        let thresholds = Self::parse_yaml::<ThresholdsConfig>(
            EMBEDDED_THRESHOLDS,
            "<embedded>/thresholds.yaml",
        )?;
        let forecast =
            Self::parse_yaml::<ForecastConfig>(EMBEDDED_FORECAST, "<embedded>/forecast.yaml")?;
        let cost_levels = Self::parse_yaml::<CostLevelsConfig>(
            EMBEDDED_COST_LEVELS,
            "<embedded>/cost_levels.yaml",
        )?;
        let states = Self::parse_yaml::<StatesConfig>(EMBEDDED_STATES, "<embedded>/states.yaml")?;

        Ok(Self {
            config: SpmConfig::new(thresholds, forecast, cost_levels, states)?,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse_yaml(&content, &path_str)
    }

    fn parse_yaml<T: serde::de::DeserializeOwned>(content: &str, path: &str) -> EngineResult<T> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Returns the underlying reference tables.
    pub fn config(&self) -> &SpmConfig {
        &self.config
    }
}
