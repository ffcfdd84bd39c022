//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the age
//! adjustment policy and factor tables from YAML files.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};

use super::types::{AgeAdjustmentPolicy, MethodSettings, ServiceConfig};

/// Loads and provides access to the service configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// ├── age_factor.yaml          # Age adjustment by sex
/// └── factor_methods/
///     └── een_leven.yaml       # Versioned factor tables for one method
/// ```
///
/// Each file under `factor_methods/` is keyed by its file stem. Every
/// method's settings are validated on load, so a loader that was returned
/// successfully always has resolvable, non-empty active tables.
///
/// # Example
///
/// ```no_run
/// use vruchtgebruik_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config")?;
/// let settings = loader.config().method_settings("een_leven")?;
/// println!("Active version: {}", settings.active_version);
/// # Ok::<(), vruchtgebruik_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: ServiceConfig,
}

impl ConfigLoader {
    /// Loads and validates configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `age_factor.yaml` or the `factor_methods` directory is missing
    /// - Any file contains invalid YAML
    /// - Any method's active version is missing, unknown, or empty
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let age_factor_path = path.join("age_factor.yaml");
        let age_factor = Self::load_yaml::<AgeAdjustmentPolicy>(&age_factor_path)?;

        let methods_dir = path.join("factor_methods");
        let factor_methods = Self::load_factor_methods(&methods_dir)?;

        let loader = Self::from_config(ServiceConfig::new(age_factor, factor_methods))?;

        info!(
            config_dir = %path.display(),
            methods = loader.config.factor_methods().len(),
            female_adjustment = age_factor.female_adjustment,
            male_adjustment = age_factor.male_adjustment,
            "Configuration loaded"
        );

        Ok(loader)
    }

    /// Wraps an already-built configuration, validating it first.
    pub fn from_config(config: ServiceConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every method settings file from the factor_methods directory.
    fn load_factor_methods(methods_dir: &Path) -> EngineResult<HashMap<String, MethodSettings>> {
        let methods_dir_str = methods_dir.display().to_string();

        let entries = fs::read_dir(methods_dir).map_err(|_| EngineError::ConfigNotFound {
            path: methods_dir_str.clone(),
        })?;

        let mut methods = HashMap::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: methods_dir_str.clone(),
            })?;

            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "yaml") {
                continue;
            }

            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let settings = Self::load_yaml::<MethodSettings>(&path)?;
            debug!(
                method = key,
                active_version = %settings.active_version,
                versions = settings.versions.len(),
                "Loaded factor method settings"
            );
            methods.insert(key.to_string(), settings);
        }

        if methods.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no factor method files found)", methods_dir_str),
            });
        }

        Ok(methods)
    }

    /// Returns the underlying service configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns the age adjustment policy.
    pub fn age_factor(&self) -> AgeAdjustmentPolicy {
        self.config.age_factor()
    }
}
