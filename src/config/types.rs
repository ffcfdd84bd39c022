//! Configuration types for usage value calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};

/// A single age band and the factor that applies to it.
///
/// Both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorRow {
    /// The minimum age (inclusive) for which this factor applies.
    pub min_age: i32,
    /// The maximum age (inclusive) for which this factor applies.
    pub max_age: i32,
    /// The factor applied to the yearly yield for ages in this band.
    pub factor: Decimal,
}

impl FactorRow {
    /// Returns true if `age` falls within `[min_age, max_age]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use vruchtgebruik_engine::config::FactorRow;
    /// use rust_decimal::Decimal;
    ///
    /// let row = FactorRow { min_age: 20, max_age: 29, factor: Decimal::from(20) };
    /// assert!(row.contains(20));
    /// assert!(row.contains(29));
    /// assert!(!row.contains(30));
    /// ```
    pub fn contains(&self, age: i32) -> bool {
        age >= self.min_age && age <= self.max_age
    }
}

/// Settings for one factor calculation method.
///
/// Holds every published edition of the method's factor table, keyed by a
/// version label such as `"2024"`, plus the label of the edition in use.
/// Row order inside a table is significant: lookups take the first match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MethodSettings {
    /// The version key of the currently active factor table.
    #[serde(default)]
    pub active_version: String,
    /// All available factor tables by version key.
    #[serde(default)]
    pub versions: HashMap<String, Vec<FactorRow>>,
}

impl MethodSettings {
    /// Creates settings with a single table version, marked active.
    pub fn single_version(version: impl Into<String>, rows: Vec<FactorRow>) -> Self {
        let version = version.into();
        let mut versions = HashMap::new();
        versions.insert(version.clone(), rows);
        Self {
            active_version: version,
            versions,
        }
    }

    /// Returns the rows of the active factor table.
    ///
    /// Fails with `ConfigurationInvalid` when the active version is unset,
    /// unknown, or refers to an empty table.
    pub fn active_table(&self) -> EngineResult<&[FactorRow]> {
        if self.active_version.trim().is_empty() {
            return Err(EngineError::ConfigurationInvalid {
                message: "active version is not set".to_string(),
            });
        }

        let rows = self.versions.get(&self.active_version).ok_or_else(|| {
            EngineError::ConfigurationInvalid {
                message: format!(
                    "active version '{}' is not one of the configured versions",
                    self.active_version
                ),
            }
        })?;

        if rows.is_empty() {
            return Err(EngineError::ConfigurationInvalid {
                message: format!("factor table '{}' is empty", self.active_version),
            });
        }

        Ok(rows)
    }

    /// Checks the invariants that must hold before the method may serve traffic.
    ///
    /// The active table must resolve, and every row of every version must
    /// have `min_age <= max_age`.
    pub fn validate(&self, method: &str) -> EngineResult<()> {
        self.active_table()
            .map_err(|err| EngineError::ConfigurationInvalid {
                message: format!("method '{}': {}", method, inner_message(err)),
            })?;

        for (version, rows) in &self.versions {
            if let Some(row) = rows.iter().find(|r| r.min_age > r.max_age) {
                return Err(EngineError::ConfigurationInvalid {
                    message: format!(
                        "method '{}', version '{}': row {}-{} has min_age greater than max_age",
                        method, version, row.min_age, row.max_age
                    ),
                });
            }
        }

        Ok(())
    }
}

fn inner_message(err: EngineError) -> String {
    match err {
        EngineError::ConfigurationInvalid { message } => message,
        other => other.to_string(),
    }
}

/// Years subtracted from a person's age depending on declared sex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeAdjustmentPolicy {
    /// Years subtracted when the declared sex is female.
    #[serde(default = "default_female_adjustment")]
    pub female_adjustment: i32,
    /// Years subtracted when the declared sex is male.
    #[serde(default)]
    pub male_adjustment: i32,
}

fn default_female_adjustment() -> i32 {
    5
}

impl Default for AgeAdjustmentPolicy {
    fn default() -> Self {
        Self {
            female_adjustment: default_female_adjustment(),
            male_adjustment: 0,
        }
    }
}

/// The complete service configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Age adjustment by sex, shared by all methods.
    age_factor: AgeAdjustmentPolicy,
    /// Method settings keyed by configuration name (e.g. "een_leven").
    factor_methods: HashMap<String, MethodSettings>,
}

impl ServiceConfig {
    /// Creates a new ServiceConfig from its component parts.
    pub fn new(
        age_factor: AgeAdjustmentPolicy,
        factor_methods: HashMap<String, MethodSettings>,
    ) -> Self {
        Self {
            age_factor,
            factor_methods,
        }
    }

    /// Returns the age adjustment policy.
    pub fn age_factor(&self) -> AgeAdjustmentPolicy {
        self.age_factor
    }

    /// Returns all method settings.
    pub fn factor_methods(&self) -> &HashMap<String, MethodSettings> {
        &self.factor_methods
    }

    /// Returns the settings for one method, or `ConfigNotFound`.
    pub fn method_settings(&self, key: &str) -> EngineResult<&MethodSettings> {
        self.factor_methods
            .get(key)
            .ok_or_else(|| EngineError::ConfigNotFound {
                path: format!("factor_methods/{}.yaml", key),
            })
    }

    /// Validates every method's settings.
    pub fn validate(&self) -> EngineResult<()> {
        for (key, settings) in &self.factor_methods {
            settings.validate(key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(min_age: i32, max_age: i32, factor: i64) -> FactorRow {
        FactorRow {
            min_age,
            max_age,
            factor: Decimal::from(factor),
        }
    }

    #[test]
    fn test_active_table_returns_rows() {
        let settings = MethodSettings::single_version("2024", vec![row(20, 29, 20)]);
        let table = settings.active_table().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].factor, Decimal::from(20));
    }

    #[test]
    fn test_active_table_missing_version_is_invalid() {
        let mut settings = MethodSettings::single_version("2024", vec![row(20, 29, 20)]);
        settings.active_version = "2030".to_string();

        match settings.active_table() {
            Err(EngineError::ConfigurationInvalid { message }) => {
                assert!(message.contains("2030"));
            }
            other => panic!("Expected ConfigurationInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_active_table_blank_version_is_invalid() {
        let mut settings = MethodSettings::single_version("2024", vec![row(20, 29, 20)]);
        settings.active_version = "  ".to_string();
        assert!(matches!(
            settings.active_table(),
            Err(EngineError::ConfigurationInvalid { .. })
        ));
    }

    #[test]
    fn test_active_table_empty_is_invalid() {
        let settings = MethodSettings::single_version("2024", vec![]);
        match settings.active_table() {
            Err(EngineError::ConfigurationInvalid { message }) => {
                assert!(message.contains("empty"));
            }
            other => panic!("Expected ConfigurationInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_names_method() {
        let settings = MethodSettings::default();
        match settings.validate("een_leven") {
            Err(EngineError::ConfigurationInvalid { message }) => {
                assert!(message.starts_with("method 'een_leven'"));
            }
            other => panic!("Expected ConfigurationInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_inverted_row_in_inactive_version() {
        let mut settings = MethodSettings::single_version("2024", vec![row(20, 29, 20)]);
        settings
            .versions
            .insert("2023".to_string(), vec![row(40, 30, 17)]);

        match settings.validate("een_leven") {
            Err(EngineError::ConfigurationInvalid { message }) => {
                assert!(message.contains("2023"));
                assert!(message.contains("40-30"));
            }
            other => panic!("Expected ConfigurationInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_age_adjustment_policy_defaults() {
        let policy: AgeAdjustmentPolicy = serde_yaml::from_str("{}").unwrap();
        assert_eq!(policy, AgeAdjustmentPolicy::default());
        assert_eq!(policy.female_adjustment, 5);
        assert_eq!(policy.male_adjustment, 0);
    }

    #[test]
    fn test_method_settings_from_yaml() {
        let yaml = r#"
active_version: "2024"
versions:
  "2024":
    - { min_age: 20, max_age: 29, factor: 20 }
    - { min_age: 30, max_age: 39, factor: 19.5 }
"#;
        let settings: MethodSettings = serde_yaml::from_str(yaml).unwrap();
        let table = settings.active_table().unwrap();
        assert_eq!(table[1].factor, Decimal::new(195, 1));
    }

    #[test]
    fn test_service_config_missing_method_settings() {
        let config = ServiceConfig::new(AgeAdjustmentPolicy::default(), HashMap::new());
        match config.method_settings("een_leven") {
            Err(EngineError::ConfigNotFound { path }) => {
                assert_eq!(path, "factor_methods/een_leven.yaml");
            }
            other => panic!("Expected ConfigNotFound, got {:?}", other),
        }
    }
}
