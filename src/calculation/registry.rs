//! Method registry.
//!
//! Maps method names, compared case-insensitively, to the calculation
//! methods that implement them. The registry is built once at startup and
//! is read-only afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::error::{EngineError, EngineResult};

use super::een_leven::{EEN_LEVEN_CONFIG_KEY, EenLevenMethod};
use super::method::CalculationMethod;

/// Builds every calculation method offered by the service.
///
/// This is the single place where methods are registered; adding a method
/// means adding it to this list.
pub fn registered_methods(config: &ServiceConfig) -> EngineResult<Vec<Arc<dyn CalculationMethod>>> {
    let een_leven: Arc<dyn CalculationMethod> = Arc::new(EenLevenMethod::new(
        Arc::new(config.method_settings(EEN_LEVEN_CONFIG_KEY)?.clone()),
        config.age_factor(),
    ));

    Ok(vec![een_leven])
}

/// Resolves method names to calculation methods.
#[derive(Clone)]
pub struct MethodRegistry {
    /// Methods keyed by lowercased name.
    methods: HashMap<String, Arc<dyn CalculationMethod>>,
}

impl MethodRegistry {
    /// Creates a registry from a list of methods.
    ///
    /// Fails with `ConfigurationInvalid` if two methods share a name under
    /// case-insensitive comparison.
    pub fn new(methods: Vec<Arc<dyn CalculationMethod>>) -> EngineResult<Self> {
        let mut by_name = HashMap::with_capacity(methods.len());

        for method in methods {
            let key = method.name().to_lowercase();
            if let Some(existing) = by_name.insert(key, Arc::clone(&method)) {
                return Err(EngineError::ConfigurationInvalid {
                    message: format!(
                        "factor method '{}' is registered more than once (conflicts with '{}')",
                        method.name(),
                        existing.name()
                    ),
                });
            }
        }

        Ok(Self { methods: by_name })
    }

    /// Builds the registry of all registered methods from configuration.
    pub fn from_config(config: &ServiceConfig) -> EngineResult<Self> {
        Self::new(registered_methods(config)?)
    }

    /// Returns the method registered under `method_name`, ignoring case.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use std::sync::Arc;
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    /// use vruchtgebruik_engine::calculation::MethodRegistry;
    /// use vruchtgebruik_engine::config::{AgeAdjustmentPolicy, FactorRow, MethodSettings, ServiceConfig};
    ///
    /// let settings = MethodSettings::single_version(
    ///     "2024",
    ///     vec![FactorRow { min_age: 0, max_age: 130, factor: Decimal::from(10) }],
    /// );
    /// let config = ServiceConfig::new(
    ///     AgeAdjustmentPolicy::default(),
    ///     HashMap::from([("een_leven".to_string(), settings)]),
    /// );
    /// let registry = MethodRegistry::from_config(&config).unwrap();
    ///
    /// let method = registry.resolve("EENLEVEN", Uuid::new_v4()).unwrap();
    /// assert_eq!(method.name(), "EenLeven");
    /// ```
    pub fn resolve(
        &self,
        method_name: &str,
        correlation_id: Uuid,
    ) -> EngineResult<&dyn CalculationMethod> {
        match self.methods.get(&method_name.to_lowercase()) {
            Some(method) => {
                debug!(
                    correlation_id = %correlation_id,
                    method = method.name(),
                    requested = method_name,
                    "Factor method selected"
                );
                Ok(method.as_ref())
            }
            None => {
                warn!(
                    correlation_id = %correlation_id,
                    requested = method_name,
                    "Unknown factor method requested"
                );
                Err(EngineError::UnknownMethod {
                    name: method_name.to_string(),
                })
            }
        }
    }

    /// Iterates over every registered method, in no particular order.
    pub fn methods(&self) -> impl Iterator<Item = &dyn CalculationMethod> {
        self.methods.values().map(|m| m.as_ref())
    }

    /// Returns the number of registered methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns true if no methods are registered.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.methods.values().map(|m| m.name()).collect();
        names.sort_unstable();
        f.debug_struct("MethodRegistry")
            .field("methods", &names)
            .finish()
    }
}
