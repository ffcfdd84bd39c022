//! The single-life ("EenLeven") usage value method.
//!
//! The usufruct runs for the life of one person. The person's age is
//! adjusted by sex, the active factor table is searched for the first
//! matching age band, and the usage value is `asset * 0.04 * factor`.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::{AgeAdjustmentPolicy, MethodSettings};
use crate::error::{EngineError, EngineResult};
use crate::models::{CalculationRequest, CalculationResult};

use super::age_adjustment::adjust_age;
use super::factor_lookup::find_factor_row;
use super::method::CalculationMethod;
use super::usage_value::calculate_usage_value;

/// The registry name of the single-life method.
pub const EEN_LEVEN_METHOD_NAME: &str = "EenLeven";

/// The configuration key (file stem under `factor_methods/`) of the method.
pub const EEN_LEVEN_CONFIG_KEY: &str = "een_leven";

/// Single-life usage value calculation.
#[derive(Debug, Clone)]
pub struct EenLevenMethod {
    settings: Arc<MethodSettings>,
    policy: AgeAdjustmentPolicy,
}

impl EenLevenMethod {
    /// Creates the method from its factor tables and the age policy.
    pub fn new(settings: Arc<MethodSettings>, policy: AgeAdjustmentPolicy) -> Self {
        Self { settings, policy }
    }

    fn try_calculate(
        &self,
        request: &CalculationRequest,
        correlation_id: Uuid,
    ) -> EngineResult<CalculationResult> {
        let adjustment = adjust_age(request.age, &request.sex, &self.policy);
        if adjustment.sex.is_none() {
            warn!(
                correlation_id = %correlation_id,
                method = self.name(),
                sex = %request.sex,
                "Unrecognised sex, no age adjustment applied"
            );
        }
        let adjusted_age = adjustment.adjusted_age;

        let table = self.settings.active_table()?;
        let row = find_factor_row(table, adjusted_age).ok_or_else(|| {
            warn!(
                correlation_id = %correlation_id,
                method = self.name(),
                adjusted_age,
                "No factor found for adjusted age"
            );
            EngineError::NoFactorFound {
                age: adjusted_age,
                method: self.name().to_string(),
            }
        })?;

        let usage_value = calculate_usage_value(request.asset_value, row.factor)?;

        info!(
            correlation_id = %correlation_id,
            method = self.name(),
            asset_value = request.asset_value,
            adjusted_age,
            used_factor = %row.factor,
            usage_value = %usage_value,
            "Calculation succeeded"
        );

        Ok(CalculationResult {
            asset_value: Decimal::from(request.asset_value),
            used_factor: row.factor,
            usage_value,
        })
    }
}

impl CalculationMethod for EenLevenMethod {
    fn name(&self) -> &str {
        EEN_LEVEN_METHOD_NAME
    }

    fn calculate(
        &self,
        request: &CalculationRequest,
        correlation_id: Uuid,
    ) -> EngineResult<CalculationResult> {
        self.try_calculate(request, correlation_id)
            .inspect_err(|err| {
                if !err.is_client_error() {
                    error!(
                        correlation_id = %correlation_id,
                        method = self.name(),
                        error = %err,
                        "Calculation failed unexpectedly"
                    );
                }
            })
    }

    fn active_version(&self) -> Option<&str> {
        Some(&self.settings.active_version)
    }
}
