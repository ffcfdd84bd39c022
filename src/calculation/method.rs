//! The calculation method contract.

use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{CalculationRequest, CalculationResult};

/// A named rule for turning a request into a usage value.
///
/// Implementations hold only immutable configuration, so one instance is
/// shared by every concurrent request.
pub trait CalculationMethod: Send + Sync {
    /// The stable identifier used for registry lookup.
    fn name(&self) -> &str;

    /// Calculates the usage value for `request`.
    ///
    /// `correlation_id` is only used to tag trace events. Business-rule
    /// failures (such as no matching age band) are returned as errors.
    fn calculate(
        &self,
        request: &CalculationRequest,
        correlation_id: Uuid,
    ) -> EngineResult<CalculationResult>;

    /// The label of the factor table version in use, if the method has one.
    fn active_version(&self) -> Option<&str> {
        None
    }
}
