//! Core data models for the usage value engine.
//!
//! This module contains the per-call request and result types that flow
//! through the calculation methods.

mod calculation_request;
mod calculation_result;

pub use calculation_request::{CalculationRequest, Sex};
pub use calculation_result::CalculationResult;
