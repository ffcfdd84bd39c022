//! Calculation logic for the usage value engine.
//!
//! This module contains the calculation method contract, the method registry
//! that resolves request method names, the single-life ("EenLeven") method,
//! and the building blocks it is made of: sex-based age adjustment, first-match
//! factor row lookup, and the rounded usage value arithmetic.

mod age_adjustment;
mod een_leven;
mod factor_lookup;
mod method;
mod registry;
mod usage_value;

pub use age_adjustment::{AgeAdjustment, adjust_age};
pub use een_leven::{EEN_LEVEN_CONFIG_KEY, EEN_LEVEN_METHOD_NAME, EenLevenMethod};
pub use factor_lookup::find_factor_row;
pub use method::CalculationMethod;
pub use registry::{MethodRegistry, registered_methods};
pub use usage_value::{calculate_usage_value, usage_rate};
