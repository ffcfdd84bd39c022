//! Request types for the usage value API.
//!
//! This module defines the JSON request structure for `POST /api/calculate`
//! and the input validation rules applied before any calculation runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{CalculationRequest, Sex};

/// The highest accepted age, inclusive.
pub const MAX_AGE: i32 = 130;

/// Validation messages grouped by JSON field name.
pub type ValidationErrors = BTreeMap<String, Vec<String>>;

/// Request body for the `/api/calculate` endpoint.
///
/// Missing fields take their zero value so that the validation rules,
/// rather than the JSON parser, report them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalculationRequestBody {
    /// The value of the asset.
    pub asset_value: i64,
    /// The age of the person in years.
    pub age: i32,
    /// The declared sex ("male" or "female").
    pub sex: String,
    /// The name of the factor calculation method (e.g. "EenLeven").
    pub factor_method: String,
}

impl CalculationRequestBody {
    /// Checks every field and returns all failures at once.
    ///
    /// Rules: `assetValue > 0`; `0 <= age <= 130`; `sex` is non-empty and
    /// "male" or "female" (any case); `factorMethod` is non-blank.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut fail = |field: &str, message: &str| {
            errors
                .entry(field.to_string())
                .or_default()
                .push(message.to_string());
        };

        if self.asset_value <= 0 {
            fail("assetValue", "'assetValue' must be greater than 0.");
        }

        if !(0..=MAX_AGE).contains(&self.age) {
            fail("age", "'age' must be between 0 and 130.");
        }

        if self.sex.trim().is_empty() {
            fail("sex", "'sex' is required.");
        } else if Sex::parse(&self.sex).is_none() {
            fail("sex", "'sex' must be either 'male' or 'female'.");
        }

        if self.factor_method.trim().is_empty() {
            fail("factorMethod", "'factorMethod' is required.");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validates the body and converts it into a domain request.
    pub fn into_request(self) -> Result<CalculationRequest, ValidationErrors> {
        self.validate()?;
        Ok(self.into())
    }
}

impl From<CalculationRequestBody> for CalculationRequest {
    fn from(body: CalculationRequestBody) -> Self {
        CalculationRequest {
            asset_value: body.asset_value,
            age: body.age,
            sex: body.sex,
            method_name: body.factor_method,
        }
    }
}
