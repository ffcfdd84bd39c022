//! Calculation request model and the declared sex of the person.

use serde::{Deserialize, Serialize};

/// The sex values recognised by the age adjustment policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    /// Declared as "male".
    Male,
    /// Declared as "female".
    Female,
}

impl Sex {
    /// Parses a declared sex, ignoring ASCII case.
    ///
    /// Returns `None` for anything other than "male" or "female".
    ///
    /// # Examples
    ///
    /// ```
    /// use vruchtgebruik_engine::models::Sex;
    ///
    /// assert_eq!(Sex::parse("Female"), Some(Sex::Female));
    /// assert_eq!(Sex::parse("MALE"), Some(Sex::Male));
    /// assert_eq!(Sex::parse("man"), None);
    /// ```
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("male") {
            Some(Sex::Male)
        } else if value.eq_ignore_ascii_case("female") {
            Some(Sex::Female)
        } else {
            None
        }
    }
}

/// A request to calculate the usage value of an asset.
///
/// Produced per inbound call after validation; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The value of the asset, in whole currency units.
    pub asset_value: i64,
    /// The age of the person (in years) for whose life the usage runs.
    pub age: i32,
    /// The declared sex ("male" or "female").
    pub sex: String,
    /// The name of the factor calculation method (e.g. "EenLeven").
    pub method_name: String,
}

impl CalculationRequest {
    /// Returns the parsed sex, if recognised.
    pub fn sex(&self) -> Option<Sex> {
        Sex::parse(&self.sex)
    }
}
