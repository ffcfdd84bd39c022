//! Sex-based age adjustment.
//!
//! Factor tables are published for a reference life; the person's age is
//! shifted by a configured number of years before the band lookup.

use crate::config::AgeAdjustmentPolicy;
use crate::models::Sex;

/// The outcome of adjusting an age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeAdjustment {
    /// The age used for the factor lookup.
    pub adjusted_age: i32,
    /// The recognised sex, or `None` when no adjustment was applied.
    pub sex: Option<Sex>,
}

/// Subtracts the policy's offset for the declared sex from `age`.
///
/// `sex` is compared ignoring ASCII case. Values other than "male" and
/// "female" leave the age unchanged and report `sex: None`.
///
/// # Examples
///
/// ```
/// use vruchtgebruik_engine::calculation::adjust_age;
/// use vruchtgebruik_engine::config::AgeAdjustmentPolicy;
///
/// let policy = AgeAdjustmentPolicy { female_adjustment: 5, male_adjustment: 0 };
/// assert_eq!(adjust_age(35, "female", &policy).adjusted_age, 30);
/// assert_eq!(adjust_age(35, "MALE", &policy).adjusted_age, 35);
/// ```
pub fn adjust_age(age: i32, sex: &str, policy: &AgeAdjustmentPolicy) -> AgeAdjustment {
    let sex = Sex::parse(sex);
    let offset = match sex {
        Some(Sex::Female) => policy.female_adjustment,
        Some(Sex::Male) => policy.male_adjustment,
        None => 0,
    };

    AgeAdjustment {
        adjusted_age: age.saturating_sub(offset),
        sex,
    }
}
