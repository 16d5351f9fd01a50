//! Daily calorie goal estimation.
//!
//! The recommended goal is the total daily energy expenditure: basal metabolic
//! rate from the revised Harris-Benedict equation, scaled by an activity factor.

use std::ops::RangeInclusive;

use serde::Serialize;

use super::repo_types::{ActivityLevel, Gender, User};

/// Goal used when the user never set one.
pub const DEFAULT_DAILY_CALORIE_GOAL: i32 = 2000;

/// Bounds accepted for a user-chosen goal during onboarding.
pub const CUSTOM_GOAL_RANGE: RangeInclusive<i32> = 1200..=4000;

pub const AGE_RANGE: RangeInclusive<i32> = 18..=100;
pub const WEIGHT_RANGE_KG: RangeInclusive<f64> = 40.0..=200.0;
pub const HEIGHT_RANGE_CM: RangeInclusive<f64> = 140.0..=220.0;

impl ActivityLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

/// Body metrics the estimator works from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyProfile {
    pub gender: Gender,
    pub age: i32,
    pub weight: f64,
    pub height: f64,
    pub activity_level: ActivityLevel,
}

impl Default for BodyProfile {
    fn default() -> Self {
        Self {
            gender: Gender::Female,
            age: 30,
            weight: 70.0,
            height: 170.0,
            activity_level: ActivityLevel::Moderate,
        }
    }
}

impl BodyProfile {
    /// Stored profile, with defaults for whatever the user has not filled in.
    pub fn from_user(user: &User) -> Self {
        let d = Self::default();
        Self {
            gender: user.gender.unwrap_or(d.gender),
            age: user.age.unwrap_or(d.age),
            weight: user.weight.unwrap_or(d.weight),
            height: user.height.unwrap_or(d.height),
            activity_level: user.activity_level.unwrap_or(d.activity_level),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_metrics(Some(self.age), Some(self.weight), Some(self.height))
    }

    pub fn bmr(&self) -> f64 {
        match self.gender {
            Gender::Male => {
                88.362 + 13.397 * self.weight + 4.799 * self.height - 5.677 * self.age as f64
            }
            Gender::Female => {
                447.593 + 9.247 * self.weight + 3.098 * self.height - 4.33 * self.age as f64
            }
        }
    }

    pub fn recommended_calorie_goal(&self) -> i32 {
        (self.bmr() * self.activity_level.multiplier()).round() as i32
    }
}

/// Checks whichever body metrics are present against the accepted ranges.
pub fn validate_metrics(
    age: Option<i32>,
    weight: Option<f64>,
    height: Option<f64>,
) -> Result<(), String> {
    if let Some(age) = age {
        if !AGE_RANGE.contains(&age) {
            return Err(format!(
                "age must be between {} and {}",
                AGE_RANGE.start(),
                AGE_RANGE.end()
            ));
        }
    }
    if let Some(weight) = weight {
        if !WEIGHT_RANGE_KG.contains(&weight) {
            return Err(format!(
                "weight must be between {} and {} kg",
                WEIGHT_RANGE_KG.start(),
                WEIGHT_RANGE_KG.end()
            ));
        }
    }
    if let Some(height) = height {
        if !HEIGHT_RANGE_CM.contains(&height) {
            return Err(format!(
                "height must be between {} and {} cm",
                HEIGHT_RANGE_CM.start(),
                HEIGHT_RANGE_CM.end()
            ));
        }
    }
    Ok(())
}
