//! Onboarding as an explicit, ordered sequence of step records.
//!
//! The client reports the steps it went through; they are folded in order into
//! a single [`OnboardingData`]. Steps may be skipped but never repeated or
//! reordered.

use serde::Deserialize;
use thiserror::Error;

use crate::{
    dates,
    users::{
        goal::{BodyProfile, CUSTOM_GOAL_RANGE},
        repo_types::{ActivityLevel, Gender, ProfileUpdate},
    },
};

pub const STEP_NAMES: [&str; 4] = ["welcome", "calorie_goal", "preferences", "completion"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OnboardingError {
    #[error("step `{step}` cannot come after `{previous}`")]
    OutOfOrder {
        step: &'static str,
        previous: &'static str,
    },
    #[error("customCalories is required for a custom goal")]
    MissingCustomGoal,
    #[error("custom goal {0} kcal is outside {min}..={max}", min = CUSTOM_GOAL_RANGE.start(), max = CUSTOM_GOAL_RANGE.end())]
    CustomGoalOutOfRange(i32),
    #[error("{0}")]
    InvalidProfile(String),
    #[error("invalid reminderTime `{0}`, expected HH:MM")]
    InvalidReminderTime(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    #[default]
    Recommended,
    Custom,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalorieGoalInput {
    #[serde(default)]
    pub goal_type: GoalType,
    pub gender: Option<Gender>,
    pub age: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub custom_calories: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesInput {
    pub reminders: Option<bool>,
    pub reminder_time: Option<String>,
    pub weekly_report: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepRecord {
    Welcome,
    CalorieGoal(CalorieGoalInput),
    Preferences(PreferencesInput),
    Completion,
}

impl StepRecord {
    fn position(&self) -> usize {
        match self {
            StepRecord::Welcome => 0,
            StepRecord::CalorieGoal(_) => 1,
            StepRecord::Preferences(_) => 2,
            StepRecord::Completion => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        STEP_NAMES[self.position()]
    }
}

/// Everything collected across the steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OnboardingData {
    pub profile: Option<BodyProfile>,
    pub daily_calorie_goal: Option<i32>,
    pub reminders: Option<bool>,
    pub reminder_time: Option<String>,
    pub weekly_report: Option<bool>,
    pub completed: bool,
}

impl OnboardingData {
    pub fn into_profile_update(self) -> ProfileUpdate {
        let profile = self.profile;
        ProfileUpdate {
            gender: profile.map(|p| p.gender),
            age: profile.map(|p| p.age),
            weight: profile.map(|p| p.weight),
            height: profile.map(|p| p.height),
            activity_level: profile.map(|p| p.activity_level),
            daily_calorie_goal: self.daily_calorie_goal,
            reminders: self.reminders,
            reminder_time: self.reminder_time,
            weekly_report: self.weekly_report,
            ..ProfileUpdate::default()
        }
    }
}

#[derive(Debug, Default)]
pub struct Wizard {
    last: Option<usize>,
    data: OnboardingData,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, step: StepRecord) -> Result<(), OnboardingError> {
        let position = step.position();
        if let Some(last) = self.last {
            if position <= last {
                return Err(OnboardingError::OutOfOrder {
                    step: step.name(),
                    previous: STEP_NAMES[last],
                });
            }
        }

        match step {
            StepRecord::Welcome => {}
            StepRecord::CalorieGoal(input) => self.apply_calorie_goal(input)?,
            StepRecord::Preferences(input) => self.apply_preferences(input)?,
            StepRecord::Completion => self.data.completed = true,
        }
        self.last = Some(position);
        Ok(())
    }

    fn apply_calorie_goal(&mut self, input: CalorieGoalInput) -> Result<(), OnboardingError> {
        let defaults = BodyProfile::default();
        let profile = BodyProfile {
            gender: input.gender.unwrap_or(defaults.gender),
            age: input.age.unwrap_or(defaults.age),
            weight: input.weight.unwrap_or(defaults.weight),
            height: input.height.unwrap_or(defaults.height),
            activity_level: input.activity_level.unwrap_or(defaults.activity_level),
        };
        profile.validate().map_err(OnboardingError::InvalidProfile)?;

        let goal = match input.goal_type {
            GoalType::Recommended => profile.recommended_calorie_goal(),
            GoalType::Custom => {
                let custom = input
                    .custom_calories
                    .ok_or(OnboardingError::MissingCustomGoal)?;
                if !CUSTOM_GOAL_RANGE.contains(&custom) {
                    return Err(OnboardingError::CustomGoalOutOfRange(custom));
                }
                custom
            }
        };

        self.data.profile = Some(profile);
        self.data.daily_calorie_goal = Some(goal);
        Ok(())
    }

    fn apply_preferences(&mut self, input: PreferencesInput) -> Result<(), OnboardingError> {
        if let Some(t) = &input.reminder_time {
            dates::parse_time(t).map_err(|_| OnboardingError::InvalidReminderTime(t.clone()))?;
        }
        self.data.reminders = input.reminders;
        self.data.reminder_time = input.reminder_time;
        self.data.weekly_report = input.weekly_report;
        Ok(())
    }

    pub fn finish(self) -> OnboardingData {
        self.data
    }
}

/// Folds the submitted steps, in order, into the accumulated data.
pub fn fold_steps(
    steps: impl IntoIterator<Item = StepRecord>,
) -> Result<OnboardingData, OnboardingError> {
    let mut wizard = Wizard::new();
    for step in steps {
        wizard.apply(step)?;
    }
    Ok(wizard.finish())
}
