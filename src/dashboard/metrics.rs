//! Dashboard metrics.
//!
//! Everything here is a pure reduction over a user's meals: no I/O, no cached
//! state. Each dashboard request recomputes from the meals the store returns.
//!
//! "Today" is the UTC calendar day of the `now` passed in. Meal dates are
//! `YYYY-MM-DD` strings and are read as midnight UTC of that day.

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;
use time::{Date, Duration, OffsetDateTime, UtcOffset};

use crate::{
    dates,
    meals::repo_types::{Meal, MealType},
    users::goal::DEFAULT_DAILY_CALORIE_GOAL,
};

const MILLIS_PER_DAY: i128 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    /// A stored meal date is not `YYYY-MM-DD`. Skipping it would corrupt the streak.
    #[error("invalid meal date `{date}`, expected YYYY-MM-DD")]
    InvalidDateFormat { date: String },
}

pub fn parse_meal_date(s: &str) -> Result<Date, MetricsError> {
    dates::parse_date(s).map_err(|_| MetricsError::InvalidDateFormat { date: s.to_string() })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub daily_calorie_goal: i32,
    pub total_meals: u64,
    pub total_favorite_meals: u64,
    pub streak: u32,
}

pub fn summarize(
    daily_calorie_goal: Option<i32>,
    meals: &[Meal],
    now: OffsetDateTime,
) -> Result<DashboardSummary, MetricsError> {
    let streak = streak(meals.iter().map(|m| m.date.as_str()), now)?;
    Ok(DashboardSummary {
        daily_calorie_goal: daily_calorie_goal.unwrap_or(DEFAULT_DAILY_CALORIE_GOAL),
        total_meals: meals.len() as u64,
        total_favorite_meals: meals.iter().filter(|m| m.is_favorite).count() as u64,
        streak,
    })
}

/// Consecutive days with at least one meal, counting back from `now`.
///
/// Dates are deduplicated and walked newest first. The day difference is the
/// floor of the millisecond gap between the cursor and the meal date's
/// midnight: `0` counts without moving the cursor, `1` counts and moves the
/// cursor back a day, anything else (older gap or a future date) ends the walk.
pub fn streak<'a, I>(meal_dates: I, now: OffsetDateTime) -> Result<u32, MetricsError>
where
    I: IntoIterator<Item = &'a str>,
{
    let distinct = meal_dates
        .into_iter()
        .map(parse_meal_date)
        .collect::<Result<BTreeSet<Date>, _>>()?;

    let mut cursor = now.to_offset(UtcOffset::UTC);
    let mut streak = 0;
    for date in distinct.iter().rev() {
        let midnight = date.midnight().assume_utc();
        let day_diff = (cursor - midnight)
            .whole_milliseconds()
            .div_euclid(MILLIS_PER_DAY);
        match day_diff {
            0 => streak += 1,
            1 => {
                streak += 1;
                cursor -= Duration::DAY;
            }
            _ => break,
        }
    }
    Ok(streak)
}

/// Calories of the meals whose date starts with `today` (`YYYY-MM-DD`).
pub fn today_calories(meals: &[Meal], today: Date) -> i64 {
    let prefix = dates::format_date(today);
    meals
        .iter()
        .filter(|m| m.date.starts_with(&prefix))
        .map(|m| i64::from(m.calories))
        .sum()
}

/// Progress towards the daily goal. The percentage is capped at 100 for
/// display; going over the goal is reported by `exceeded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalorieProgress {
    pub percent: u8,
    pub exceeded: bool,
}

impl CalorieProgress {
    pub fn new(today_calories: i64, daily_calorie_goal: i32) -> Self {
        let percent = if daily_calorie_goal > 0 {
            let ratio = today_calories as f64 / f64::from(daily_calorie_goal);
            (ratio * 100.0).round().clamp(0.0, 100.0) as u8
        } else if today_calories > 0 {
            100
        } else {
            0
        };
        Self {
            percent,
            exceeded: today_calories > i64::from(daily_calorie_goal),
        }
    }

    pub fn message(&self) -> String {
        if self.exceeded {
            "You have exceeded your daily goal. Try to balance your next meals.".to_string()
        } else {
            format!("{}% of your daily goal", self.percent)
        }
    }
}

/// Meal counts per type across every logged meal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MealTypeTotals {
    pub breakfast: u64,
    pub lunch: u64,
    pub snack: u64,
    pub dinner: u64,
}

pub fn meal_type_totals(meals: &[Meal]) -> MealTypeTotals {
    meals
        .iter()
        .fold(MealTypeTotals::default(), |mut totals, meal| {
            match meal.meal_type {
                MealType::Breakfast => totals.breakfast += 1,
                MealType::Lunch => totals.lunch += 1,
                MealType::Snack => totals.snack += 1,
                MealType::Dinner => totals.dinner += 1,
            }
            totals
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaySummary {
    pub date: String,
    pub today_calories: i64,
    pub daily_calorie_goal: i32,
    pub progress: u8,
    pub exceeded_goal: bool,
    pub message: String,
    pub meal_type_totals: MealTypeTotals,
}

pub fn today_summary(
    daily_calorie_goal: Option<i32>,
    meals: &[Meal],
    now: OffsetDateTime,
) -> TodaySummary {
    let today = now.to_offset(UtcOffset::UTC).date();
    let goal = daily_calorie_goal.unwrap_or(DEFAULT_DAILY_CALORIE_GOAL);
    let calories = today_calories(meals, today);
    let progress = CalorieProgress::new(calories, goal);
    TodaySummary {
        date: dates::format_date(today),
        today_calories: calories,
        daily_calorie_goal: goal,
        progress: progress.percent,
        exceeded_goal: progress.exceeded,
        message: progress.message(),
        meal_type_totals: meal_type_totals(meals),
    }
}
