use time::Date;

use super::{
    dto::MealFields,
    repo_types::{Meal, NewMeal},
};
use crate::dates;

pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg?height=200&width=400";

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// A submitted value wins and must not be blank; only an absent one falls back.
fn required(
    submitted: Option<String>,
    stored: impl FnOnce() -> Option<String>,
) -> Option<String> {
    match submitted {
        Some(s) => non_empty(s),
        None => stored(),
    }
}

impl MealFields {
    /// Resolves the submitted fields into a storable meal.
    ///
    /// Fields missing from the submission fall back to `base` (the stored meal
    /// on edit); a blank required field is rejected either way. A meal dated
    /// after `today` is rejected.
    pub fn into_new_meal(self, base: Option<&Meal>, today: Date) -> Result<NewMeal, String> {
        let name = required(self.name, || base.map(|m| m.name.clone()));
        let calories = self.calories.or_else(|| base.map(|m| i64::from(m.calories)));
        let meal_type = self.meal_type.or_else(|| base.map(|m| m.meal_type));
        let date = required(self.date, || base.map(|m| m.date.clone()));
        let time = required(self.time, || base.map(|m| m.time.clone()));

        let (Some(name), Some(calories), Some(meal_type), Some(date), Some(time)) =
            (name, calories, meal_type, date, time)
        else {
            return Err("Missing required fields".into());
        };

        let calories = i32::try_from(calories)
            .ok()
            .filter(|c| *c >= 0)
            .ok_or_else(|| "calories must be a non-negative integer".to_string())?;

        let parsed = dates::parse_date(&date)
            .map_err(|_| format!("invalid date `{date}`, expected YYYY-MM-DD"))?;
        if parsed > today {
            return Err("Meal date cannot be in the future".into());
        }
        dates::parse_time(&time).map_err(|_| format!("invalid time `{time}`, expected HH:MM"))?;

        let description = self
            .description
            .or_else(|| base.map(|m| m.description.clone()))
            .unwrap_or_default();
        let image = self
            .image
            .and_then(non_empty)
            .or_else(|| base.map(|m| m.image.clone()))
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());
        let is_favorite = self
            .is_favorite
            .or_else(|| base.map(|m| m.is_favorite))
            .unwrap_or(false);

        Ok(NewMeal {
            name,
            description,
            calories,
            meal_type,
            date,
            time,
            image,
            is_favorite,
        })
    }
}
