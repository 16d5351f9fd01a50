use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "activity_level", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String, // Argon2 PHC string, never leaves the server
    pub gender: Option<Gender>,
    pub age: Option<i32>,
    pub weight: Option<f64>, // kg
    pub height: Option<f64>, // cm
    pub activity_level: Option<ActivityLevel>,
    pub daily_calorie_goal: Option<i32>,
    pub profile_url: Option<String>,
    pub reminders: bool,
    pub reminder_time: String,
    pub weekly_report: bool,
    pub created_at: OffsetDateTime,
}

/// Partial profile update. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub age: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub daily_calorie_goal: Option<i32>,
    pub profile_url: Option<String>,
    pub reminders: Option<bool>,
    pub reminder_time: Option<String>,
    pub weekly_report: Option<bool>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == ProfileUpdate::default()
    }

    /// Applies the update to an in-memory record, mirroring the SQL `COALESCE` update.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(v) = &self.name {
            user.name = v.clone();
        }
        if let Some(v) = self.gender {
            user.gender = Some(v);
        }
        if let Some(v) = self.age {
            user.age = Some(v);
        }
        if let Some(v) = self.weight {
            user.weight = Some(v);
        }
        if let Some(v) = self.height {
            user.height = Some(v);
        }
        if let Some(v) = self.activity_level {
            user.activity_level = Some(v);
        }
        if let Some(v) = self.daily_calorie_goal {
            user.daily_calorie_goal = Some(v);
        }
        if let Some(v) = &self.profile_url {
            user.profile_url = Some(v.clone());
        }
        if let Some(v) = self.reminders {
            user.reminders = v;
        }
        if let Some(v) = &self.reminder_time {
            user.reminder_time = v.clone();
        }
        if let Some(v) = self.weekly_report {
            user.weekly_report = v;
        }
    }
}
