use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    goal::BodyProfile,
    repo_types::{ActivityLevel, Gender, User},
};

/// Profile returned to the owner. Never carries the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub gender: Option<Gender>,
    pub age: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub daily_calorie_goal: Option<i32>,
    pub profile_url: Option<String>,
    pub reminders: bool,
    pub reminder_time: String,
    pub weekly_report: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            gender: u.gender,
            age: u.age,
            weight: u.weight,
            height: u.height,
            activity_level: u.activity_level,
            daily_calorie_goal: u.daily_calorie_goal,
            profile_url: u.profile_url,
            reminders: u.reminders,
            reminder_time: u.reminder_time,
            weekly_report: u.weekly_report,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedGoalResponse {
    pub recommended_calories: i32,
    pub daily_calorie_goal: i32,
    pub profile: BodyProfile,
}
