use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Meal, MealType};

/// Editable meal fields as submitted by the meal dialog. Everything is optional
/// here; `validation` decides what is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub calories: Option<i64>,
    #[serde(rename = "type")]
    pub meal_type: Option<MealType>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub image: Option<String>,
    pub is_favorite: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMealRequest {
    #[serde(default, alias = "_id")]
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub fields: MealFields,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub calories: i32,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub date: String,
    pub time: String,
    pub image: String,
    pub is_favorite: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Meal> for MealResponse {
    fn from(m: Meal) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            calories: m.calories,
            meal_type: m.meal_type,
            date: m.date,
            time: m.time,
            image: m.image,
            is_favorite: m.is_favorite,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MealListResponse {
    pub data: Vec<MealResponse>,
}

#[derive(Debug, Serialize)]
pub struct MealMessageResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal: Option<MealResponse>,
}
