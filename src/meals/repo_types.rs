use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "meal_type")]
pub enum MealType {
    Breakfast,
    Lunch,
    Snack,
    Dinner,
}

/// Meal record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub calories: i32,
    pub meal_type: MealType,
    pub date: String, // YYYY-MM-DD as submitted
    pub time: String, // HH:MM
    pub image: String,
    pub is_favorite: bool,
    pub created_at: OffsetDateTime,
}

/// Validated meal fields ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMeal {
    pub name: String,
    pub description: String,
    pub calories: i32,
    pub meal_type: MealType,
    pub date: String,
    pub time: String,
    pub image: String,
    pub is_favorite: bool,
}
