use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Meal, NewMeal};

const MEAL_COLUMNS: &str =
    "id, user_id, name, description, calories, meal_type, date, time, image, is_favorite, created_at";

#[async_trait]
pub trait MealStore: Send + Sync {
    async fn insert(&self, user_id: Uuid, meal: &NewMeal) -> anyhow::Result<Meal>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Meal>>;
    /// All meals of a user, most recent date first.
    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>>;
    async fn update(&self, id: Uuid, meal: &NewMeal) -> anyhow::Result<Option<Meal>>;
    /// Returns `false` when the user owns no meal with this id.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
    async fn toggle_favorite(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Meal>>;
}

#[derive(Clone)]
pub struct PgMealStore {
    db: PgPool,
}

impl PgMealStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MealStore for PgMealStore {
    async fn insert(&self, user_id: Uuid, meal: &NewMeal) -> anyhow::Result<Meal> {
        let row = sqlx::query_as::<_, Meal>(&format!(
            r#"
            INSERT INTO meals (user_id, name, description, calories, meal_type, date, time, image, is_favorite)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {MEAL_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&meal.name)
        .bind(&meal.description)
        .bind(meal.calories)
        .bind(meal.meal_type)
        .bind(&meal.date)
        .bind(&meal.time)
        .bind(&meal.image)
        .bind(meal.is_favorite)
        .fetch_one(&self.db)
        .await
        .context("insert meal")?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Meal>> {
        let row = sqlx::query_as::<_, Meal>(&format!(
            "SELECT {MEAL_COLUMNS} FROM meals WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find meal by id")?;
        Ok(row)
    }

    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(&format!(
            r#"
            SELECT {MEAL_COLUMNS}
              FROM meals
             WHERE user_id = $1
             ORDER BY date DESC, time DESC, created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list meals by user")?;
        Ok(rows)
    }

    async fn update(&self, id: Uuid, meal: &NewMeal) -> anyhow::Result<Option<Meal>> {
        let row = sqlx::query_as::<_, Meal>(&format!(
            r#"
            UPDATE meals SET
                name = $2, description = $3, calories = $4, meal_type = $5,
                date = $6, time = $7, image = $8, is_favorite = $9
            WHERE id = $1
            RETURNING {MEAL_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&meal.name)
        .bind(&meal.description)
        .bind(meal.calories)
        .bind(meal.meal_type)
        .bind(&meal.date)
        .bind(&meal.time)
        .bind(&meal.image)
        .bind(meal.is_favorite)
        .fetch_optional(&self.db)
        .await
        .context("update meal")?;
        Ok(row)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM meals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("delete meal")?;
        Ok(result.rows_affected() > 0)
    }

    async fn toggle_favorite(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Meal>> {
        let row = sqlx::query_as::<_, Meal>(&format!(
            r#"
            UPDATE meals SET is_favorite = NOT is_favorite
            WHERE id = $1 AND user_id = $2
            RETURNING {MEAL_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("toggle meal favorite")?;
        Ok(row)
    }
}
