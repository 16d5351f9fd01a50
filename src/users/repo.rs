use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use super::repo_types::{ProfileUpdate, User};

const USER_COLUMNS: &str = "id, name, email, password_hash, gender, age, weight, height, \
     activity_level, daily_calorie_goal, profile_url, reminders, reminder_time, \
     weekly_report, created_at";

/// `create` fails with this when the email is already registered.
#[derive(Debug, Error)]
#[error("email already in use")]
pub struct EmailTaken;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn create(&self, name: &str, email: &str, password_hash: &str) -> anyhow::Result<User>;
    /// Returns `None` when no user has this id.
    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate)
        -> anyhow::Result<Option<User>>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn create(&self, name: &str, email: &str, password_hash: &str) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                anyhow::Error::new(EmailTaken)
            }
            e => anyhow::Error::new(e).context("insert user"),
        })?;
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                name               = COALESCE($2, name),
                gender             = COALESCE($3, gender),
                age                = COALESCE($4, age),
                weight             = COALESCE($5, weight),
                height             = COALESCE($6, height),
                activity_level     = COALESCE($7, activity_level),
                daily_calorie_goal = COALESCE($8, daily_calorie_goal),
                profile_url        = COALESCE($9, profile_url),
                reminders          = COALESCE($10, reminders),
                reminder_time      = COALESCE($11, reminder_time),
                weekly_report      = COALESCE($12, weekly_report)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.name.as_deref())
        .bind(update.gender)
        .bind(update.age)
        .bind(update.weight)
        .bind(update.height)
        .bind(update.activity_level)
        .bind(update.daily_calorie_goal)
        .bind(update.profile_url.as_deref())
        .bind(update.reminders)
        .bind(update.reminder_time.as_deref())
        .bind(update.weekly_report)
        .fetch_optional(&self.db)
        .await
        .context("update user profile")?;
        Ok(user)
    }
}
