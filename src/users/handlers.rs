use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{RecommendedGoalResponse, UserProfile},
    goal::{validate_metrics, BodyProfile, DEFAULT_DAILY_CALORIE_GOAL},
    repo_types::{ProfileUpdate, User},
};
use crate::{
    auth::extractors::AuthUser,
    dates,
    error::{ApiJson, AppError, AppResult},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(get_profile).patch(update_profile))
        .route("/users/recommended-goal", get(recommended_goal))
}

pub(crate) async fn load_user(state: &AppState, user_id: uuid::Uuid) -> AppResult<User> {
    state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound("User"))
}

/// Rejects updates the profile form would not allow.
pub(crate) fn validate_update(update: &ProfileUpdate) -> Result<(), String> {
    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err("name must not be empty".into());
        }
    }
    if let Some(goal) = update.daily_calorie_goal {
        if goal <= 0 {
            return Err("dailyCalorieGoal must be positive".into());
        }
    }
    if let Some(t) = &update.reminder_time {
        dates::parse_time(t).map_err(|_| format!("invalid reminderTime `{t}`, expected HH:MM"))?;
    }
    validate_metrics(update.age, update.weight, update.height)
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<UserProfile>> {
    let user = load_user(&state, user_id).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, update))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(mut update): ApiJson<ProfileUpdate>,
) -> AppResult<Json<UserProfile>> {
    if update.is_empty() {
        return Err(AppError::BadRequest("No update data provided".into()));
    }
    if let Some(name) = update.name.as_mut() {
        *name = name.trim().to_string();
    }
    if let Err(msg) = validate_update(&update) {
        warn!(%user_id, %msg, "rejected profile update");
        return Err(AppError::BadRequest(msg));
    }

    let user = state
        .users
        .update_profile(user_id, &update)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    info!(%user_id, "profile updated");
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn recommended_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<RecommendedGoalResponse>> {
    let user = load_user(&state, user_id).await?;
    let profile = BodyProfile::from_user(&user);
    Ok(Json(RecommendedGoalResponse {
        recommended_calories: profile.recommended_calorie_goal(),
        daily_calorie_goal: user.daily_calorie_goal.unwrap_or(DEFAULT_DAILY_CALORIE_GOAL),
        profile,
    }))
}
