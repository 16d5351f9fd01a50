use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::wizard::{self, StepRecord};
use crate::{
    auth::extractors::AuthUser,
    error::{ApiJson, AppError, AppResult},
    state::AppState,
    users::{dto::UserProfile, handlers::load_user},
};

#[derive(Debug, Deserialize)]
pub struct OnboardingRequest {
    pub steps: Vec<StepRecord>,
}

pub fn onboarding_routes() -> Router<AppState> {
    Router::new().route("/onboarding", post(complete_onboarding))
}

#[instrument(skip(state, req))]
pub async fn complete_onboarding(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(req): ApiJson<OnboardingRequest>,
) -> AppResult<Json<UserProfile>> {
    let data = wizard::fold_steps(req.steps).map_err(|e| {
        warn!(%user_id, error = %e, "rejected onboarding");
        e
    })?;
    let completed = data.completed;

    let update = data.into_profile_update();
    if update.is_empty() {
        return Ok(Json(load_user(&state, user_id).await?.into()));
    }

    let user = state
        .users
        .update_profile(user_id, &update)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    info!(%user_id, completed, goal = ?user.daily_calorie_goal, "onboarding saved");
    Ok(Json(user.into()))
}
