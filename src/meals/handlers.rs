use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{
    MealFields, MealListResponse, MealMessageResponse, MealResponse, UpdateMealRequest,
};
use crate::{
    auth::extractors::AuthUser,
    dates,
    error::{ApiJson, AppError, AppResult},
    state::AppState,
    users::handlers::load_user,
};

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal).put(update_meal))
        .route("/meals/:id", patch(toggle_favorite).delete(delete_meal))
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<MealListResponse>> {
    let meals = state.meals.find_by_user(user_id).await?;
    Ok(Json(MealListResponse {
        data: meals.into_iter().map(MealResponse::from).collect(),
    }))
}

#[instrument(skip(state, fields))]
pub async fn create_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(fields): ApiJson<MealFields>,
) -> AppResult<(StatusCode, [(header::HeaderName, String); 1], Json<MealResponse>)> {
    load_user(&state, user_id).await?;

    let new_meal = fields
        .into_new_meal(None, dates::today_utc())
        .map_err(|msg| {
            warn!(%user_id, %msg, "rejected meal");
            AppError::BadRequest(msg)
        })?;

    let meal = state.meals.insert(user_id, &new_meal).await?;
    info!(%user_id, meal_id = %meal.id, date = %meal.date, "meal created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/v1/meals/{}", meal.id))],
        Json(meal.into()),
    ))
}

#[instrument(skip(state, body))]
pub async fn update_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<UpdateMealRequest>,
) -> AppResult<Json<MealResponse>> {
    let id = body
        .id
        .ok_or_else(|| AppError::BadRequest("ID is required".into()))?;
    let stored = state
        .meals
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Meal"))?;

    if stored.user_id != user_id {
        warn!(%user_id, meal_id = %id, "meal belongs to another user");
        return Err(AppError::Forbidden);
    }

    let new_meal = body
        .fields
        .into_new_meal(Some(&stored), dates::today_utc())
        .map_err(AppError::BadRequest)?;

    let meal = state
        .meals
        .update(id, &new_meal)
        .await?
        .ok_or(AppError::NotFound("Meal"))?;

    info!(%user_id, meal_id = %id, "meal updated");
    Ok(Json(meal.into()))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MealMessageResponse>> {
    if !state.meals.delete(user_id, id).await? {
        return Err(AppError::NotFound("Meal"));
    }
    info!(%user_id, meal_id = %id, "meal deleted");
    Ok(Json(MealMessageResponse {
        message: "Meal deleted successfully",
        meal: None,
    }))
}

#[instrument(skip(state))]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MealMessageResponse>> {
    let meal = state
        .meals
        .toggle_favorite(user_id, id)
        .await?
        .ok_or(AppError::NotFound("Meal"))?;
    info!(%user_id, meal_id = %id, is_favorite = meal.is_favorite, "favorite toggled");
    Ok(Json(MealMessageResponse {
        message: "Favorite status updated",
        meal: Some(meal.into()),
    }))
}
