use axum::{extract::State, routing::get, Json, Router};
use time::OffsetDateTime;
use tracing::{debug, instrument, warn};

use super::metrics::{self, DashboardSummary, TodaySummary};
use crate::{
    auth::extractors::AuthUser,
    error::AppResult,
    state::AppState,
    users::handlers::load_user,
};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/today", get(get_today))
}

#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<DashboardSummary>> {
    let user = load_user(&state, user_id).await?;
    let meals = state.meals.find_by_user(user_id).await?;

    let summary = metrics::summarize(user.daily_calorie_goal, &meals, OffsetDateTime::now_utc())
        .map_err(|e| {
            warn!(%user_id, error = %e, "stored meal date is malformed");
            e
        })?;

    debug!(
        %user_id,
        total_meals = summary.total_meals,
        streak = summary.streak,
        "dashboard computed"
    );
    Ok(Json(summary))
}

#[instrument(skip(state))]
pub async fn get_today(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<TodaySummary>> {
    let user = load_user(&state, user_id).await?;
    let meals = state.meals.find_by_user(user_id).await?;
    Ok(Json(metrics::today_summary(
        user.daily_calorie_goal,
        &meals,
        OffsetDateTime::now_utc(),
    )))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use time::Duration;

    use crate::{dates, state::AppState, testing};

    fn days_ago(n: i64) -> String {
        dates::format_date(dates::today_utc() - Duration::days(n))
    }

    #[tokio::test]
    async fn dashboard_reports_flat_summary() {
        let state = AppState::fake();
        let user = testing::seed_user(&state, "ana@example.com").await;
        testing::seed_meal(&state, user.id, &days_ago(0), 400, true).await;
        testing::seed_meal(&state, user.id, &days_ago(0), 600, false).await;
        testing::seed_meal(&state, user.id, &days_ago(1), 500, false).await;
        testing::seed_meal(&state, user.id, &days_ago(2), 500, true).await;

        let (status, body) = testing::call(
            &state,
            Method::GET,
            "/api/v1/dashboard",
            Some(&testing::access_token(&state, user.id)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({
                "dailyCalorieGoal": 2000,
                "totalMeals": 4,
                "totalFavoriteMeals": 2,
                "streak": 3
            })
        );
    }

    #[tokio::test]
    async fn dashboard_ignores_other_users_meals() {
        let state = AppState::fake();
        let user = testing::seed_user(&state, "ana@example.com").await;
        let other = testing::seed_user(&state, "bia@example.com").await;
        testing::seed_meal(&state, other.id, &days_ago(0), 400, true).await;

        let (_, body) = testing::call(
            &state,
            Method::GET,
            "/api/v1/dashboard",
            Some(&testing::access_token(&state, user.id)),
            None,
        )
        .await;
        assert_eq!(body["totalMeals"], 0);
        assert_eq!(body["streak"], 0);
    }

    #[tokio::test]
    async fn malformed_stored_date_is_unprocessable() {
        let state = AppState::fake();
        let user = testing::seed_user(&state, "ana@example.com").await;
        testing::seed_meal(&state, user.id, "yesterday", 400, false).await;

        let (status, body) = testing::call(
            &state,
            Method::GET,
            "/api/v1/dashboard",
            Some(&testing::access_token(&state, user.id)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap_or_default().contains("yesterday"));
    }

    #[tokio::test]
    async fn today_reports_overage() {
        let state = AppState::fake();
        let user = testing::seed_user(&state, "ana@example.com").await;
        testing::seed_meal(&state, user.id, &days_ago(0), 1500, false).await;
        testing::seed_meal(&state, user.id, &days_ago(0), 1000, false).await;
        testing::seed_meal(&state, user.id, &days_ago(1), 3000, false).await;

        let (status, body) = testing::call(
            &state,
            Method::GET,
            "/api/v1/dashboard/today",
            Some(&testing::access_token(&state, user.id)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["todayCalories"], 2500);
        assert_eq!(body["progress"], 100);
        assert_eq!(body["exceededGoal"], true);
        assert_eq!(body["mealTypeTotals"]["Lunch"], 3);
    }

    #[tokio::test]
    async fn dashboard_requires_authentication() {
        let state = AppState::fake();
        let (status, _) = testing::call(&state, Method::GET, "/api/v1/dashboard", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
