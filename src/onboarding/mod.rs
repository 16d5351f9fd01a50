pub mod handlers;
pub mod wizard;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::onboarding_routes()
}
