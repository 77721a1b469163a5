pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching settings
        .route(
            "/api/v1/matching/settings",
            get(handlers::handle_get_settings).put(handlers::handle_save_settings),
        )
        .route(
            "/api/v1/matching/settings/reset",
            post(handlers::handle_reset_settings),
        )
        .route(
            "/api/v1/matching/summary",
            get(handlers::handle_matching_summary),
        )
        // Per-campaign matching
        .route(
            "/api/v1/campaigns/:id/matches",
            get(handlers::handle_campaign_matches),
        )
        .route(
            "/api/v1/campaigns/:id/auto-match",
            post(handlers::handle_auto_match),
        )
        .with_state(state)
}
