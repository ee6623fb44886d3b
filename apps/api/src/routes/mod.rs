pub mod ats;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/ats-score",
            post(ats::handle_ats_score).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .with_state(state)
}
