pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::quote;
use crate::resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/cotacao", post(quote::handle_quote))
        .route("/api/curriculo", post(resume::handle_resume))
        // Slightly above the attachment ceiling so the policy check, not the
        // framework default, is what rejects oversized uploads.
        .layer(DefaultBodyLimit::max(resume::MAX_UPLOAD_BYTES + 64 * 1024))
        .with_state(state)
}
