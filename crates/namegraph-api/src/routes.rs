//! API route definitions

use crate::handlers::{graphs, hover};
use crate::state::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Create API v1 routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/graphs/:level", get(graphs::get_graph))
        .route("/subjects", get(graphs::list_subjects))
        .route("/hover", get(hover::get_hover).post(hover::post_hover))
}
