//! Dashboard page handler

use crate::state::AppState;
use axum::{extract::State, response::Html};
use std::sync::Arc;

/// The dashboard page
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.dashboard_html.clone())
}
