//! Hover readout handlers

use crate::error::AppError;
use crate::hover::{HoverReadout, HoverRequest, HoverResponse};
use axum::{extract::rejection::JsonRejection, Json};

/// Readout before any pointer event
pub async fn get_hover() -> Json<HoverReadout> {
    Json(HoverReadout::default())
}

/// Format a page's hover state
pub async fn post_hover(
    payload: Result<Json<HoverRequest>, JsonRejection>,
) -> Result<Json<HoverResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let readout = HoverReadout::from_events(&request.events);
    tracing::debug!(seq = request.seq, "Hover readout {:?}", readout);

    Ok(Json(HoverResponse {
        seq: request.seq,
        readout,
    }))
}
