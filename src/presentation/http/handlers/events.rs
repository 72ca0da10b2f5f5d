//! Event Ingestion Handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::application::dto::{AckResponse, IngestEventRequest};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// POST /api/events
///
/// Accepts one visitor event and fans the resulting updates out to every
/// connected dashboard before acknowledging.
pub async fn ingest_event(
    State(state): State<AppState>,
    payload: Result<Json<IngestEventRequest>, JsonRejection>,
) -> Result<Json<AckResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    state.processor.handle(request)?;

    Ok(Json(AckResponse::ok()))
}
