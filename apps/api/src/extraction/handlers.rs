//! Axum route handlers for stateless extraction.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::extraction::{ApplicantRecord, ConversationType, TurnUpdate};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
    #[serde(default)]
    pub current: ApplicantRecord,
    #[serde(default)]
    pub conversation_type: ConversationType,
}

/// POST /api/v1/extract
///
/// Runs one extraction turn against a caller-held record and returns the merged record.
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<TurnUpdate>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let update = state
        .extractor
        .filter_response(&request.text, &request.current, request.conversation_type)
        .await;

    Ok(Json(update))
}
