//! Axum route handlers for the Conversation API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::conversation::{Conversation, ConversationOptions};
use crate::chat::personas::Persona;
use crate::chat::turn::{run_turn, TurnResult};
use crate::errors::AppError;
use crate::extraction::{ApplicantRecord, ConversationType};
use crate::llm_client::{ChatMessage, ChatModel};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ConversationView {
    pub id: Uuid,
    pub persona: Persona,
    pub conversation_type: ConversationType,
    pub model: ChatModel,
    pub show_tokens: bool,
    pub messages: Vec<ChatMessage>,
    pub applicant: ApplicantRecord,
}

impl From<&Conversation> for ConversationView {
    fn from(c: &Conversation) -> Self {
        Self {
            id: c.id,
            persona: c.persona,
            conversation_type: c.conversation_type,
            model: c.model,
            show_tokens: c.show_tokens,
            messages: c.visible_messages().into_iter().cloned().collect(),
            applicant: c.applicant.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct TranscriptExportResponse {
    pub key: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/conversations
pub async fn handle_create_conversation(
    State(state): State<AppState>,
    Json(options): Json<ConversationOptions>,
) -> Result<(StatusCode, Json<ConversationView>), AppError> {
    let conversation = Conversation::new(options);
    let view = ConversationView::from(&conversation);
    state.conversations.insert(conversation).await;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/conversations/:id
pub async fn handle_get_conversation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConversationView>, AppError> {
    let conversation = state.conversations.get(id).await?;
    Ok(Json(ConversationView::from(&conversation)))
}

/// POST /api/v1/conversations/:id/messages
///
/// One turn: assistant reply plus the applicant record after extraction.
pub async fn handle_send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<TurnResult>, AppError> {
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }

    let mut conversation = state.conversations.get(id).await?;
    let result = run_turn(
        &mut conversation,
        &request.content,
        state.chat.as_ref(),
        &state.extractor,
    )
    .await?;
    state.conversations.replace(conversation).await?;

    Ok(Json(result))
}

/// POST /api/v1/conversations/:id/clear
pub async fn handle_clear_conversation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConversationView>, AppError> {
    let mut conversation = state.conversations.get(id).await?;
    conversation.clear_history();
    let view = ConversationView::from(&conversation);
    state.conversations.replace(conversation).await?;
    Ok(Json(view))
}

/// GET /api/v1/conversations/:id/applicant
pub async fn handle_get_applicant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicantRecord>, AppError> {
    let conversation = state.conversations.get(id).await?;
    Ok(Json(conversation.applicant))
}

/// POST /api/v1/conversations/:id/transcript
pub async fn handle_export_transcript(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TranscriptExportResponse>, AppError> {
    let conversation = state.conversations.get(id).await?;
    let key = state.exporter.export(&conversation).await?;
    Ok(Json(TranscriptExportResponse { key }))
}

/// DELETE /api/v1/conversations/:id
///
/// Records the transcript, then discards the conversation and its applicant record.
pub async fn handle_close_conversation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let conversation = state.conversations.get(id).await?;
    state.transcripts.record(&conversation).await?;
    state.conversations.remove(id).await?;
    tracing::info!(
        "Closed conversation {id}; {} still open",
        state.conversations.len().await
    );
    Ok(StatusCode::NO_CONTENT)
}
