use serde::Serialize;
use tracing::{debug, error, info};

use crate::chat::conversation::Conversation;
use crate::chat::tokens::estimate_tokens;
use crate::errors::AppError;
use crate::extraction::outcome::ExtractionOutcome;
use crate::extraction::{ApplicantRecord, Extractor};
use crate::llm_client::ChatBackend;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TokenCounts {
    /// Estimated tokens in the user's message.
    pub prompt: u32,
    /// Tokens the model reported for its reply.
    pub reply: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnResult {
    pub reply: String,
    pub applicant: ApplicantRecord,
    pub extraction: Option<ExtractionOutcome>,
    /// Present only when the conversation has `show_tokens` set.
    pub tokens: Option<TokenCounts>,
}

/// Runs one user turn: chat reply first, then field extraction on the user's text.
///
/// A chat failure rolls the user message back and returns an error. Extraction
/// never fails the turn; a degraded outcome just leaves the record as it was.
pub async fn run_turn(
    conversation: &mut Conversation,
    content: &str,
    chat: &dyn ChatBackend,
    extractor: &Extractor,
) -> Result<TurnResult, AppError> {
    conversation.push_user(content);
    let prompt_tokens = estimate_tokens(content);
    info!(
        "[user] conversation={} tokens={}: {}",
        conversation.id, prompt_tokens, content
    );

    let reply = match chat.reply(conversation.model, &conversation.messages).await {
        Ok(reply) => reply,
        Err(e) => {
            conversation.pop_user();
            error!("Chat reply failed for conversation {}: {e}", conversation.id);
            return Err(AppError::Llm(e.to_string()));
        }
    };
    conversation.push_assistant(reply.text.clone());
    info!(
        "[assistant] conversation={} tokens={}: {}",
        conversation.id, reply.usage.output_tokens, reply.text
    );

    let update = extractor
        .filter_response(content, &conversation.applicant, conversation.conversation_type)
        .await;
    if update.outcome.as_ref().is_some_and(ExtractionOutcome::is_degraded) {
        debug!("Applicant record unchanged for conversation {}", conversation.id);
    }
    conversation.applicant = update.record;

    Ok(TurnResult {
        reply: reply.text,
        applicant: conversation.applicant.clone(),
        extraction: update.outcome,
        tokens: conversation.show_tokens.then_some(TokenCounts {
            prompt: prompt_tokens,
            reply: reply.usage.output_tokens,
        }),
    })
}
