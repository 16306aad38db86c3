use std::sync::Arc;

use crate::chat::store::ConversationStore;
use crate::extraction::Extractor;
use crate::llm_client::ChatBackend;
use crate::transcript::{TranscriptExporter, TranscriptSink};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Produces assistant replies. Default: `LlmClient`.
    pub chat: Arc<dyn ChatBackend>,
    pub extractor: Extractor,
    pub conversations: ConversationStore,
    /// Receives each conversation when it is closed.
    pub transcripts: Arc<dyn TranscriptSink>,
    pub exporter: Arc<dyn TranscriptExporter>,
}
