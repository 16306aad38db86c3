//! Extraction service: the external capability that fills a schema from text.
//!
//! The service only returns the model's raw JSON object. Checking it against
//! the schema happens in `Extractor`, so every backend is held to the same rules.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::extraction::prompts::{EXTRACTION_PROMPT_TEMPLATE, EXTRACTION_SYSTEM};
use crate::extraction::schema::ExtractionRequest;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("extraction timed out after {0}s")]
    Timeout(u64),
}

#[async_trait]
pub trait ExtractionService: Send + Sync {
    async fn extract(&self, request: ExtractionRequest<'_>) -> Result<Value, ExtractionError>;
}

/// Extraction backed by the hosted model.
pub struct LlmExtractionService {
    llm: LlmClient,
    system: String,
}

impl LlmExtractionService {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            system: format!("{EXTRACTION_SYSTEM} {JSON_ONLY_SYSTEM}"),
        }
    }
}

#[async_trait]
impl ExtractionService for LlmExtractionService {
    async fn extract(&self, request: ExtractionRequest<'_>) -> Result<Value, ExtractionError> {
        let prompt = build_prompt(request);
        Ok(self.llm.call_json::<Value>(&prompt, &self.system).await?)
    }
}

fn build_prompt(request: ExtractionRequest<'_>) -> String {
    let schema_json = serde_json::to_string_pretty(&request.schema.to_json_schema())
        .unwrap_or_else(|_| "{}".to_string());
    EXTRACTION_PROMPT_TEMPLATE
        .replace("{schema_json}", &schema_json)
        .replace("{text}", request.text)
}
