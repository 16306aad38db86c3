//! Transcripts: plain-text rendering, the closing audit record in Postgres
//! and on-demand export to S3.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;

use crate::chat::conversation::Conversation;
use crate::errors::AppError;
use crate::extraction::schema::Field;
use crate::llm_client::Role;

/// Receives a conversation when it is closed.
#[async_trait]
pub trait TranscriptSink: Send + Sync {
    async fn record(&self, conversation: &Conversation) -> Result<(), AppError>;
}

/// Publishes a rendered transcript and returns where it was stored.
#[async_trait]
pub trait TranscriptExporter: Send + Sync {
    async fn export(&self, conversation: &Conversation) -> Result<String, AppError>;
}

pub struct PgTranscriptSink {
    pool: PgPool,
}

impl PgTranscriptSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TranscriptSink for PgTranscriptSink {
    async fn record(&self, conversation: &Conversation) -> Result<(), AppError> {
        let messages = serde_json::to_value(&conversation.messages)
            .map_err(|e| AppError::Internal(e.into()))?;
        let applicant = serde_json::to_value(&conversation.applicant)
            .map_err(|e| AppError::Internal(e.into()))?;

        sqlx::query(
            r#"
            INSERT INTO transcripts
                (conversation_id, persona, conversation_type, model,
                 messages, applicant, opened_at, closed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(conversation.id)
        .bind(conversation.persona.label())
        .bind(conversation.conversation_type.as_str())
        .bind(conversation.model.id())
        .bind(messages)
        .bind(applicant)
        .bind(conversation.created_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        info!(
            "Recorded transcript for conversation {} ({} turns)",
            conversation.id,
            conversation.turns()
        );
        Ok(())
    }
}

pub struct S3TranscriptExporter {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3TranscriptExporter {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl TranscriptExporter for S3TranscriptExporter {
    async fn export(&self, conversation: &Conversation) -> Result<String, AppError> {
        let key = format!(
            "transcripts/{}/{}.txt",
            conversation.id,
            Utc::now().format("%d-%m-%Y-%H-%M-%S")
        );
        let body = Bytes::from(render_transcript(conversation));

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .content_type("text/plain; charset=utf-8")
            .send()
            .await
            .map_err(|e| AppError::S3(format!("Transcript upload failed: {e}")))?;

        info!("Uploaded transcript to s3://{}/{}", self.bucket, key);
        Ok(key)
    }
}

/// Renders the visible history and the applicant record as plain text.
pub fn render_transcript(conversation: &Conversation) -> String {
    let mut out = format!("Conversation {}\n", conversation.id);
    out.push_str(&format!("Persona: {}\n", conversation.persona.label()));
    out.push_str(&format!("Model: {}\n", conversation.model.id()));
    out.push_str(&format!(
        "Started: {}\n\n",
        conversation.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    for message in conversation.visible_messages() {
        let role = match message.role {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => continue,
        };
        out.push_str(&format!("[{role}]: {}\n", message.content));
    }

    out.push_str("\nApplicant record:\n");
    for field in Field::ALL {
        let value = match conversation.applicant.get(field) {
            Some(v) => serde_json::to_string(&v).unwrap_or_default(),
            None => "unknown".to_string(),
        };
        out.push_str(&format!("- {field}: {value}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::conversation::{ConversationOptions, GREETING};
    use crate::chat::personas::Persona;

    #[test]
    fn test_render_transcript_hides_system_prompt() {
        let mut conversation = Conversation::new(ConversationOptions {
            persona: Persona::InsuranceAdvisor,
            ..Default::default()
        });
        conversation.push_user("My name is Jane Doe");
        conversation.push_assistant("Thank you, Jane.");
        conversation.applicant.first_name = Some("Jane".to_string());
        conversation.applicant.age = Some(34.0);

        let text = render_transcript(&conversation);

        assert!(text.contains("Persona: Insurance Advisor"));
        assert!(text.contains(&format!("[assistant]: {GREETING}")));
        assert!(text.contains("[user]: My name is Jane Doe"));
        assert!(!text.contains("insurance agent helper bot"));
        assert!(text.contains("- first_name: \"Jane\""));
        assert!(text.contains("- age: 34.0"));
        assert!(text.contains("- BMI: unknown"));
    }
}
