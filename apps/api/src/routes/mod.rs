pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::chat::handlers;
use crate::extraction::handlers::handle_extract;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Extraction API
        .route("/api/v1/extract", post(handle_extract))
        // Conversation API
        .route(
            "/api/v1/conversations",
            post(handlers::handle_create_conversation),
        )
        .route(
            "/api/v1/conversations/:id",
            get(handlers::handle_get_conversation).delete(handlers::handle_close_conversation),
        )
        .route(
            "/api/v1/conversations/:id/messages",
            post(handlers::handle_send_message),
        )
        .route(
            "/api/v1/conversations/:id/clear",
            post(handlers::handle_clear_conversation),
        )
        .route(
            "/api/v1/conversations/:id/applicant",
            get(handlers::handle_get_applicant),
        )
        .route(
            "/api/v1/conversations/:id/transcript",
            post(handlers::handle_export_transcript),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::chat::conversation::Conversation;
    use crate::chat::store::ConversationStore;
    use crate::chat::turn::tests::EchoBackend;
    use crate::errors::AppError;
    use crate::extraction::extractor::tests::FixedService;
    use crate::extraction::Extractor;
    use crate::transcript::{TranscriptExporter, TranscriptSink};

    #[derive(Default)]
    struct RecordingSink {
        closed: Mutex<Vec<Uuid>>,
    }

    #[async_trait]
    impl TranscriptSink for RecordingSink {
        async fn record(&self, conversation: &Conversation) -> Result<(), AppError> {
            self.closed.lock().unwrap().push(conversation.id);
            Ok(())
        }
    }

    struct KeyExporter;

    #[async_trait]
    impl TranscriptExporter for KeyExporter {
        async fn export(&self, conversation: &Conversation) -> Result<String, AppError> {
            Ok(format!("transcripts/{}/test.txt", conversation.id))
        }
    }

    fn test_state(reply: Value) -> (AppState, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let state = AppState {
            chat: Arc::new(EchoBackend),
            extractor: Extractor::new(FixedService::new(reply)),
            conversations: ConversationStore::new(),
            transcripts: sink.clone(),
            exporter: Arc::new(KeyExporter),
        };
        (state, sink)
    }

    async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _) = test_state(json!({}));
        let router = build_router(state);
        let (status, body) = send(&router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_stateless_extract_merges_caller_record() {
        let (state, _) = test_state(json!({"age": 34}));
        let router = build_router(state);

        let (status, body) = send(
            &router,
            Method::POST,
            "/api/v1/extract",
            Some(json!({
                "text": "I am 34 years old",
                "current": {"first_name": "Jane"},
                "conversation_type": "life_insurance"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["record"]["first_name"], "Jane");
        assert_eq!(body["record"]["age"], 34.0);
        assert_eq!(body["outcome"]["status"], "partial");
    }

    #[tokio::test]
    async fn test_stateless_extract_passthrough_for_other_types() {
        let (state, _) = test_state(json!({"age": 34}));
        let router = build_router(state);

        let (status, body) = send(
            &router,
            Method::POST,
            "/api/v1/extract",
            Some(json!({
                "text": "I am 34 years old",
                "current": {"first_name": "Jane"},
                "conversation_type": "car_insurance"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["record"]["age"], Value::Null);
        assert_eq!(body["outcome"], Value::Null);
    }

    #[tokio::test]
    async fn test_extract_rejects_blank_text() {
        let (state, _) = test_state(json!({}));
        let router = build_router(state);
        let (status, body) = send(
            &router,
            Method::POST,
            "/api/v1/extract",
            Some(json!({"text": "  "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_conversation_lifecycle() {
        let (state, sink) = test_state(json!({"first_name": "Jane", "last_name": "Doe"}));
        let store = state.conversations.clone();
        let router = build_router(state);

        let (status, created) = send(
            &router,
            Method::POST,
            "/api/v1/conversations",
            Some(json!({"persona": "mini_questionnaire", "show_tokens": true})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["conversation_type"], "life_insurance");
        assert_eq!(created["messages"].as_array().unwrap().len(), 1);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, turn) = send(
            &router,
            Method::POST,
            &format!("/api/v1/conversations/{id}/messages"),
            Some(json!({"content": "My name is Jane Doe"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(turn["reply"], "You said: My name is Jane Doe");
        assert_eq!(turn["applicant"]["last_name"], "Doe");
        assert_eq!(turn["tokens"]["reply"], 7);

        let (_, applicant) = send(
            &router,
            Method::GET,
            &format!("/api/v1/conversations/{id}/applicant"),
            None,
        )
        .await;
        assert_eq!(applicant["first_name"], "Jane");

        let (status, export) = send(
            &router,
            Method::POST,
            &format!("/api/v1/conversations/{id}/transcript"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(export["key"], format!("transcripts/{id}/test.txt"));

        let (status, _) = send(
            &router,
            Method::DELETE,
            &format!("/api/v1/conversations/{id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(sink.closed.lock().unwrap().len(), 1);
        assert_eq!(store.len().await, 0);

        let (status, body) = send(
            &router,
            Method::GET,
            &format!("/api/v1/conversations/{id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_clear_resets_history_and_record() {
        let (state, _) = test_state(json!({"age": 61}));
        let router = build_router(state);

        let (_, created) = send(
            &router,
            Method::POST,
            "/api/v1/conversations",
            Some(json!({"persona": "full_questionnaire"})),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        send(
            &router,
            Method::POST,
            &format!("/api/v1/conversations/{id}/messages"),
            Some(json!({"content": "I'm 61"})),
        )
        .await;

        let (status, cleared) = send(
            &router,
            Method::POST,
            &format!("/api/v1/conversations/{id}/clear"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cleared["messages"].as_array().unwrap().len(), 1);
        assert_eq!(cleared["applicant"]["age"], Value::Null);
    }

    #[tokio::test]
    async fn test_general_conversation_does_not_extract() {
        let (state, _) = test_state(json!({"age": 34}));
        let router = build_router(state);

        let (_, created) = send(
            &router,
            Method::POST,
            "/api/v1/conversations",
            Some(json!({"persona": "simple_assistant"})),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, turn) = send(
            &router,
            Method::POST,
            &format!("/api/v1/conversations/{id}/messages"),
            Some(json!({"content": "I am 34"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(turn["extraction"], Value::Null);
        assert_eq!(turn["applicant"]["age"], Value::Null);
        assert_eq!(turn["tokens"], Value::Null);
    }
}
