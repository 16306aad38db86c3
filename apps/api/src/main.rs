mod chat;
mod config;
mod db;
mod errors;
mod extraction;
mod llm_client;
mod routes;
mod state;
mod transcript;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chat::store::ConversationStore;
use crate::config::Config;
use crate::db::create_pool;
use crate::extraction::rules::ValidationRules;
use crate::extraction::service::LlmExtractionService;
use crate::extraction::Extractor;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::transcript::{PgTranscriptSink, S3TranscriptExporter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Underwriter API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (transcript audit sink)
    let db = create_pool(&config.database_url).await?;

    // Initialize S3 / MinIO (transcript exports)
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (extraction model: {})", llm_client::MODEL);

    // Initialize extractor (rules are opt-in; off unless configured)
    let rules = ValidationRules::from_flags(config.enforce_age_range, config.enforce_non_negative);
    if !rules.is_empty() {
        info!("Extraction rules enabled: {:?}", rules);
    }
    let extractor = Extractor::new(Arc::new(LlmExtractionService::new(llm.clone())))
        .with_rules(rules)
        .with_timeout(Duration::from_secs(config.extraction_timeout_secs));

    // Build app state
    let state = AppState {
        chat: Arc::new(llm),
        extractor,
        conversations: ConversationStore::new(),
        transcripts: Arc::new(PgTranscriptSink::new(db)),
        exporter: Arc::new(S3TranscriptExporter::new(s3, config.s3_bucket.clone())),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the chat UI has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "underwriter-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
