use std::sync::Arc;

use anyhow::Result;
use companion_chat_auth::HttpSessionVerifier;
use companion_chat_embeddings::OpenAiEmbeddings;
use companion_chat_http::{AppState, create_router};
use companion_chat_llm::LlmClient;
use companion_chat_service::{ChatService, CompanionService, MemoryService};
use companion_chat_storage::PgStorage;
use companion_chat_vector::{MemoryIndex, QdrantIndex};

use crate::config::AppConfig;

pub(crate) async fn run(host: &str, port: u16) -> Result<()> {
    let config = AppConfig::from_env()?;

    let storage = Arc::new(PgStorage::new(&config.database_url).await?);
    let index = QdrantIndex::connect(config.qdrant.clone())?;
    index.ensure_ready().await?;
    tracing::info!(collection = %index.collection(), "Vector collection ready");
    let index = Arc::new(index);

    let embedder = Arc::new(
        OpenAiEmbeddings::new(config.openai_api_key.clone(), config.openai_base_url.clone())?
            .with_model(config.embed_model.clone()),
    );
    let llm = Arc::new(
        LlmClient::new(config.openai_api_key.clone(), config.openai_base_url.clone())?
            .with_model(config.chat_model.clone()),
    );
    let sessions = Arc::new(HttpSessionVerifier::new(&config.auth_base_url)?);
    tracing::info!(
        openai = %llm.base_url(),
        chat_model = %llm.model(),
        embed_model = %embedder.model(),
        auth = %sessions.endpoint(),
        "External services configured"
    );

    let memory = Arc::new(MemoryService::new(embedder, index));
    let state = Arc::new(AppState {
        chat: Arc::new(ChatService::new(storage.clone(), llm, memory.clone())),
        memory,
        companions: Arc::new(CompanionService::new(storage)),
        sessions,
    });

    if config.cors_origins.is_empty() {
        tracing::info!("No CORS origins configured, API is same-origin only");
    }
    let router = create_router(state, config.cors_origins);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Starting HTTP server on {}", addr);
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Failed to listen for ctrl-c: {e}");
            }
            tracing::info!("Shutting down HTTP server");
        })
        .await?;

    Ok(())
}
