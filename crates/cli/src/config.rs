//! Process configuration read from the environment.

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use companion_chat_core::{
    DEFAULT_EMBEDDING_DIMENSION, env_optional, env_parse_with_default, env_string_or,
};
use companion_chat_embeddings::DEFAULT_EMBEDDING_MODEL;
use companion_chat_llm::DEFAULT_MODEL;
use companion_chat_vector::{DEFAULT_COLLECTION, QdrantConfig};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
const DEFAULT_AUTH_BASE_URL: &str = "http://localhost:3000";

/// Load `.env` if present. Real environment variables win.
pub(crate) fn load_dotenv() {
    // Logging is not initialized yet, so report on stderr.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load .env file: {e}");
        }
    }
}

pub(crate) fn database_url() -> Result<String> {
    env_optional("DATABASE_URL").context("DATABASE_URL environment variable must be set")
}

/// Everything `serve` needs.
#[derive(Debug, Clone)]
pub(crate) struct AppConfig {
    pub database_url: String,
    pub qdrant: QdrantConfig,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub chat_model: String,
    pub embed_model: String,
    pub auth_base_url: String,
    /// Browser origins allowed to call the API with credentials.
    pub cors_origins: Vec<HeaderValue>,
}

impl AppConfig {
    pub(crate) fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: database_url()?,
            qdrant: QdrantConfig {
                url: env_string_or("QDRANT_URL", DEFAULT_QDRANT_URL),
                api_key: env_optional("QDRANT_API_KEY"),
                collection: env_string_or("QDRANT_COLLECTION", DEFAULT_COLLECTION),
                dimension: env_parse_with_default(
                    "EMBEDDING_DIMENSION",
                    DEFAULT_EMBEDDING_DIMENSION,
                ),
            },
            openai_api_key: env_optional("OPENAI_API_KEY")
                .context("OPENAI_API_KEY environment variable must be set")?,
            openai_base_url: env_string_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            chat_model: env_string_or("OPENAI_CHAT_MODEL", DEFAULT_MODEL),
            embed_model: env_string_or("OPENAI_EMBED_MODEL", DEFAULT_EMBEDDING_MODEL),
            auth_base_url: env_string_or("AUTH_BASE_URL", DEFAULT_AUTH_BASE_URL),
            cors_origins: parse_origins(env_optional("CORS_ALLOWED_ORIGINS").as_deref())?,
        })
    }
}

/// Comma-separated origins, blanks skipped.
fn parse_origins(raw: Option<&str>) -> Result<Vec<HeaderValue>> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("CORS_ALLOWED_ORIGINS has an invalid origin: {origin}"))
        })
        .collect()
}
