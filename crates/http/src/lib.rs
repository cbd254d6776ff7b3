//! HTTP API server for companion-chat.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]

pub mod api_error;
mod current_user;
mod handlers;
mod query_types;
mod response_types;

use std::sync::Arc;

use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use companion_chat_auth::SessionVerifier;
use companion_chat_service::{ChatService, CompanionService, MemoryService};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub use current_user::CurrentUser;
pub use response_types::VersionResponse;

/// Shared application state for all HTTP handlers.
///
/// Immutable after startup; every collaborator is behind an `Arc`.
pub struct AppState {
    pub chat: Arc<ChatService>,
    pub memory: Arc<MemoryService>,
    pub companions: Arc<CompanionService>,
    /// Resolves request headers to the calling user
    pub sessions: Arc<dyn SessionVerifier>,
}

/// Build the API router.
///
/// Sessions ride on cookies, so cross-origin callers need credentialed CORS,
/// which rules out a wildcard origin. With no `allowed_origins` the API is
/// same-origin only and no CORS headers are sent.
pub fn create_router(state: Arc<AppState>, allowed_origins: Vec<HeaderValue>) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/api/version", get(version))
        .route("/api/companions", get(handlers::companions::list_companions))
        .route("/api/chat/history", get(handlers::chat::history))
        .route("/api/chat/send", post(handlers::chat::send))
        .route("/api/memory/add", post(handlers::memory::add))
        .route("/api/memory/search", post(handlers::memory::search));

    let router = if allowed_origins.is_empty() {
        router
    } else {
        router.layer(cors_layer(allowed_origins))
    };
    router.layer(TraceLayer::new_for_http()).with_state(state)
}

fn cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn health() -> &'static str {
    "ok"
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION") })
}
