//! Chinese conversation tutor backend
//!
//! An axum service that relays a student's Chinese messages to an Azure
//! OpenAI deployment and returns the tutor's reply, an English translation
//! and an optional correction.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::config::Config;
use crate::models::{
    ChatErrorResponse, ChatRequest, ChatResult, ConversationTurn, Correction, HealthStatus,
    TopicErrorResponse, TopicSuggestion,
};
use crate::services::TutorService;
use crate::utils::ApiErrorResponse;

/// Shared state handed to every handler
pub struct AppState {
    pub config: Config,
    pub tutor: Arc<TutorService>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::chat::chat,
        handlers::topic::random_topic,
        handlers::health::health,
    ),
    components(schemas(
        ChatRequest,
        ChatResult,
        ConversationTurn,
        Correction,
        ChatErrorResponse,
        TopicSuggestion,
        TopicErrorResponse,
        HealthStatus,
        ApiErrorResponse,
    )),
    tags(
        (name = "Chat", description = "Conversation with the tutor"),
        (name = "Topics", description = "Conversation starters"),
        (name = "Health", description = "Service status"),
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let static_config = state.config.static_config.clone();

    let mut app = Router::new()
        .route("/api/chat", post(handlers::chat::chat))
        .route("/api/random-topic", get(handlers::topic::random_topic))
        .route("/api/health", get(handlers::health::health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(state);

    if static_config.enabled {
        let web_root = Path::new(&static_config.web_root);
        if web_root.is_dir() {
            tracing::info!("Serving static files from {}", web_root.display());
            let index = ServeFile::new(web_root.join("index.html"));
            app = app.fallback_service(ServeDir::new(web_root).not_found_service(index));
        } else {
            tracing::warn!(
                "Static web root {} does not exist, serving API only",
                web_root.display()
            );
        }
    }

    app.layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive())
}
