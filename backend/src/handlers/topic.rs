use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::AppState;
use crate::models::{TopicErrorResponse, TopicSuggestion};

/// Get a random conversation starter
#[utoipa::path(
    get,
    path = "/api/random-topic",
    responses(
        (status = 200, description = "Conversation starter", body = TopicSuggestion),
        (status = 500, description = "Fallback starter after an internal failure", body = TopicErrorResponse),
    ),
    tag = "Topics"
)]
pub async fn random_topic(State(state): State<Arc<AppState>>) -> Response {
    match state.tutor.random_topic().await {
        Ok(topic) => {
            tracing::debug!("Suggested topic: {}", topic.topic);
            Json(topic).into_response()
        },
        Err(e) => {
            tracing::error!("Random topic endpoint error: {}", e);
            let body = TopicErrorResponse {
                error: "An error occurred getting a random topic".to_string(),
                topic: "我们聊聊今天的天气吧？".to_string(),
                translation: "How about we talk about today's weather?".to_string(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        },
    }
}
