use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::Instrument;
use uuid::Uuid;

use crate::AppState;
use crate::models::{ChatErrorResponse, ChatRequest, ChatResult};
use crate::utils::{ApiError, ApiErrorResponse, ApiResult};

const CHAT_FAILURE_REPLY: &str = "抱歉，出现了错误。";
const CHAT_FAILURE_TRANSLATION: &str = "Sorry, an error occurred.";

/// Send a message to the tutor
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Tutor reply", body = ChatResult),
        (status = 400, description = "Message is missing or blank", body = ApiErrorResponse),
        (status = 500, description = "Request could not be processed", body = ChatErrorResponse),
    ),
    tag = "Chat"
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::error!("Chat endpoint error: {}", rejection.body_text());
            return Ok(chat_failure_response());
        },
    };

    let message = request.message.trim();
    if message.is_empty() {
        return Err(ApiError::validation_error("Message is required"));
    }

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("chat", %request_id);
    let result = async {
        tracing::info!(
            "Chat message received ({} chars, {} history turns)",
            message.chars().count(),
            request.conversation_history.len()
        );
        state.tutor.reply(message, &request.conversation_history).await
    }
    .instrument(span)
    .await;

    Ok(Json(result).into_response())
}

fn chat_failure_response() -> Response {
    let body = ChatErrorResponse {
        error: "An error occurred processing your message".to_string(),
        response: CHAT_FAILURE_REPLY.to_string(),
        translation: CHAT_FAILURE_TRANSLATION.to_string(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
