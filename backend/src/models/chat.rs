use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Who authored a conversation turn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
    /// Missing, or neither `user` nor `ai`
    #[default]
    #[serde(other)]
    Other,
}

/// Incomplete turns still deserialize; the context builder skips them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConversationTurn {
    /// `user` or `ai`
    #[serde(default)]
    #[schema(value_type = String)]
    pub sender: Sender,
    #[serde(default)]
    pub message: String,
}

impl ConversationTurn {
    pub fn user(message: impl Into<String>) -> Self {
        Self { sender: Sender::User, message: message.into() }
    }

    pub fn ai(message: impl Into<String>) -> Self {
        Self { sender: Sender::Ai, message: message.into() }
    }
}

/// Feedback on the student's sentence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Correction {
    GrammarCorrection {
        original: String,
        corrected: String,
        explanation: String,
    },
    /// The student mixed English words into a Chinese sentence
    InterjectionHelp {
        english_words: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        translations: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        suggested_sentence: Option<String>,
        explanation: String,
    },
}

impl Correction {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GrammarCorrection { .. } => "grammar_correction",
            Self::InterjectionHelp { .. } => "interjection_help",
        }
    }
}

/// Tutor reply returned by `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatResult {
    /// Reply in Chinese
    pub response: String,
    /// English rendering of the reply
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction: Option<Correction>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
}

/// Body returned when a chat request cannot be processed at all
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatErrorResponse {
    pub error: String,
    pub response: String,
    pub translation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TopicSuggestion {
    pub topic: String,
    pub translation: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TopicErrorResponse {
    pub error: String,
    pub topic: String,
    pub translation: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    /// RFC 3339 timestamp of the check
    pub timestamp: String,
}
