//! LLM request/response types shared by the client and the tutor service

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One role-tagged entry of a chat completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }
}

// ============================================================================
// Scenarios
// ============================================================================

/// The kinds of model call the tutor makes
///
/// Each scenario carries its own sampling parameters; the conversation reply
/// runs warmer than the analysis calls, and topic generation is the most
/// creative of all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LLMScenario {
    Conversation,
    InterjectionHelp,
    GrammarCorrection,
    Translation,
    TopicSuggestion,
}

impl LLMScenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conversation => "conversation",
            Self::InterjectionHelp => "interjection_help",
            Self::GrammarCorrection => "grammar_correction",
            Self::Translation => "translation",
            Self::TopicSuggestion => "topic_suggestion",
        }
    }

    pub fn temperature(&self) -> f32 {
        match self {
            Self::Conversation => 0.8,
            Self::TopicSuggestion => 1.0,
            Self::InterjectionHelp | Self::GrammarCorrection | Self::Translation => 0.3,
        }
    }

    pub fn max_tokens(&self) -> u32 {
        match self {
            Self::Conversation => 800,
            Self::InterjectionHelp => 400,
            Self::GrammarCorrection => 300,
            Self::Translation => 200,
            Self::TopicSuggestion => 100,
        }
    }
}

/// A single chat completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub scenario: LLMScenario,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Build a request with the scenario's sampling parameters
    pub fn new(scenario: LLMScenario, messages: Vec<ChatMessage>) -> Self {
        Self {
            scenario,
            messages,
            temperature: scenario.temperature(),
            max_tokens: scenario.max_tokens(),
        }
    }

    /// Single user-message request, used by the analysis prompts
    pub fn single(scenario: LLMScenario, prompt: impl Into<String>) -> Self {
        Self::new(scenario, vec![ChatMessage::user(prompt)])
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum LLMError {
    #[error("LLM authentication failed: {0}")]
    Unauthorized(String),

    #[error("LLM rate limited: {0}")]
    RateLimited(String),

    #[error("LLM request timeout: {0}")]
    Timeout(String),

    #[error("LLM API error: {0}")]
    ApiError(String),

    #[error("LLM returned an empty response")]
    EmptyResponse,

    #[error("Failed to parse LLM response: {0}")]
    ParseError(String),
}

impl From<reqwest::Error> for LLMError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LLMError::Timeout(err.to_string())
        } else if err.is_decode() {
            LLMError::ParseError(err.to_string())
        } else {
            LLMError::ApiError(err.to_string())
        }
    }
}
