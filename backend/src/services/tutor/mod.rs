//! Chinese tutor service
//!
//! Drives the model calls behind each endpoint:
//!
//! ```text
//! chat:   context ─► reply call ─► normalize ─┬─ structured ─► done
//!                                             └─ plain text ─► correction call ─► translation call
//! topic:  seeded draw ─► topic call ─► translation call   (fallback table on failure)
//! ```
//!
//! Every upstream failure is replaced by default content here, so handlers
//! never see transport errors from the model provider.

mod context;
mod normalizer;
mod prompts;
mod topics;

use std::sync::{Arc, Mutex, MutexGuard};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::TutorConfig;
use crate::models::{ChatResult, ConversationTurn, Correction, TopicSuggestion};
use crate::services::llm::{CompletionRequest, LLMClient, LLMError, LLMScenario};
use crate::utils::{ApiError, ApiResult};

pub use context::build_conversation_messages;
pub use normalizer::{
    FALLBACK_TRANSLATION, NormalizedReply, detect_latin_runs, fallback_reply, is_no_correction,
    normalize_reply, parse_grammar_correction, parse_interjection_help, parse_structured_reply,
};
pub use prompts::TUTOR_SYSTEM_PROMPT;
pub use topics::{FALLBACK_TOPICS, QUESTION_STYLES, TOPIC_CATEGORIES};

pub const UNAVAILABLE_REPLY: &str = "抱歉，我现在无法回应。请再试一次。";
pub const UNAVAILABLE_TRANSLATION: &str = "Sorry, I can't respond right now. Please try again.";
pub const TRANSLATION_UNAVAILABLE: &str = "Translation not available";

pub struct TutorService {
    client: Arc<dyn LLMClient>,
    history_window: usize,
    topic_rng: Mutex<StdRng>,
}

impl TutorService {
    pub fn new(client: Arc<dyn LLMClient>, config: &TutorConfig) -> Self {
        Self::with_rng(client, config, StdRng::from_entropy())
    }

    /// Build with an explicit random source for topic selection
    pub fn with_rng(client: Arc<dyn LLMClient>, config: &TutorConfig, rng: StdRng) -> Self {
        Self { client, history_window: config.history_window, topic_rng: Mutex::new(rng) }
    }

    /// Produce the tutor's reply to `message`
    ///
    /// Never fails: if the reply call itself fails the student gets a fixed
    /// apology instead.
    pub async fn reply(&self, message: &str, history: &[ConversationTurn]) -> ChatResult {
        match self.try_reply(message, history).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Conversation reply failed: {}", e);
                ChatResult {
                    response: UNAVAILABLE_REPLY.to_string(),
                    translation: UNAVAILABLE_TRANSLATION.to_string(),
                    correction: None,
                }
            },
        }
    }

    async fn try_reply(
        &self,
        message: &str,
        history: &[ConversationTurn],
    ) -> Result<ChatResult, LLMError> {
        let messages = build_conversation_messages(
            TUTOR_SYSTEM_PROMPT,
            history,
            message,
            self.history_window,
        );
        tracing::debug!(
            "Requesting reply with {} context messages (history: {} turns)",
            messages.len(),
            history.len()
        );

        let raw = self
            .client
            .complete(CompletionRequest::new(LLMScenario::Conversation, messages))
            .await?;

        let result = match normalize_reply(&raw) {
            NormalizedReply::Structured(result) => {
                tracing::debug!("Model returned a structured reply");
                result
            },
            // Plain text: the whole reply goes to the student, follow-up question included
            NormalizedReply::Fallback(_) => {
                let response = raw.trim().to_string();
                let correction = self.analyze_for_corrections(message).await;
                let translation = self.translate(&response).await;
                ChatResult { response, translation, correction }
            },
        };

        if let Some(correction) = &result.correction {
            tracing::info!("Attaching {} to reply", correction.kind());
        }
        Ok(result)
    }

    /// Look for English interjections first, otherwise ask for a grammar check
    pub async fn analyze_for_corrections(&self, message: &str) -> Option<Correction> {
        let english_words = detect_latin_runs(message);

        if !english_words.is_empty() {
            tracing::debug!("Detected English interjections: {:?}", english_words);
            let request = CompletionRequest::single(
                LLMScenario::InterjectionHelp,
                prompts::interjection_prompt(&english_words, message),
            );
            return match self.client.complete(request).await {
                Ok(raw) => Some(parse_interjection_help(&raw, &english_words)),
                Err(e) => {
                    tracing::warn!("Interjection help failed: {}", e);
                    Some(normalizer::interjection_fallback(&english_words))
                },
            };
        }

        let request = CompletionRequest::single(
            LLMScenario::GrammarCorrection,
            prompts::grammar_correction_prompt(message),
        );
        match self.client.complete(request).await {
            Ok(raw) => parse_grammar_correction(&raw),
            Err(e) => {
                tracing::warn!("Grammar correction failed: {}", e);
                None
            },
        }
    }

    /// Translate Chinese text to English, or a placeholder on any failure
    pub async fn translate(&self, chinese_text: &str) -> String {
        let request = CompletionRequest::single(
            LLMScenario::Translation,
            prompts::translation_prompt(chinese_text),
        );
        match self.client.complete(request).await {
            Ok(translation) => translation,
            Err(e) => {
                tracing::warn!("Translation failed: {}", e);
                TRANSLATION_UNAVAILABLE.to_string()
            },
        }
    }

    /// Generate a conversation starter with its translation
    ///
    /// Model failures fall back to the built-in topic table; only a poisoned
    /// random source is reported as an error.
    pub async fn random_topic(&self) -> ApiResult<TopicSuggestion> {
        let seed = {
            let mut rng = self.lock_rng()?;
            topics::pick_topic_seed(&mut *rng)
        };
        tracing::debug!("Topic seed: {} / {}", seed.style, seed.category);

        let request = CompletionRequest::single(
            LLMScenario::TopicSuggestion,
            prompts::topic_prompt(seed.style, seed.category, seed.starter_number),
        );

        match self.client.complete(request).await {
            Ok(topic) => {
                let translation = self.translate(&topic).await;
                Ok(TopicSuggestion { topic, translation })
            },
            Err(e) => {
                tracing::warn!("Topic generation failed, using fallback topic: {}", e);
                let mut rng = self.lock_rng()?;
                Ok(topics::pick_fallback_topic(&mut *rng))
            },
        }
    }

    fn lock_rng(&self) -> ApiResult<MutexGuard<'_, StdRng>> {
        self.topic_rng
            .lock()
            .map_err(|_| ApiError::internal_error("topic random source is poisoned"))
    }
}
