// Common test utilities and helpers

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::AppState;
use crate::config::{Config, TutorConfig};
use crate::services::llm::{CompletionRequest, LLMClient, LLMError, LLMScenario};
use crate::services::tutor::TutorService;

/// Fake model provider that replays queued outputs in order
///
/// Every request is recorded so tests can assert which calls were made.
/// Running out of scripted outputs is reported as an API error.
#[derive(Default)]
pub struct ScriptedLLMClient {
    outputs: Mutex<VecDeque<Result<String, LLMError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedLLMClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.outputs.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, error: LLMError) -> Self {
        self.outputs.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn scenarios(&self) -> Vec<LLMScenario> {
        self.requests().iter().map(|r| r.scenario).collect()
    }
}

#[async_trait]
impl LLMClient for ScriptedLLMClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LLMError> {
        self.requests.lock().unwrap().push(request);
        self.outputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LLMError::ApiError("no scripted output left".to_string())))
    }
}

/// Tutor over the given fake client with a fixed topic seed
pub fn create_test_tutor(client: Arc<ScriptedLLMClient>) -> TutorService {
    create_test_tutor_with_window(client, TutorConfig::default().history_window)
}

pub fn create_test_tutor_with_window(client: Arc<ScriptedLLMClient>, window: usize) -> TutorService {
    let config = TutorConfig { history_window: window };
    TutorService::with_rng(client, &config, StdRng::seed_from_u64(42))
}

pub fn create_test_state(client: Arc<ScriptedLLMClient>) -> Arc<AppState> {
    let mut config = Config::default();
    config.static_config.enabled = false;
    Arc::new(AppState { config, tutor: Arc::new(create_test_tutor(client)) })
}
