pub mod llm;
pub mod tutor;

pub use llm::{AzureOpenAIClient, LLMClient};
pub use tutor::TutorService;
