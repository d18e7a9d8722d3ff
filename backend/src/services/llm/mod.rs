//! LLM Service Module
//!
//! Thin access layer to the chat completion provider used by the tutor.
//!
//! # Architecture
//! ```text
//! ┌─────────────────┐
//! │    LLMClient    │  ← Trait (generic interface)
//! └────────┬────────┘
//!          │
//!    ┌─────┴──────┐
//!    ▼            ▼
//! ┌────────┐  ┌──────────┐
//! │ Azure  │  │ Scripted │
//! │ OpenAI │  │ (tests)  │
//! └────────┘  └──────────┘
//! ```

mod client;
mod models;

pub use client::{AzureOpenAIClient, LLMClient};
pub use models::*;
