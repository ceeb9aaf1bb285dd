//! LLM client abstraction and provider selection.

use crate::types::{AppError, ChatMessage, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Sampling and length parameters for a generation request.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerationParams {
    /// Sampling temperature; provider default when `None`.
    pub temperature: Option<f32>,
    /// Completion token cap; provider default when `None`.
    pub max_tokens: Option<u32>,
}

/// Generic LLM client trait for provider abstraction.
///
/// The core shape is [`chat`](LlmClient::chat): an ordered list of role-tagged
/// messages plus generation parameters, returning the text completion. The
/// convenience methods are defined in terms of it.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a completion from an ordered list of messages.
    async fn chat(&self, messages: &[ChatMessage], params: &GenerationParams) -> Result<String>;

    /// Generate a completion from a bare prompt.
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.chat(&[ChatMessage::user(prompt)], &GenerationParams::default())
            .await
    }

    /// Generate with a system instruction ahead of the prompt.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.chat(
            &[ChatMessage::system(system), ChatMessage::user(prompt)],
            &GenerationParams::default(),
        )
        .await
    }

    /// Get the model name/identifier.
    fn model_name(&self) -> &str;
}

/// Base URL of Groq's OpenAI-compatible endpoint.
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// LLM provider configuration for runtime selection.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    /// Groq hosted inference, reached over its OpenAI-compatible API.
    Groq {
        /// Groq API key.
        api_key: String,
        /// Model identifier (e.g. `openai/gpt-oss-120b`).
        model: String,
    },

    /// OpenAI API or any compatible endpoint.
    OpenAi {
        /// API key.
        api_key: String,
        /// Base URL of the endpoint.
        api_base: String,
        /// Model identifier.
        model: String,
    },
}

impl LlmProvider {
    /// Create a client instance for this provider.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] when the `openai` feature is
    /// disabled, since no other client backend exists.
    pub fn create_client(&self) -> Result<Arc<dyn LlmClient>> {
        #[cfg(feature = "openai")]
        {
            let client = match self {
                LlmProvider::Groq { api_key, model } => super::openai::OpenAiClient::new(
                    api_key.clone(),
                    GROQ_API_BASE.to_string(),
                    model.clone(),
                ),
                LlmProvider::OpenAi {
                    api_key,
                    api_base,
                    model,
                } => super::openai::OpenAiClient::new(
                    api_key.clone(),
                    api_base.clone(),
                    model.clone(),
                ),
            };
            Ok(Arc::new(client))
        }

        #[cfg(not(feature = "openai"))]
        {
            Err(AppError::Configuration(
                "No LLM backend enabled. Build with the 'openai' feature.".into(),
            ))
        }
    }

    /// Create a provider from environment variables.
    ///
    /// Checks `GROQ_API_KEY` first (the portal's deployment), then
    /// `OPENAI_API_KEY`. A missing credential is a fatal configuration fault.
    pub fn from_env() -> Result<Self> {
        if let Ok(api_key) = std::env::var("GROQ_API_KEY") {
            if !api_key.is_empty() {
                return Ok(LlmProvider::Groq {
                    api_key,
                    model: std::env::var("LLM_MODEL")
                        .unwrap_or_else(|_| "openai/gpt-oss-120b".to_string()),
                });
            }
        }

        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            if !api_key.is_empty() {
                return Ok(LlmProvider::OpenAi {
                    api_key,
                    api_base: std::env::var("OPENAI_API_BASE")
                        .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
                    model: std::env::var("LLM_MODEL")
                        .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
                });
            }
        }

        Err(AppError::Configuration(
            "GROQ_API_KEY not found in environment".into(),
        ))
    }

    /// Get a human-readable name for this provider.
    pub fn name(&self) -> &'static str {
        match self {
            LlmProvider::Groq { .. } => "Groq",
            LlmProvider::OpenAi { .. } => "OpenAI",
        }
    }

    /// The model this provider is configured for.
    pub fn model(&self) -> &str {
        match self {
            LlmProvider::Groq { model, .. } => model,
            LlmProvider::OpenAi { model, .. } => model,
        }
    }
}
