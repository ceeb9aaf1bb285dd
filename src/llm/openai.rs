//! OpenAI-compatible chat completion client.
//!
//! Used for both OpenAI and Groq; Groq serves the same chat-completions
//! protocol at its own base URL.

use crate::llm::client::{GenerationParams, LlmClient};
use crate::types::{AppError, ChatMessage, Result, TurnRole};
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestAssistantMessage, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;

/// Chat-completions client over an OpenAI-compatible endpoint.
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiClient {
    /// Create a client against the given endpoint and model.
    pub fn new(api_key: String, api_base: String, model: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);

        Self {
            client: Client::with_config(config),
            model,
        }
    }
}

fn to_request_message(message: &ChatMessage) -> ChatCompletionRequestMessage {
    match message.role {
        TurnRole::System => ChatCompletionRequestMessage::System(
            ChatCompletionRequestSystemMessage::from(message.content.clone()),
        ),
        TurnRole::User => ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage::from(message.content.clone()),
        ),
        TurnRole::Assistant => ChatCompletionRequestMessage::Assistant(
            ChatCompletionRequestAssistantMessage::from(message.content.clone()),
        ),
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn chat(&self, messages: &[ChatMessage], params: &GenerationParams) -> Result<String> {
        let chat_messages: Vec<ChatCompletionRequestMessage> =
            messages.iter().map(to_request_message).collect();

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&self.model).messages(chat_messages);
        if let Some(temperature) = params.temperature {
            builder.temperature(temperature);
        }
        if let Some(max_tokens) = params.max_tokens {
            builder.max_tokens(max_tokens);
        }
        let request = builder
            .build()
            .map_err(|e| AppError::Llm(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AppError::Llm(format!("Chat completion error: {}", e)))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| AppError::Llm("No response from provider".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
