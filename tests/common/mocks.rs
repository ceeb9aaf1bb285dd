//! Mock implementations for testing.
//!
//! Scripted LLM clients, a deterministic embedder, and vector-store doubles
//! shared across the integration test files. No network calls anywhere.

use acharya::db::{InMemoryVectorStore, VectorStore};
use acharya::llm::{GenerationParams, LlmClient};
use acharya::rag::EmbeddingProvider;
use acharya::types::{AppError, ChatMessage, DocumentChunk, Result, ScoredChunk};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Mock LLM client that replays scripted responses in order and records
/// every request it receives.
///
/// When the script runs out, the last response is repeated.
pub struct MockLlmClient {
    responses: Mutex<VecDeque<String>>,
    last_response: Mutex<String>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
    should_fail: bool,
}

impl MockLlmClient {
    /// Create a client that always returns the given response.
    pub fn new(response: &str) -> Self {
        Self::with_responses(vec![response.to_string()])
    }

    /// Create a client that returns the given responses in order.
    pub fn with_responses(responses: Vec<String>) -> Self {
        let last = responses.last().cloned().unwrap_or_default();
        Self {
            responses: Mutex::new(responses.into()),
            last_response: Mutex::new(last),
            calls: Mutex::new(Vec::new()),
            should_fail: false,
        }
    }

    /// Create a client that always returns an error.
    pub fn failing() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            last_response: Mutex::new(String::new()),
            calls: Mutex::new(Vec::new()),
            should_fail: true,
        }
    }

    /// All requests received so far, in order.
    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().clone()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn chat(&self, messages: &[ChatMessage], _params: &GenerationParams) -> Result<String> {
        if self.should_fail {
            return Err(AppError::Llm("Mock LLM failure".to_string()));
        }

        self.calls.lock().push(messages.to_vec());

        match self.responses.lock().pop_front() {
            Some(response) => {
                *self.last_response.lock() = response.clone();
                Ok(response)
            }
            None => Ok(self.last_response.lock().clone()),
        }
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Embedder returning a fixed vector for every input.
pub struct StubEmbedder {
    vector: Vec<f32>,
    should_fail: bool,
}

impl StubEmbedder {
    /// Create an embedder that always returns `vector`.
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector,
            should_fail: false,
        }
    }

    /// Create an embedder that always returns an error.
    pub fn failing() -> Self {
        Self {
            vector: Vec::new(),
            should_fail: true,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        if self.should_fail {
            return Err(AppError::Embedding("Mock embedding failure".to_string()));
        }
        Ok(self.vector.clone())
    }

    fn model_name(&self) -> &str {
        "stub-embedder"
    }
}

/// Vector store wrapper that records every delete call it forwards.
pub struct RecordingVectorStore {
    inner: InMemoryVectorStore,
    delete_calls: Mutex<Vec<Vec<String>>>,
}

impl RecordingVectorStore {
    /// Wrap a fresh in-memory store.
    pub fn new() -> Self {
        Self {
            inner: InMemoryVectorStore::new(),
            delete_calls: Mutex::new(Vec::new()),
        }
    }

    /// The ID lists passed to `delete`, in call order.
    pub fn delete_calls(&self) -> Vec<Vec<String>> {
        self.delete_calls.lock().clone()
    }
}

#[async_trait]
impl VectorStore for RecordingVectorStore {
    fn provider_name(&self) -> &'static str {
        "recording"
    }

    async fn search(&self, embedding: &[f32], limit: usize) -> Result<Vec<ScoredChunk>> {
        self.inner.search(embedding, limit).await
    }

    async fn get_all(&self) -> Result<Vec<DocumentChunk>> {
        self.inner.get_all().await
    }

    async fn upsert(&self, chunks: &[DocumentChunk]) -> Result<usize> {
        self.inner.upsert(chunks).await
    }

    async fn delete(&self, ids: &[String]) -> Result<usize> {
        self.delete_calls.lock().push(ids.to_vec());
        self.inner.delete(ids).await
    }

    async fn count(&self) -> Result<usize> {
        self.inner.count().await
    }
}

/// Vector store whose every operation fails.
pub struct FailingVectorStore;

#[async_trait]
impl VectorStore for FailingVectorStore {
    fn provider_name(&self) -> &'static str {
        "failing"
    }

    async fn search(&self, _embedding: &[f32], _limit: usize) -> Result<Vec<ScoredChunk>> {
        Err(AppError::VectorStore("Mock store failure".to_string()))
    }

    async fn get_all(&self) -> Result<Vec<DocumentChunk>> {
        Err(AppError::VectorStore("Mock store failure".to_string()))
    }

    async fn upsert(&self, _chunks: &[DocumentChunk]) -> Result<usize> {
        Err(AppError::VectorStore("Mock store failure".to_string()))
    }

    async fn delete(&self, _ids: &[String]) -> Result<usize> {
        Err(AppError::VectorStore("Mock store failure".to_string()))
    }

    async fn count(&self) -> Result<usize> {
        Err(AppError::VectorStore("Mock store failure".to_string()))
    }
}

/// Build a chunk with an embedding, for seeding test stores.
pub fn chunk(id: &str, doc_id: &str, source: &str, text: &str, embedding: Vec<f32>) -> DocumentChunk {
    DocumentChunk {
        id: id.to_string(),
        text: text.to_string(),
        metadata: acharya::types::ChunkMetadata {
            doc_id: doc_id.to_string(),
            source: source.to_string(),
            chunk_index: None,
        },
        embedding: Some(embedding),
    }
}
