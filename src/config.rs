//! Environment-driven configuration.
//!
//! Read once at process start. All values except the LLM API key have
//! defaults matching the portal's original deployment.

use crate::types::{AppError, Result};
use serde::Deserialize;
use std::env;

/// Top-level configuration for the portal core.
#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    /// LLM provider settings.
    pub llm: LlmConfig,
    /// Embedding model settings.
    pub embedding: EmbeddingConfig,
    /// Vector store connection settings.
    pub vector: VectorStoreConfig,
    /// RAG engine tuning.
    pub rag: RagConfig,
    /// Settings consumed by the external ingestion pipeline.
    pub ingest: IngestConfig,
}

/// LLM provider settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Groq API key. Required; absence is a fatal configuration fault.
    pub groq_api_key: String,
    /// Model identifier passed to the provider.
    pub model: String,
}

/// Embedding model settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding model identifier.
    pub model: String,
    /// Whether output vectors are L2-normalized.
    pub normalize: bool,
}

/// Vector store connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorStoreConfig {
    /// Chroma server URL.
    pub url: String,
    /// Collection holding faculty-uploaded course material.
    pub collection: String,
}

/// RAG engine tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct RagConfig {
    /// Number of chunks fetched per similarity search.
    pub retrieval_limit: usize,
    /// Maximum chat turns replayed into prompts.
    pub history_window: usize,
}

/// Settings consumed by the external ingestion pipeline; kept on the shared
/// config surface so both sides read one source of truth.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Characters per chunk.
    pub chunk_size: usize,
    /// Overlap between consecutive chunks, in characters.
    pub chunk_overlap: usize,
    /// Maximum accepted upload size in megabytes.
    pub max_upload_size_mb: usize,
}

impl PortalConfig {
    /// Load configuration from the environment, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] if `GROQ_API_KEY` is absent or a
    /// numeric variable fails to parse.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let groq_api_key = env::var("GROQ_API_KEY")
            .map_err(|_| AppError::Configuration("GROQ_API_KEY not found in environment".into()))?;

        Ok(PortalConfig {
            llm: LlmConfig {
                groq_api_key,
                model: env::var("LLM_MODEL").unwrap_or_else(|_| "openai/gpt-oss-120b".to_string()),
            },
            embedding: EmbeddingConfig {
                model: env::var("EMBEDDING_MODEL")
                    .unwrap_or_else(|_| "sentence-transformers/all-MiniLM-L6-v2".to_string()),
                normalize: parse_var("EMBEDDING_NORMALIZE", true)?,
            },
            vector: VectorStoreConfig {
                url: env::var("CHROMA_URL")
                    .unwrap_or_else(|_| "http://localhost:8000".to_string()),
                collection: env::var("CHROMA_COLLECTION")
                    .unwrap_or_else(|_| "faculty_documents".to_string()),
            },
            rag: RagConfig {
                retrieval_limit: parse_var("RETRIEVAL_LIMIT", 4)?,
                history_window: parse_var("HISTORY_WINDOW", 10)?,
            },
            ingest: IngestConfig {
                chunk_size: parse_var("CHUNK_SIZE", 1000)?,
                chunk_overlap: parse_var("CHUNK_OVERLAP", 200)?,
                max_upload_size_mb: parse_var("MAX_UPLOAD_SIZE_MB", 50)?,
            },
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| AppError::Configuration(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}
