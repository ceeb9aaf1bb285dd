//! # Acharya - Course-Grounded Chat and Question Generation
//!
//! The AI core of a college portal: students chat with an assistant grounded
//! in faculty-uploaded course material, and faculty auto-generate
//! assignments, MCQs, and viva questions from that material.
//!
//! This is a library crate consumed by a UI layer; it defines no server or
//! wire protocol of its own. The heavy lifting is delegated to three
//! external systems reached through narrow trait seams: a hosted LLM
//! ([`llm::LlmClient`]), an embedding model ([`rag::EmbeddingProvider`]), and
//! a vector database ([`db::VectorStore`]).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use acharya::{LlmProvider, QuestionGenerator, RagEngine};
//! use acharya::db::VectorStoreProvider;
//! use acharya::rag::FastembedProvider;
//! use acharya::types::Difficulty;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Fails fast if GROQ_API_KEY is absent.
//!     let llm = LlmProvider::from_env()?.create_client()?;
//!     let embedder = Arc::new(FastembedProvider::new(
//!         "sentence-transformers/all-MiniLM-L6-v2",
//!         true,
//!     )?);
//!     let store: Arc<_> = VectorStoreProvider::from_env().create_store().await?.into();
//!
//!     let engine = RagEngine::new(llm.clone(), embedder, store);
//!     let reply = engine.answer_query("What is normalization?", "session-1").await?;
//!     println!("{} (sources: {:?})", reply.answer, reply.sources);
//!
//!     let generator = QuestionGenerator::new(llm);
//!     let context = engine.get_documents_context(&["doc-1".into()]).await?;
//!     let mcqs = generator.generate_mcqs(&context, 10, Difficulty::Medium).await?;
//!     println!("{} MCQs generated", mcqs.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `openai` | OpenAI-compatible LLM client, used for Groq (default) |
//! | `chromadb` | ChromaDB vector store backend |
//! | `local-embeddings` | fastembed ONNX embedding models |
//!
//! ## Modules
//!
//! - [`rag`] - Conversational RAG engine and embedding providers
//! - [`questions`] - Assignment/MCQ/viva question generation
//! - [`memory`] - Session-scoped chat histories
//! - [`db`] - Vector store clients
//! - [`llm`] - LLM client implementations
//! - [`types`] - Common types and error handling

#![warn(missing_docs)]

/// Environment-driven configuration.
pub mod config;
/// Vector store clients (in-memory, ChromaDB).
pub mod db;
/// LLM provider clients and abstractions.
pub mod llm;
/// Session-scoped chat memory.
pub mod memory;
/// Faculty question generation.
pub mod questions;
/// Retrieval Augmented Generation components.
pub mod rag;
/// Core types (chunks, turns, questions, errors).
pub mod types;

// Re-export commonly used types
pub use config::PortalConfig;
pub use llm::{LlmClient, LlmProvider};
pub use memory::SessionStore;
pub use questions::QuestionGenerator;
pub use rag::RagEngine;
pub use types::{AppError, RagAnswer, Result};
