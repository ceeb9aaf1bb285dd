//! Retrieval Augmented Generation pipeline.
//!
//! The flow per query:
//!
//! 1. **Reformulation** - the query is rewritten into a standalone question
//!    when chat history exists
//! 2. **Retrieval** - the reformulated query is embedded and similar chunks
//!    fetched from the vector store
//! 3. **Synthesis** - the LLM answers from the retrieved context, the recent
//!    history, and the original input
//!
//! Ingestion (chunking and embedding uploads) happens in a separate pipeline
//! that writes to the same vector store; this module only reads and deletes.

/// Embedding provider trait and the fastembed adapter.
pub mod embeddings;
/// The conversational RAG engine.
pub mod engine;

pub use embeddings::EmbeddingProvider;
pub use engine::{RagEngine, DEFAULT_RETRIEVAL_LIMIT, MAX_CONTEXT_CHUNKS};

#[cfg(feature = "local-embeddings")]
pub use embeddings::FastembedProvider;
