//! Vector store clients.

/// Vector store trait, provider selection, and the in-memory backend.
pub mod vectorstore;

#[cfg(feature = "chromadb")]
pub mod chromadb;

pub use vectorstore::{InMemoryVectorStore, VectorStore, VectorStoreProvider};

#[cfg(feature = "chromadb")]
pub use chromadb::ChromaStore;
