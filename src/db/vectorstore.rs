//! Vector store abstraction.
//!
//! A store holds the chunks of faculty-uploaded course material for exactly
//! one collection; the portal has a single logical collection, so stores are
//! bound to theirs at construction. Backends implement [`VectorStore`];
//! [`InMemoryVectorStore`] is always available for tests and local runs,
//! Chroma lives behind the `chromadb` feature.

use crate::types::{AppError, DocumentChunk, Result, ScoredChunk};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

// ============================================================================
// Vector Store Provider Configuration
// ============================================================================

/// Configuration for vector store providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum VectorStoreProvider {
    /// ChromaDB server, where the ingestion pipeline persists chunks.
    #[cfg(feature = "chromadb")]
    ChromaDb {
        /// Chroma server URL (e.g. "http://localhost:8000").
        url: String,
        /// Collection name.
        collection: String,
    },

    /// In-memory store. Data is lost when the process exits.
    InMemory,
}

impl VectorStoreProvider {
    /// Create a vector store instance from this provider configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend connection fails.
    pub async fn create_store(&self) -> Result<Box<dyn VectorStore>> {
        match self {
            #[cfg(feature = "chromadb")]
            VectorStoreProvider::ChromaDb { url, collection } => {
                let store = super::chromadb::ChromaStore::connect(url, collection).await?;
                Ok(Box::new(store))
            }

            VectorStoreProvider::InMemory => Ok(Box::new(InMemoryVectorStore::new())),
        }
    }

    /// Create a provider from environment variables.
    ///
    /// `CHROMA_URL` selects the Chroma backend (collection from
    /// `CHROMA_COLLECTION`, default `faculty_documents`); otherwise falls back
    /// to the in-memory store.
    pub fn from_env() -> Self {
        #[cfg(feature = "chromadb")]
        if let Ok(url) = std::env::var("CHROMA_URL") {
            let collection = std::env::var("CHROMA_COLLECTION")
                .unwrap_or_else(|_| "faculty_documents".to_string());
            return VectorStoreProvider::ChromaDb { url, collection };
        }

        VectorStoreProvider::InMemory
    }
}

// ============================================================================
// Vector Store Trait
// ============================================================================

/// Abstract trait for vector store operations over the portal's collection.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Get the name of this vector store backend.
    fn provider_name(&self) -> &'static str;

    /// Search for the `limit` chunks most similar to the query embedding,
    /// sorted by similarity score descending.
    async fn search(&self, embedding: &[f32], limit: usize) -> Result<Vec<ScoredChunk>>;

    /// Fetch every chunk in the collection, in stable store order.
    async fn get_all(&self) -> Result<Vec<DocumentChunk>>;

    /// Fetch chunks whose `doc_id` metadata is in `doc_ids`, in stable store
    /// order.
    ///
    /// # Default Implementation
    ///
    /// Full scan and filter — O(total chunks) per call. Backends with
    /// metadata-filtered queries should override this.
    async fn get_by_doc_ids(&self, doc_ids: &[String]) -> Result<Vec<DocumentChunk>> {
        let all = self.get_all().await?;
        Ok(all
            .into_iter()
            .filter(|chunk| doc_ids.contains(&chunk.metadata.doc_id))
            .collect())
    }

    /// Upsert chunks by ID. Used by the ingestion pipeline and tests; the
    /// engine itself never writes.
    async fn upsert(&self, chunks: &[DocumentChunk]) -> Result<usize>;

    /// Delete chunks by their IDs. Returns the number actually deleted.
    async fn delete(&self, ids: &[String]) -> Result<usize>;

    /// Count chunks in the collection.
    async fn count(&self) -> Result<usize>;
}

// ============================================================================
// In-Memory Vector Store
// ============================================================================

/// In-memory vector store using cosine similarity.
///
/// Chunks are kept in insertion order so "first N matching" reads are
/// deterministic, matching the stable get order of the Chroma backend.
pub struct InMemoryVectorStore {
    chunks: RwLock<Vec<DocumentChunk>>,
}

impl InMemoryVectorStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            chunks: RwLock::new(Vec::new()),
        }
    }

    /// Calculate cosine similarity between two vectors.
    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    fn provider_name(&self) -> &'static str {
        "in-memory"
    }

    async fn search(&self, embedding: &[f32], limit: usize) -> Result<Vec<ScoredChunk>> {
        let chunks = self.chunks.read();

        let mut results: Vec<ScoredChunk> = chunks
            .iter()
            .filter_map(|chunk| {
                let chunk_embedding = chunk.embedding.as_ref()?;
                let score = Self::cosine_similarity(embedding, chunk_embedding);
                Some(ScoredChunk {
                    chunk: DocumentChunk {
                        id: chunk.id.clone(),
                        text: chunk.text.clone(),
                        metadata: chunk.metadata.clone(),
                        embedding: None, // embeddings are not returned in results
                    },
                    score,
                })
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);

        Ok(results)
    }

    async fn get_all(&self) -> Result<Vec<DocumentChunk>> {
        Ok(self.chunks.read().clone())
    }

    async fn upsert(&self, new_chunks: &[DocumentChunk]) -> Result<usize> {
        let mut chunks = self.chunks.write();

        for chunk in new_chunks {
            if chunk.id.is_empty() {
                return Err(AppError::InvalidInput("Chunk is missing an id".into()));
            }
            match chunks.iter_mut().find(|c| c.id == chunk.id) {
                Some(existing) => *existing = chunk.clone(),
                None => chunks.push(chunk.clone()),
            }
        }

        Ok(new_chunks.len())
    }

    async fn delete(&self, ids: &[String]) -> Result<usize> {
        let mut chunks = self.chunks.write();
        let before = chunks.len();
        chunks.retain(|chunk| !ids.contains(&chunk.id));
        Ok(before - chunks.len())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.chunks.read().len())
    }
}

// ============================================================================
// Tests
// ============================================================================
