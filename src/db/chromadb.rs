//! ChromaDB vector store backend.
//!
//! The portal's ingestion pipeline persists course-material chunks in a
//! Chroma collection; this adapter gives the engine read/delete access to it.
//! Chunk metadata is stored as Chroma metadata (`doc_id`, `source`,
//! `chunk_index`), so `get_by_doc_ids` can push the filter down to the server
//! instead of scanning the collection.
//!
//! Enable with `--features chromadb`. Requires a running Chroma server.

use crate::db::vectorstore::VectorStore;
use crate::types::{AppError, ChunkMetadata, DocumentChunk, Result, ScoredChunk};
use async_trait::async_trait;
use chromadb::client::{ChromaClient, ChromaClientOptions};
use chromadb::collection::{ChromaCollection, CollectionEntries, GetOptions, QueryOptions};
use serde_json::{json, Map, Value};

/// Vector store backed by a ChromaDB collection.
pub struct ChromaStore {
    collection: ChromaCollection,
}

impl ChromaStore {
    /// Connect to a Chroma server and open (or create) the collection.
    pub async fn connect(url: &str, collection: &str) -> Result<Self> {
        let client = ChromaClient::new(ChromaClientOptions {
            url: Some(url.to_string()),
            ..Default::default()
        })
        .await
        .map_err(|e| AppError::VectorStore(format!("Failed to connect to Chroma: {}", e)))?;

        let collection = client
            .get_or_create_collection(collection, None)
            .await
            .map_err(|e| AppError::VectorStore(format!("Failed to open collection: {}", e)))?;

        Ok(Self { collection })
    }

    fn metadata_to_map(metadata: &ChunkMetadata) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("doc_id".into(), Value::String(metadata.doc_id.clone()));
        map.insert("source".into(), Value::String(metadata.source.clone()));
        if let Some(index) = metadata.chunk_index {
            map.insert("chunk_index".into(), json!(index));
        }
        map
    }

    fn metadata_from_map(map: Option<&Map<String, Value>>) -> ChunkMetadata {
        let get_str = |key: &str| {
            map.and_then(|m| m.get(key))
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string()
        };
        ChunkMetadata {
            doc_id: get_str("doc_id"),
            source: get_str("source"),
            chunk_index: map
                .and_then(|m| m.get("chunk_index"))
                .and_then(Value::as_u64)
                .map(|v| v as usize),
        }
    }

    async fn get_with_filter(&self, where_metadata: Option<Value>) -> Result<Vec<DocumentChunk>> {
        let result = self
            .collection
            .get(GetOptions {
                ids: vec![],
                where_metadata,
                limit: None,
                offset: None,
                where_document: None,
                include: Some(vec!["metadatas".into(), "documents".into()]),
            })
            .await
            .map_err(|e| AppError::VectorStore(format!("Chroma get failed: {}", e)))?;

        let documents = result.documents.unwrap_or_default();
        let metadatas = result.metadatas.unwrap_or_default();

        Ok(result
            .ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| DocumentChunk {
                id,
                text: documents
                    .get(i)
                    .and_then(|d| d.clone())
                    .unwrap_or_default(),
                metadata: Self::metadata_from_map(
                    metadatas.get(i).and_then(|m| m.as_ref()),
                ),
                embedding: None,
            })
            .collect())
    }
}

#[async_trait]
impl VectorStore for ChromaStore {
    fn provider_name(&self) -> &'static str {
        "chromadb"
    }

    async fn search(&self, embedding: &[f32], limit: usize) -> Result<Vec<ScoredChunk>> {
        let result = self
            .collection
            .query(
                QueryOptions {
                    query_embeddings: Some(vec![embedding.to_vec()]),
                    query_texts: None,
                    n_results: Some(limit),
                    where_metadata: None,
                    where_document: None,
                    include: Some(vec!["metadatas", "documents", "distances"]),
                },
                None,
            )
            .await
            .map_err(|e| AppError::VectorStore(format!("Chroma query failed: {}", e)))?;

        let ids = result.ids.into_iter().next().unwrap_or_default();
        let documents = result
            .documents
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default();
        let metadatas = result
            .metadatas
            .and_then(|m| m.into_iter().next())
            .unwrap_or_default();
        let distances = result
            .distances
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default();

        Ok(ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| ScoredChunk {
                chunk: DocumentChunk {
                    id,
                    text: documents.get(i).cloned().unwrap_or_default(),
                    metadata: Self::metadata_from_map(
                        metadatas.get(i).and_then(|m| m.as_ref()),
                    ),
                    embedding: None,
                },
                // Chroma reports cosine distance; convert to similarity.
                score: 1.0 - distances.get(i).copied().unwrap_or(0.0),
            })
            .collect())
    }

    async fn get_all(&self) -> Result<Vec<DocumentChunk>> {
        self.get_with_filter(None).await
    }

    async fn get_by_doc_ids(&self, doc_ids: &[String]) -> Result<Vec<DocumentChunk>> {
        // Metadata filter pushed down to the server, no full scan.
        let filter = json!({ "doc_id": { "$in": doc_ids } });
        self.get_with_filter(Some(filter)).await
    }

    async fn upsert(&self, chunks: &[DocumentChunk]) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        for chunk in chunks {
            if chunk.embedding.is_none() {
                return Err(AppError::InvalidInput(format!(
                    "Chunk '{}' is missing an embedding",
                    chunk.id
                )));
            }
        }

        let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        let documents: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings: Vec<Vec<f32>> = chunks
            .iter()
            .filter_map(|c| c.embedding.clone())
            .collect();
        let metadatas: Vec<Map<String, Value>> = chunks
            .iter()
            .map(|c| Self::metadata_to_map(&c.metadata))
            .collect();

        self.collection
            .upsert(
                CollectionEntries {
                    ids,
                    embeddings: Some(embeddings),
                    metadatas: Some(metadatas),
                    documents: Some(documents),
                },
                None,
            )
            .await
            .map_err(|e| AppError::VectorStore(format!("Chroma upsert failed: {}", e)))?;

        Ok(chunks.len())
    }

    async fn delete(&self, ids: &[String]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        self.collection
            .delete(Some(id_refs), None, None)
            .await
            .map_err(|e| AppError::VectorStore(format!("Chroma delete failed: {}", e)))?;

        Ok(ids.len())
    }

    async fn count(&self) -> Result<usize> {
        self.collection
            .count()
            .await
            .map_err(|e| AppError::VectorStore(format!("Chroma count failed: {}", e)))
    }
}
