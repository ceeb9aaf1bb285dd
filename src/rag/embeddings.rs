//! Embedding providers.
//!
//! The engine only needs "text in, fixed-dimension vector out"; the trait
//! keeps the model behind a seam so tests can supply deterministic vectors.

use crate::types::Result;
use async_trait::async_trait;

/// Maps text to a fixed-dimension embedding vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single piece of text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Identifier of the underlying model.
    fn model_name(&self) -> &str;
}

/// L2-normalize a vector in place. No-op for the zero vector.
pub(crate) fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

#[cfg(feature = "local-embeddings")]
pub use fastembed_provider::FastembedProvider;

#[cfg(feature = "local-embeddings")]
mod fastembed_provider {
    use super::{l2_normalize, EmbeddingProvider};
    use crate::types::{AppError, Result};
    use async_trait::async_trait;
    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
    use parking_lot::Mutex;

    /// Local ONNX embedding model via fastembed.
    ///
    /// The model's `embed` takes `&mut self`, hence the mutex; calls are
    /// short and the engine issues one embedding per query.
    pub struct FastembedProvider {
        model: Mutex<TextEmbedding>,
        model_name: String,
        normalize: bool,
    }

    impl FastembedProvider {
        /// Load an embedding model by its published identifier.
        ///
        /// # Errors
        ///
        /// Returns [`AppError::Configuration`] for unknown model names and
        /// [`AppError::Embedding`] when model initialization fails.
        pub fn new(model_name: &str, normalize: bool) -> Result<Self> {
            let model_type = match model_name {
                "sentence-transformers/all-MiniLM-L6-v2" => EmbeddingModel::AllMiniLML6V2,
                "BAAI/bge-small-en-v1.5" => EmbeddingModel::BGESmallENV15,
                "BAAI/bge-base-en-v1.5" => EmbeddingModel::BGEBaseENV15,
                other => {
                    return Err(AppError::Configuration(format!(
                        "Unsupported embedding model: {}",
                        other
                    )))
                }
            };

            let model = TextEmbedding::try_new(
                InitOptions::new(model_type).with_show_download_progress(false),
            )
            .map_err(|e| AppError::Embedding(format!("Failed to load embedding model: {}", e)))?;

            Ok(Self {
                model: Mutex::new(model),
                model_name: model_name.to_string(),
                normalize,
            })
        }
    }

    #[async_trait]
    impl EmbeddingProvider for FastembedProvider {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let mut vectors = self
                .model
                .lock()
                .embed(vec![text], None)
                .map_err(|e| AppError::Embedding(format!("Embedding failed: {}", e)))?;

            let mut vector = vectors
                .pop()
                .ok_or_else(|| AppError::Embedding("Model returned no output".into()))?;

            if self.normalize {
                l2_normalize(&mut vector);
            }
            Ok(vector)
        }

        fn model_name(&self) -> &str {
            &self.model_name
        }
    }
}
