//! Conversational RAG engine.
//!
//! Composes history-aware query reformulation, similarity retrieval, and
//! answer synthesis into a single `answer_query` operation, with session
//! histories held in a [`SessionStore`].

use crate::db::VectorStore;
use crate::llm::{GenerationParams, LlmClient};
use crate::memory::{truncate_history, SessionStore, DEFAULT_HISTORY_WINDOW};
use crate::rag::embeddings::EmbeddingProvider;
use crate::types::{AnswerMode, ChatMessage, ChatTurn, RagAnswer, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Chunks fetched per similarity search unless overridden; the retriever
/// default of the original deployment.
pub const DEFAULT_RETRIEVAL_LIMIT: usize = 4;

/// At most this many matching chunks are concatenated by
/// `get_documents_context`. Inherited safety margin, not a token-accurate
/// budget.
pub const MAX_CONTEXT_CHUNKS: usize = 20;

const CONTEXTUALIZE_SYSTEM_PROMPT: &str = "Given a chat history and the latest user question \
which might reference context in the chat history, \
formulate a standalone question which can be understood \
without the chat history. Do NOT answer the question, \
just reformulate it if needed and otherwise return it as is.";

const QA_SYSTEM_PROMPT: &str = "You are an assistant for question-answering tasks. \
Use the following pieces of retrieved context to answer \
the question. If you don't know the answer, say that you \
don't know. Use three sentences maximum and keep the \
answer concise.";

/// Conversational retrieval-augmented generation over faculty-uploaded
/// course material.
pub struct RagEngine {
    llm: Arc<dyn LlmClient>,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    sessions: SessionStore,
    retrieval_limit: usize,
    history_window: usize,
}

impl RagEngine {
    /// Create an engine over the given providers with default tuning.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            llm,
            embedder,
            store,
            sessions: SessionStore::new(),
            retrieval_limit: DEFAULT_RETRIEVAL_LIMIT,
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }

    /// Override the number of chunks fetched per query.
    pub fn with_retrieval_limit(mut self, limit: usize) -> Self {
        self.retrieval_limit = limit;
        self
    }

    /// Override how many recent turns are replayed into prompts.
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    /// The session store backing this engine. Shared, cheap to clone.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Answer a student query using conversational RAG.
    ///
    /// Retrieval is driven by a history-aware reformulation of the query;
    /// synthesis sees the retrieved context, the recent history, and the
    /// original input. Reformulation and synthesis replay only the most
    /// recent `history_window` turns (default 10); the stored history keeps
    /// every turn. The user query and the answer are appended to the session
    /// history, and the distinct `source` labels of the retrieved chunks are
    /// returned alongside the answer.
    ///
    /// # Errors
    ///
    /// Any failure of the embedding call, the vector store, or the LLM
    /// aborts the whole operation; no partial answer, no internal retry.
    pub async fn answer_query(&self, query: &str, session_id: &str) -> Result<RagAnswer> {
        let history = self.sessions.history(session_id);

        // Skip the reformulation call when there is no history to resolve
        // references against; it also keeps the model from "answering" a
        // question it was only meant to rewrite.
        let standalone_query = if history.is_empty() {
            query.to_string()
        } else {
            self.reformulate_query(query, &history).await?
        };

        let query_embedding = self.embedder.embed(&standalone_query).await?;
        let retrieved = self
            .store
            .search(&query_embedding, self.retrieval_limit)
            .await?;

        let context = retrieved
            .iter()
            .map(|scored| scored.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let mut messages =
            vec![ChatMessage::system(format!("{}\n\n{}", QA_SYSTEM_PROMPT, context))];
        for turn in truncate_history(&history, self.history_window) {
            messages.push(ChatMessage::from(&turn));
        }
        messages.push(ChatMessage::user(query));

        let answer = self
            .llm
            .chat(&messages, &GenerationParams::default())
            .await?;

        self.sessions.append(session_id, ChatTurn::user(query));
        self.sessions.append(session_id, ChatTurn::assistant(&answer));

        let sources: HashSet<String> = retrieved
            .iter()
            .map(|scored| scored.chunk.metadata.source.clone())
            .collect();

        Ok(RagAnswer {
            answer,
            sources,
            mode: AnswerMode::Qa,
        })
    }

    async fn reformulate_query(&self, query: &str, history: &[ChatTurn]) -> Result<String> {
        let mut messages = vec![ChatMessage::system(CONTEXTUALIZE_SYSTEM_PROMPT)];
        for turn in truncate_history(history, self.history_window) {
            messages.push(ChatMessage::from(&turn));
        }
        messages.push(ChatMessage::user(query));

        self.llm.chat(&messages, &GenerationParams::default()).await
    }

    /// Retrieve concatenated context from specific documents.
    ///
    /// Fetches the chunks whose `doc_id` is in `document_ids` (backends with
    /// metadata filters push the predicate down; others scan the collection)
    /// and joins the first [`MAX_CONTEXT_CHUNKS`] with blank lines. An empty
    /// store or no matching chunks yields an empty string, logged but not
    /// fatal; store faults propagate.
    pub async fn get_documents_context(&self, document_ids: &[String]) -> Result<String> {
        let chunks = self.store.get_by_doc_ids(document_ids).await?;

        if chunks.is_empty() {
            if self.store.count().await? == 0 {
                warn!("Vector store returned no documents.");
            } else {
                warn!(?document_ids, "No chunks found for requested document IDs");
            }
            return Ok(String::new());
        }

        Ok(chunks
            .iter()
            .take(MAX_CONTEXT_CHUNKS)
            .map(|chunk| chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n"))
    }

    /// Delete every chunk belonging to a document from the vector store.
    ///
    /// A `doc_id` with no matching chunks is a no-op, not an error; no delete
    /// call is issued. Store faults propagate.
    pub async fn delete_document(&self, doc_id: &str) -> Result<()> {
        let target = [doc_id.to_string()];
        let matching = self.store.get_by_doc_ids(&target).await?;

        if matching.is_empty() {
            return Ok(());
        }

        let ids: Vec<String> = matching.into_iter().map(|chunk| chunk.id).collect();
        let deleted = self.store.delete(&ids).await?;
        info!(doc_id, deleted, "Deleted vectors for document");
        Ok(())
    }

    /// Liveness probe for the vector store. Faults are swallowed and
    /// reported as `"unavailable"`, never propagated.
    pub async fn check_vectorstore(&self) -> String {
        match self.store.count().await {
            Ok(count) => format!("operational ({} chunks)", count),
            Err(e) => {
                error!("Vectorstore check failed: {}", e);
                "unavailable".to_string()
            }
        }
    }

    /// Liveness probe for the LLM provider. Faults are swallowed and
    /// reported as `"unavailable"`, never propagated.
    pub async fn check_llm(&self) -> String {
        match self.llm.generate("Hello").await {
            Ok(_) => "operational".to_string(),
            Err(e) => {
                error!("LLM check failed: {}", e);
                "unavailable".to_string()
            }
        }
    }
}
