//! Core types shared across the crate: chat turns, document chunks,
//! generated questions, and the crate-wide error type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// ============= Chat Types =============

/// Role of a message within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// Instruction message, not attributed to either party.
    System,
    /// Message authored by the student.
    User,
    /// Message produced by the assistant.
    Assistant,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::System => write!(f, "system"),
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single turn in a session's chat history. Append-only within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Who authored this turn.
    pub role: TurnRole,
    /// The message text.
    pub content: String,
    /// When the turn was recorded.
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    /// Create a user turn stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an assistant turn stamped with the current time.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A role-tagged message sent to the LLM provider. Unlike [`ChatTurn`] this
/// carries no timestamp; it is the request shape, not the stored shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role as the provider expects it.
    pub role: TurnRole,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::System,
            content: content.into(),
        }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    /// Build an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

impl From<&ChatTurn> for ChatMessage {
    fn from(turn: &ChatTurn) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
        }
    }
}

// ============= Document Types =============

/// Metadata carried by every stored chunk. The ingestion pipeline guarantees
/// at least `doc_id` and `source` are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Identifier of the logical document this chunk belongs to. All chunks
    /// sharing a `doc_id` are deleted together.
    pub doc_id: String,
    /// Human-readable origin label (typically the uploaded file name).
    pub source: String,
    /// Position of this chunk within its document, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<usize>,
}

/// A stored unit of course material text, tagged for retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Store-level identifier, unique per chunk.
    pub id: String,
    /// The chunk text.
    pub text: String,
    /// Retrieval metadata.
    pub metadata: ChunkMetadata,
    /// Embedding vector, present when the chunk was stored with one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

/// A chunk returned by similarity search, with its similarity score.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The matched chunk (embedding omitted).
    pub chunk: DocumentChunk,
    /// Cosine similarity to the query, higher is more similar.
    pub score: f32,
}

// ============= RAG Answer Types =============

/// Answer mode tag carried on every RAG response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
    /// Question-answering over retrieved course material.
    Qa,
}

/// Result of a conversational RAG query.
#[derive(Debug, Clone, Serialize)]
pub struct RagAnswer {
    /// The synthesized answer text.
    pub answer: String,
    /// Deduplicated `source` labels of the retrieved chunks. Order is not
    /// guaranteed; compare as a set.
    pub sources: HashSet<String>,
    /// Always [`AnswerMode::Qa`] for `answer_query`.
    pub mode: AnswerMode,
}

// ============= Generated Question Types =============

/// Category of an assignment question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentKind {
    /// Descriptive/theoretical question.
    Theory,
    /// Calculation-based question.
    Numerical,
    /// Analysis or reasoning question.
    Analytical,
    /// Applied-scenario question.
    Application,
}

/// A structured assignment question produced by the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentQuestion {
    /// 1-based position within the generated set.
    pub question_number: u32,
    /// The question text.
    pub question: String,
    /// Question category.
    #[serde(rename = "type")]
    pub kind: AssignmentKind,
    /// Marks allotted.
    pub marks: u32,
    /// How marks are distributed across answer points.
    pub marking_scheme: String,
    /// Brief outline of the expected answer.
    pub sample_answer: String,
}

/// The four options of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McqOptions {
    /// Option A text.
    #[serde(rename = "A")]
    pub a: String,
    /// Option B text.
    #[serde(rename = "B")]
    pub b: String,
    /// Option C text.
    #[serde(rename = "C")]
    pub c: String,
    /// Option D text.
    #[serde(rename = "D")]
    pub d: String,
}

/// Which option answers an MCQ correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum McqAnswer {
    /// Option A.
    A,
    /// Option B.
    B,
    /// Option C.
    C,
    /// Option D.
    D,
}

/// A multiple-choice question with exactly one correct answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mcq {
    /// 1-based position within the generated set.
    pub question_number: u32,
    /// The question text.
    pub question: String,
    /// The four candidate answers.
    pub options: McqOptions,
    /// The correct option.
    pub correct_answer: McqAnswer,
    /// Why the correct option is correct.
    pub explanation: String,
}

/// Category of a viva (oral examination) question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VivaKind {
    /// Tests conceptual understanding.
    Conceptual,
    /// Asks for a definition.
    Definition,
    /// Asks to compare or contrast.
    Comparison,
    /// Applied-scenario question.
    Application,
}

/// Difficulty level for generated questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Introductory level.
    Easy,
    /// Standard level (the default for generation).
    Medium,
    /// Advanced level.
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// A viva question with the points an examiner should listen for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VivaQuestion {
    /// 1-based position within the generated set.
    pub question_number: u32,
    /// The question text.
    pub question: String,
    /// Question category.
    #[serde(rename = "type")]
    pub kind: VivaKind,
    /// Ordered points expected in a good verbal answer.
    pub key_points: Vec<String>,
    /// Difficulty level.
    pub difficulty: Difficulty,
}

// ============= Error Types =============

/// Crate-wide error type.
///
/// Propagation policy: configuration and provider transport faults fail loud;
/// degraded-content conditions (unparseable generation output, empty result
/// sets) are recovered locally and never surface as this type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or invalid configuration (e.g. absent API key). Fatal at
    /// construction, not recoverable within the process.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// LLM provider call failed.
    #[error("LLM error: {0}")]
    Llm(String),

    /// Embedding provider call failed.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Vector store operation failed.
    #[error("Vector store error: {0}")]
    VectorStore(String),

    /// Caller supplied invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested item does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
