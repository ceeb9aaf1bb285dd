//! Faculty question generation: assignments, MCQs, and viva questions.
//!
//! Each operation makes one prompted LLM call asking for a JSON array, then
//! parses the first `[`-to-last-`]` span of the raw response into typed
//! question structs. Deserialization doubles as schema validation: field
//! names, types, and enumerated values are all enforced. A response that
//! fails to parse or validate never errors the caller; it is replaced by a
//! deterministic placeholder list of exactly the requested size. Transport
//! and provider failures before the parse step do propagate.

use crate::llm::{GenerationParams, LlmClient};
use crate::types::{
    AssignmentKind, AssignmentQuestion, ChatMessage, Difficulty, Mcq, McqAnswer, McqOptions,
    Result, VivaKind, VivaQuestion,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{info, warn};

/// Default number of assignment questions.
pub const DEFAULT_ASSIGNMENT_COUNT: usize = 5;
/// Default number of MCQs.
pub const DEFAULT_MCQ_COUNT: usize = 10;
/// Default number of viva questions.
pub const DEFAULT_VIVA_COUNT: usize = 10;

/// Context cap in characters. An inherited safety margin against oversized
/// prompts, not a token-accurate budget.
pub const MAX_CONTEXT_CHARS: usize = 4000;

const GENERATION_PARAMS: GenerationParams = GenerationParams {
    temperature: Some(0.5),
    max_tokens: Some(2048),
};

/// Stateless service turning a block of course material into structured
/// question lists via prompted LLM calls.
pub struct QuestionGenerator {
    llm: Arc<dyn LlmClient>,
}

impl QuestionGenerator {
    /// Create a generator over an already-initialized LLM client.
    ///
    /// Client construction is where missing credentials fail fast; by the
    /// time a generator exists, the provider is configured.
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Generate structured assignment questions.
    pub async fn generate_assignment(
        &self,
        context: &str,
        num_questions: usize,
        difficulty: Difficulty,
    ) -> Result<Vec<AssignmentQuestion>> {
        let prompt =
            assignment_prompt(num_questions, difficulty, truncate_chars(context, MAX_CONTEXT_CHARS));
        let raw = self
            .llm
            .chat(&[ChatMessage::user(prompt)], &GENERATION_PARAMS)
            .await?;

        let questions = parse_question_array(&raw)
            .unwrap_or_else(|| fallback_assignment(num_questions));
        info!(count = questions.len(), "Generated assignment questions");
        Ok(questions)
    }

    /// Generate multiple choice questions with four options each.
    pub async fn generate_mcqs(
        &self,
        context: &str,
        num_questions: usize,
        difficulty: Difficulty,
    ) -> Result<Vec<Mcq>> {
        let prompt =
            mcq_prompt(num_questions, difficulty, truncate_chars(context, MAX_CONTEXT_CHARS));
        let raw = self
            .llm
            .chat(&[ChatMessage::user(prompt)], &GENERATION_PARAMS)
            .await?;

        let questions = parse_question_array(&raw).unwrap_or_else(|| fallback_mcqs(num_questions));
        info!(count = questions.len(), "Generated MCQs");
        Ok(questions)
    }

    /// Generate viva (oral examination) questions.
    pub async fn generate_viva_questions(
        &self,
        context: &str,
        num_questions: usize,
    ) -> Result<Vec<VivaQuestion>> {
        let prompt = viva_prompt(num_questions, truncate_chars(context, MAX_CONTEXT_CHARS));
        let raw = self
            .llm
            .chat(&[ChatMessage::user(prompt)], &GENERATION_PARAMS)
            .await?;

        let questions = parse_question_array(&raw).unwrap_or_else(|| fallback_viva(num_questions));
        info!(count = questions.len(), "Generated viva questions");
        Ok(questions)
    }
}

// ============================================================================
// Prompts
// ============================================================================

fn assignment_prompt(num_questions: usize, difficulty: Difficulty, context: &str) -> String {
    format!(
        r#"You are an expert educator creating an assignment. Using the provided content, generate {num_questions} assignment questions.

Difficulty Level: {difficulty}

Guidelines:
- Create a mix of question types: theory, numerical, analytical, application-based
- Assign appropriate marks: 2-mark, 5-mark, 10-mark questions
- Include marking scheme for each question
- Ensure questions test different aspects and depth levels

Content:
{context}

Generate {num_questions} well-structured assignment questions in this JSON format:
[
  {{
    "question_number": 1,
    "question": "Question text here",
    "type": "theory/numerical/analytical/application",
    "marks": 5,
    "marking_scheme": "Point 1 (2 marks), Point 2 (2 marks), Point 3 (1 mark)",
    "sample_answer": "Brief outline of expected answer"
  }}
]

Generate the assignment now:"#
    )
}

fn mcq_prompt(num_questions: usize, difficulty: Difficulty, context: &str) -> String {
    format!(
        r#"Create {num_questions} multiple choice questions from the given content.

Difficulty: {difficulty}

Requirements:
- 4 options (A, B, C, D) for each question
- Only ONE correct answer
- Distractors should be plausible but clearly incorrect
- Cover different topics from the content
- Mix factual recall, conceptual, and application-based questions

Content:
{context}

Generate MCQs in this JSON format:
[
  {{
    "question_number": 1,
    "question": "What is...?",
    "options": {{
      "A": "Option A text",
      "B": "Option B text",
      "C": "Option C text",
      "D": "Option D text"
    }},
    "correct_answer": "B",
    "explanation": "Brief explanation of why B is correct"
  }}
]

Generate the MCQs now:"#
    )
}

fn viva_prompt(num_questions: usize, context: &str) -> String {
    format!(
        r#"Generate {num_questions} viva (oral examination) questions from the content.

Viva questions should:
- Test conceptual understanding
- Be brief and direct
- Allow for elaborate verbal answers
- Cover fundamental and advanced concepts
- Include some "why" and "how" questions

Content:
{context}

Generate questions in this JSON format:
[
  {{
    "question_number": 1,
    "question": "Explain the significance of...",
    "type": "conceptual/definition/comparison/application",
    "key_points": ["Point 1 expected in answer", "Point 2", "Point 3"],
    "difficulty": "easy/medium/hard"
  }}
]

Generate the viva questions now:"#
    )
}

// ============================================================================
// Parsing
// ============================================================================

/// Truncate to at most `max` characters, respecting UTF-8 boundaries.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Extract and deserialize the first balanced-looking JSON array span of the
/// raw LLM response. Returns `None` when no brackets are found, the span is
/// not valid JSON, the payload fails schema validation, or the array is
/// empty; an empty list is a refusal, and the caller expects `num_questions`
/// items either way.
fn parse_question_array<T: DeserializeOwned>(raw: &str) -> Option<Vec<T>> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end < start {
        return None;
    }

    match serde_json::from_str::<Vec<T>>(&raw[start..=end]) {
        Ok(questions) if questions.is_empty() => {
            warn!("LLM response contained an empty question array");
            None
        }
        Ok(questions) => Some(questions),
        Err(e) => {
            warn!("Failed to parse JSON from LLM response: {}", e);
            None
        }
    }
}

// ============================================================================
// Fallbacks
// ============================================================================

fn fallback_assignment(num_questions: usize) -> Vec<AssignmentQuestion> {
    (1..=num_questions as u32)
        .map(|n| AssignmentQuestion {
            question_number: n,
            question: format!(
                "Question {}: Based on the provided content, explain [topic] with relevant examples.",
                n
            ),
            kind: if n % 2 == 1 {
                AssignmentKind::Theory
            } else {
                AssignmentKind::Analytical
            },
            marks: 5,
            marking_scheme: "Refer to content for detailed marking".to_string(),
            sample_answer: "Answer should cover key concepts from the provided material"
                .to_string(),
        })
        .collect()
}

fn fallback_mcqs(num_questions: usize) -> Vec<Mcq> {
    (1..=num_questions as u32)
        .map(|n| Mcq {
            question_number: n,
            question: format!("Question {} from content", n),
            options: McqOptions {
                a: "A".to_string(),
                b: "B".to_string(),
                c: "C".to_string(),
                d: "D".to_string(),
            },
            correct_answer: McqAnswer::A,
            explanation: "Refer to content for explanation".to_string(),
        })
        .collect()
}

fn fallback_viva(num_questions: usize) -> Vec<VivaQuestion> {
    (1..=num_questions as u32)
        .map(|n| VivaQuestion {
            question_number: n,
            question: "Explain a key concept from the provided content.".to_string(),
            kind: VivaKind::Conceptual,
            key_points: vec!["Point 1".to_string(), "Point 2".to_string()],
            difficulty: Difficulty::Medium,
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_plain_ascii() {
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_chars_respects_utf8_boundaries() {
        let text = "αβγδε";
        assert_eq!(truncate_chars(text, 2), "αβ");
    }

    #[test]
    fn test_parse_extracts_array_from_surrounding_prose() {
        let raw = r#"Here are your questions:
[
  {"question_number": 1, "question": "Explain X.", "type": "theory",
   "marks": 5, "marking_scheme": "scheme", "sample_answer": "answer"}
]
Hope that helps!"#;

        let parsed: Vec<AssignmentQuestion> = parse_question_array(raw).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].kind, AssignmentKind::Theory);
    }

    #[test]
    fn test_parse_returns_none_without_brackets() {
        assert!(parse_question_array::<Mcq>("no json here at all").is_none());
    }

    #[test]
    fn test_parse_returns_none_for_malformed_json() {
        assert!(parse_question_array::<Mcq>("[ {broken json ]").is_none());
    }

    #[test]
    fn test_parse_treats_empty_array_as_failure() {
        assert!(parse_question_array::<Mcq>("[]").is_none());
        assert!(parse_question_array::<Mcq>("Here you go: []").is_none());
    }

    #[test]
    fn test_parse_rejects_schema_violations() {
        // correct_answer must be one of A-D
        let raw = r#"[{"question_number": 1, "question": "q",
            "options": {"A": "a", "B": "b", "C": "c", "D": "d"},
            "correct_answer": "E", "explanation": "e"}]"#;
        assert!(parse_question_array::<Mcq>(raw).is_none());
    }

    #[test]
    fn test_fallback_assignment_alternates_kinds() {
        let questions = fallback_assignment(4);
        assert_eq!(questions.len(), 4);
        assert_eq!(questions[0].kind, AssignmentKind::Theory);
        assert_eq!(questions[1].kind, AssignmentKind::Analytical);
        assert_eq!(questions[0].question_number, 1);
        assert_eq!(questions[3].question_number, 4);
    }

    #[test]
    fn test_fallback_mcqs_shape() {
        let questions = fallback_mcqs(3);
        assert_eq!(questions.len(), 3);
        for q in &questions {
            assert_eq!(q.correct_answer, McqAnswer::A);
            assert!(!q.options.a.is_empty());
            assert!(!q.options.d.is_empty());
        }
    }

    #[test]
    fn test_fallback_viva_shape() {
        let questions = fallback_viva(2);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].kind, VivaKind::Conceptual);
        assert_eq!(questions[0].difficulty, Difficulty::Medium);
        assert_eq!(questions[0].key_points.len(), 2);
    }
}
