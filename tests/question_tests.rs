//! Integration tests for the question generator.

mod common;

use acharya::questions::QuestionGenerator;
use acharya::types::{AppError, AssignmentKind, Difficulty, McqAnswer};
use common::mocks::MockLlmClient;
use rstest::rstest;
use std::sync::Arc;

const CONTEXT: &str = "A B-tree is a self-balancing tree data structure that maintains \
sorted data and allows searches, insertions, and deletions in logarithmic time.";

#[tokio::test]
async fn malformed_output_yields_exactly_the_requested_mcq_fallbacks() {
    let llm = Arc::new(MockLlmClient::new(
        "I'm sorry, I can't format that as requested.",
    ));
    let generator = QuestionGenerator::new(llm);

    let mcqs = generator
        .generate_mcqs(CONTEXT, 3, Difficulty::Medium)
        .await
        .unwrap();

    assert_eq!(mcqs.len(), 3);
    for (i, mcq) in mcqs.iter().enumerate() {
        assert_eq!(mcq.question_number, (i + 1) as u32);
        assert_eq!(mcq.correct_answer, McqAnswer::A);
        assert!(!mcq.options.a.is_empty());
        assert!(!mcq.options.b.is_empty());
        assert!(!mcq.options.c.is_empty());
        assert!(!mcq.options.d.is_empty());
    }
}

#[tokio::test]
async fn valid_assignment_array_is_returned_unmodified_and_in_order() {
    let response = r#"Here is your assignment:
[
  {"question_number": 1, "question": "Define a B-tree.", "type": "theory",
   "marks": 2, "marking_scheme": "Definition (2 marks)", "sample_answer": "A self-balancing tree."},
  {"question_number": 2, "question": "Derive the height bound of a B-tree.", "type": "numerical",
   "marks": 5, "marking_scheme": "Setup (2), derivation (3)", "sample_answer": "h <= log_t((n+1)/2)"},
  {"question_number": 3, "question": "Compare B-trees and binary search trees.", "type": "analytical",
   "marks": 5, "marking_scheme": "Three differences", "sample_answer": "Fan-out, height, disk access."},
  {"question_number": 4, "question": "Design an index for a library catalog.", "type": "application",
   "marks": 10, "marking_scheme": "Design (6), justification (4)", "sample_answer": "B-tree keyed on ISBN."},
  {"question_number": 5, "question": "Explain node splitting.", "type": "theory",
   "marks": 5, "marking_scheme": "Mechanism (3), example (2)", "sample_answer": "Median promoted to parent."}
]"#;
    let llm = Arc::new(MockLlmClient::new(response));
    let generator = QuestionGenerator::new(llm);

    let questions = generator
        .generate_assignment(CONTEXT, 5, Difficulty::Medium)
        .await
        .unwrap();

    assert_eq!(questions.len(), 5);
    assert_eq!(questions[0].question, "Define a B-tree.");
    assert_eq!(questions[1].kind, AssignmentKind::Numerical);
    assert_eq!(questions[3].marks, 10);
    let numbers: Vec<u32> = questions.iter().map(|q| q.question_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn valid_viva_array_parses_into_typed_questions() {
    let response = r#"[
  {"question_number": 1, "question": "Why are B-trees shallow?", "type": "conceptual",
   "key_points": ["High fan-out", "Logarithmic height"], "difficulty": "easy"},
  {"question_number": 2, "question": "Compare B-trees with B+ trees.", "type": "comparison",
   "key_points": ["Leaf chaining", "Internal keys"], "difficulty": "hard"}
]"#;
    let llm = Arc::new(MockLlmClient::new(response));
    let generator = QuestionGenerator::new(llm);

    let questions = generator.generate_viva_questions(CONTEXT, 2).await.unwrap();

    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].difficulty, Difficulty::Easy);
    assert_eq!(questions[1].key_points.len(), 2);
}

#[tokio::test]
async fn empty_array_output_yields_the_requested_fallbacks() {
    // A bare "[]" parses cleanly but carries zero questions; the caller is
    // still owed num_questions items.
    let llm = Arc::new(MockLlmClient::new("[]"));
    let generator = QuestionGenerator::new(llm);

    let mcqs = generator
        .generate_mcqs(CONTEXT, 3, Difficulty::Medium)
        .await
        .unwrap();

    assert_eq!(mcqs.len(), 3);
    assert_eq!(mcqs[0].correct_answer, McqAnswer::A);
}

#[tokio::test]
async fn schema_invalid_payload_falls_back_instead_of_erroring() {
    // Parses as JSON but violates the schema: correct_answer out of range.
    let response = r#"[{"question_number": 1, "question": "q",
        "options": {"A": "a", "B": "b", "C": "c", "D": "d"},
        "correct_answer": "Z", "explanation": "e"}]"#;
    let llm = Arc::new(MockLlmClient::new(response));
    let generator = QuestionGenerator::new(llm);

    let mcqs = generator
        .generate_mcqs(CONTEXT, 2, Difficulty::Easy)
        .await
        .unwrap();

    assert_eq!(mcqs.len(), 2);
    assert_eq!(mcqs[0].correct_answer, McqAnswer::A);
}

#[tokio::test]
async fn provider_failure_propagates_as_a_fault() {
    let generator = QuestionGenerator::new(Arc::new(MockLlmClient::failing()));

    let err = generator
        .generate_mcqs(CONTEXT, 3, Difficulty::Medium)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Llm(_)));
}

#[tokio::test]
async fn context_is_truncated_to_four_thousand_characters() {
    let mut context = "x".repeat(4000);
    context.push_str("SENTINEL");

    let llm = Arc::new(MockLlmClient::new("no json"));
    let generator = QuestionGenerator::new(llm.clone());
    generator
        .generate_viva_questions(&context, 1)
        .await
        .unwrap();

    let calls = llm.calls();
    assert_eq!(calls.len(), 1);
    let prompt = &calls[0][0].content;
    assert!(prompt.contains(&"x".repeat(4000)));
    assert!(!prompt.contains("SENTINEL"));
}

#[rstest]
#[case(1)]
#[case(5)]
#[case(10)]
#[tokio::test]
async fn fallback_lists_match_the_requested_count(#[case] count: usize) {
    let generator = QuestionGenerator::new(Arc::new(MockLlmClient::new("not json")));

    let assignment = generator
        .generate_assignment(CONTEXT, count, Difficulty::Hard)
        .await
        .unwrap();
    let mcqs = generator
        .generate_mcqs(CONTEXT, count, Difficulty::Hard)
        .await
        .unwrap();
    let viva = generator
        .generate_viva_questions(CONTEXT, count)
        .await
        .unwrap();

    assert_eq!(assignment.len(), count);
    assert_eq!(mcqs.len(), count);
    assert_eq!(viva.len(), count);
}
