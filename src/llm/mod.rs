//! LLM provider clients and abstractions.
//!
//! A single trait, [`LlmClient`], fronts every provider. The portal talks to
//! one hosted model (Groq's OpenAI-compatible endpoint by default); the trait
//! exists so tests and future backends can stand in without touching the
//! engine or the generator.

/// Core LLM client trait, generation parameters, and provider selection.
pub mod client;

#[cfg(feature = "openai")]
pub mod openai;

pub use client::{GenerationParams, LlmClient, LlmProvider, GROQ_API_BASE};
