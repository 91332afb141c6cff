//! Answer synthesizer trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for answer synthesis backends (OpenAI, Anthropic, etc.)
///
/// The synthesizer receives a fully rendered prompt and returns raw text;
/// no structured output is parsed.
#[async_trait]
pub trait AnswerSynthesizer: Send + Sync + Debug {
    /// Generate an answer for the given prompt
    async fn generate(&self, prompt: &str) -> Result<String, DomainError>;

    /// Get the synthesizer name
    fn synthesizer_name(&self) -> &'static str;
}
