//! Answer synthesis domain models and traits

mod prompt;
mod synthesizer;

pub use prompt::{build_context, build_prompt, collect_sources};
pub use synthesizer::AnswerSynthesizer;

#[cfg(test)]
pub use synthesizer::mock::MockAnswerSynthesizer;
