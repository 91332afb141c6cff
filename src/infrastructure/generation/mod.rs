//! Answer synthesizer implementations

mod openai;

pub use openai::OpenAiSynthesizer;
