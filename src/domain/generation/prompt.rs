//! Prompt assembly for grounded answer synthesis

use crate::domain::retrieval::RetrievedChunk;

const ANSWER_PROMPT: &str = "\
You are a helpful AI assistant. Answer the user's question based on the context provided below.

Context from documents:
{context}

Question: {question}

Instructions:
- Answer based ONLY on the provided context
- If the context doesn't contain enough information, say so
- Be concise and accurate
- Cite the source when possible

Answer:
";

/// Build the context block from retrieved chunks.
///
/// Chunks keep the retriever's order; each is prefixed with a 1-based
/// positional marker so the synthesizer can reference passages.
pub fn build_context(chunks: &[RetrievedChunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(idx, chunk)| format!("[{}] {}", idx + 1, chunk.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Collect the deduplicated source labels of the retrieved chunks,
/// preserving first-occurrence order.
pub fn collect_sources(chunks: &[RetrievedChunk]) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();

    for chunk in chunks {
        if !sources.iter().any(|s| s == &chunk.source) {
            sources.push(chunk.source.clone());
        }
    }

    sources
}

/// Render the full synthesis prompt for a question and its context block
pub fn build_prompt(context: &str, question: &str) -> String {
    ANSWER_PROMPT
        .replace("{context}", context)
        .replace("{question}", question)
}
