//! Vector similarity math shared by the cache store implementations

/// Calculate cosine similarity between two vectors.
///
/// Returns a value in [-1, 1]. Vectors of mismatched or zero length, and
/// vectors with zero magnitude, are not comparable and yield 0.0 so they can
/// never clear an admission threshold.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
