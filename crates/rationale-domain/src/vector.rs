//! Vector math shared by embedding providers and vector indexes

/// Calculate cosine similarity between two embedding vectors
///
/// Returns a value in [-1, 1]:
/// - 1.0 = identical direction
/// - 0.0 = orthogonal (also returned when either vector has zero length)
/// - -1.0 = opposite direction
///
/// # Panics
///
/// Panics if vectors have different lengths
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vectors must have same length");

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a = magnitude(a);
    let magnitude_b = magnitude(b);

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

/// Euclidean length of a vector
pub fn magnitude(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Scale a vector to unit length in place (zero vectors are left untouched)
pub fn normalize(v: &mut [f32]) {
    let m = magnitude(v);
    if m > 0.0 {
        for value in v.iter_mut() {
            *value /= m;
        }
    }
}
