//! Greedy near-duplicate suppression over embedding vectors
//!
//! Overlapping chunking and boilerplate repeated across a page produce
//! chunks whose embeddings are nearly identical; only the first of each
//! cluster is worth storing.

/// Cosine similarity above which a later chunk is dropped as a duplicate
pub const DEDUP_THRESHOLD: f32 = 0.95;

/// Removes chunks whose embedding is a near-duplicate of an earlier kept one
///
/// Vectors are unit-normalized, then each chunk is compared in original order
/// against every chunk already kept; a dot product strictly greater than
/// [`DEDUP_THRESHOLD`] marks the later chunk as a duplicate. Relative order
/// of the survivors is preserved. Quadratic in the kept count, which is fine
/// at per-page chunk volumes.
pub fn deduplicate(chunks: Vec<String>, vectors: Vec<Vec<f32>>) -> (Vec<String>, Vec<Vec<f32>>) {
    if vectors.is_empty() {
        return (chunks, vectors);
    }

    let normalized: Vec<Vec<f32>> = vectors.iter().map(|v| unit_normalize(v)).collect();

    let mut keep: Vec<usize> = Vec::new();
    for i in 0..normalized.len() {
        let is_duplicate = keep
            .iter()
            .any(|&j| dot(&normalized[i], &normalized[j]) > DEDUP_THRESHOLD);
        if !is_duplicate {
            keep.push(i);
        }
    }

    let removed = chunks.len() - keep.len();
    if removed > 0 {
        tracing::info!("Removed {} near-duplicate chunks", removed);
    }

    let mut kept_chunks = Vec::with_capacity(keep.len());
    let mut kept_vectors = Vec::with_capacity(keep.len());
    let mut chunks = chunks.into_iter();
    let mut vectors = vectors.into_iter();
    let mut cursor = 0;
    for &index in &keep {
        let offset = index - cursor;
        let chunk = chunks.nth(offset).expect("kept index in range");
        let vector = vectors.nth(offset).expect("kept index in range");
        kept_chunks.push(chunk);
        kept_vectors.push(vector);
        cursor = index + 1;
    }

    (kept_chunks, kept_vectors)
}

/// Scales a vector to unit length; a zero-norm vector is returned unchanged
fn unit_normalize(v: &[f32]) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm = if norm == 0.0 { 1.0 } else { norm };
    v.iter().map(|x| x / norm).collect()
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
