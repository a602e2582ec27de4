//! Vector index and ranking.
//!
//! Pure-Rust implementations of:
//! - Inner-product similarity (raw, unnormalized)
//! - Top-K selection with stable ordering
//! - Excerpt truncation

use lexgate_core::error::RetrievalError;
use lexgate_core::{Document, SourceReference};

/// Marker appended to excerpts that were cut short.
pub const ELLIPSIS: &str = "...";

/// Inner product of two vectors.
///
/// Returns 0.0 if the lengths differ or either vector is empty.
pub fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| *x as f64 * *y as f64)
        .sum();
    dot as f32
}

/// The first `max_chars` characters of `content`, plus [`ELLIPSIS`] when cut.
///
/// Counts Unicode scalar values so multi-byte text is never split.
pub fn excerpt(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &content[..byte_idx], ELLIPSIS),
        None => content.to_string(),
    }
}

#[derive(Debug, Clone)]
struct IndexedDocument {
    document: Document,
    vector: Vec<f32>,
}

/// Documents paired 1:1 with fixed-dimension vectors. Read-only once built.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    entries: Vec<IndexedDocument>,
    dimension: usize,
}

impl VectorIndex {
    /// Pair each document with its vector.
    ///
    /// All vectors must share one dimension and there must be exactly one
    /// vector per document.
    pub fn build(documents: &[Document], vectors: Vec<Vec<f32>>) -> Result<Self, RetrievalError> {
        if documents.len() != vectors.len() {
            return Err(RetrievalError::Embedding(format!(
                "expected {} vectors, got {}",
                documents.len(),
                vectors.len()
            )));
        }

        let dimension = vectors.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(RetrievalError::DimensionMismatch {
                expected: dimension,
                actual: bad.len(),
            });
        }

        let entries = documents
            .iter()
            .cloned()
            .zip(vectors)
            .map(|(document, vector)| IndexedDocument { document, vector })
            .collect();

        Ok(Self { entries, dimension })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The `k` documents most similar to `query`, best first.
    ///
    /// Scores are raw inner products. Equal scores keep document load order.
    pub fn search(&self, query: &[f32], k: usize, excerpt_chars: usize) -> Vec<SourceReference> {
        let mut scored: Vec<(f32, &Document)> = self
            .entries
            .iter()
            .map(|e| (inner_product(&e.vector, query), &e.document))
            .collect();

        // stable sort: ties stay in load order
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(k);

        scored
            .into_iter()
            .map(|(score, doc)| SourceReference {
                excerpt: excerpt(&doc.content, excerpt_chars),
                filename: doc.filename.clone(),
                score,
            })
            .collect()
    }
}
