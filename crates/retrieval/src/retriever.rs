//! Retriever: the document index plus the query path.
//!
//! Built once at startup and shared read-only across requests. If indexing
//! failed, or the retriever was created without an index, searches return
//! nothing instead of erroring.

use std::sync::Arc;

use lexgate_core::error::RetrievalError;
use lexgate_core::{Document, SourceReference};
use tracing::{debug, info, warn};

use crate::source::VectorSource;
use crate::store::DocumentStore;
use crate::vector::VectorIndex;

pub struct Retriever {
    source: Arc<dyn VectorSource>,
    index: Option<VectorIndex>,
    excerpt_chars: usize,
}

impl Retriever {
    /// Index every document in `store` with vectors from `source`.
    ///
    /// An indexing failure is logged and leaves the retriever unindexed.
    pub async fn build(
        store: &DocumentStore,
        source: Arc<dyn VectorSource>,
        excerpt_chars: usize,
    ) -> Self {
        let index = match index(store.documents(), source.as_ref()).await {
            Ok(index) => {
                info!(
                    documents = index.len(),
                    dimension = index.dimension(),
                    source = source.name(),
                    "Vector index built"
                );
                Some(index)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    source = source.name(),
                    "Vector index build failed, search disabled"
                );
                None
            }
        };

        Self {
            source,
            index,
            excerpt_chars,
        }
    }

    /// A retriever with no index; every search returns an empty result.
    pub fn unindexed(source: Arc<dyn VectorSource>, excerpt_chars: usize) -> Self {
        Self {
            source,
            index: None,
            excerpt_chars,
        }
    }

    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    /// Number of indexed documents (0 when unindexed).
    pub fn len(&self) -> usize {
        self.index.as_ref().map_or(0, VectorIndex::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// The top `k` documents for `query`, best first.
    ///
    /// At most `min(k, documents)` results. A query that cannot be turned
    /// into a vector yields an empty result.
    pub async fn search(&self, query: &str, k: usize) -> Vec<SourceReference> {
        let Some(index) = &self.index else {
            debug!("Search on unbuilt index");
            return Vec::new();
        };

        let query_vector = match self.source.vector(query).await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Query vector failed, returning no sources");
                return Vec::new();
            }
        };

        if query_vector.len() != index.dimension() {
            warn!(
                expected = index.dimension(),
                actual = query_vector.len(),
                "Query vector dimension mismatch, returning no sources"
            );
            return Vec::new();
        }

        let results = index.search(&query_vector, k, self.excerpt_chars);
        debug!(k, returned = results.len(), "Search complete");
        results
    }
}

/// Assign each document a vector from `source`.
pub async fn index(
    documents: &[Document],
    source: &dyn VectorSource,
) -> Result<VectorIndex, RetrievalError> {
    let texts: Vec<&str> = documents.iter().map(|d| d.content.as_str()).collect();
    let vectors = source.vectors(&texts).await?;
    VectorIndex::build(documents, vectors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RandomVectorSource;
    use async_trait::async_trait;

    /// Maps text to `[count of "probation", 1.0]` so ranking is predictable.
    struct KeywordSource;

    #[async_trait]
    impl VectorSource for KeywordSource {
        fn name(&self) -> &str {
            "keyword"
        }

        async fn vectors(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, RetrievalError> {
            Ok(texts
                .iter()
                .map(|t| vec![t.to_lowercase().matches("probation").count() as f32, 1.0])
                .collect())
        }
    }

    struct BrokenSource;

    /// Indexes with 2-dimensional vectors but answers queries with 3.
    struct ShiftingSource;

    #[async_trait]
    impl VectorSource for ShiftingSource {
        fn name(&self) -> &str {
            "shifting"
        }

        async fn vectors(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, RetrievalError> {
            let dim = if texts.len() == 1 { 3 } else { 2 };
            Ok(texts.iter().map(|_| vec![1.0; dim]).collect())
        }
    }

    #[async_trait]
    impl VectorSource for BrokenSource {
        fn name(&self) -> &str {
            "broken"
        }

        async fn vectors(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, RetrievalError> {
            Err(RetrievalError::Embedding("offline".into()))
        }
    }

    #[tokio::test]
    async fn unindexed_search_is_empty() {
        let retriever = Retriever::unindexed(Arc::new(RandomVectorSource::new(8)), 200);
        assert!(!retriever.is_indexed());
        assert!(retriever.search("anything", 3).await.is_empty());
    }

    #[tokio::test]
    async fn failed_build_leaves_retriever_unindexed() {
        let store = DocumentStore::fallback();
        let retriever = Retriever::build(&store, Arc::new(BrokenSource), 200).await;
        assert!(!retriever.is_indexed());
        assert!(retriever.search("probation", 3).await.is_empty());
    }

    #[tokio::test]
    async fn query_dimension_mismatch_is_empty() {
        let store = DocumentStore::fallback();
        let retriever = Retriever::build(&store, Arc::new(ShiftingSource), 200).await;
        assert!(retriever.is_indexed());
        assert!(retriever.search("probation", 3).await.is_empty());
    }

    #[tokio::test]
    async fn random_source_respects_result_bounds() {
        let store = DocumentStore::fallback();
        let retriever =
            Retriever::build(&store, Arc::new(RandomVectorSource::seeded(384, 7)), 200).await;

        assert_eq!(retriever.len(), store.len());
        for k in 0..6 {
            let results = retriever.search("query", k).await;
            assert_eq!(results.len(), k.min(store.len()));
            assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }

    #[tokio::test]
    async fn keyword_source_ranks_labor_snippet_first() {
        let store = DocumentStore::fallback();
        let retriever = Retriever::build(&store, Arc::new(KeywordSource), 200).await;

        let results = retriever.search("What is a probation period?", 3).await;
        assert_eq!(results[0].filename, "employment_law.txt");
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn excerpts_are_bounded() {
        let long = "x".repeat(500);
        let store = DocumentStore::from_documents(vec![Document::new("long.txt", long)]);
        let retriever = Retriever::build(&store, Arc::new(KeywordSource), 200).await;

        let results = retriever.search("q", 1).await;
        assert_eq!(results[0].excerpt.chars().count(), 203);
        assert!(results[0].excerpt.ends_with("..."));
    }
}
