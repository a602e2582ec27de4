//! Vector sources: where document and query vectors come from.
//!
//! - [`RandomVectorSource`]: uniform random placeholders (demo / tests).
//!   Scores carry no meaning, but the ranking contract still holds.
//! - [`ModelVectorSource`]: embeddings from a model provider.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lexgate_config::{RetrievalConfig, VectorSourceKind};
use lexgate_core::error::RetrievalError;
use lexgate_core::provider::{EmbeddingRequest, Provider};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

/// Produces fixed-dimension vectors for texts.
#[async_trait]
pub trait VectorSource: Send + Sync {
    /// A short name for logs (e.g., "random", "model").
    fn name(&self) -> &str;

    /// One vector per input text, in input order.
    async fn vectors(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, RetrievalError>;

    /// Vector for a single query.
    async fn vector(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        self.vectors(&[text])
            .await?
            .pop()
            .ok_or_else(|| RetrievalError::Embedding("source returned no vector".into()))
    }
}

/// Uniform `[0, 1)` placeholder vectors; ignores the text entirely.
pub struct RandomVectorSource {
    dimension: usize,
    rng: Mutex<StdRng>,
}

impl RandomVectorSource {
    /// Entropy-seeded source.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Reproducible source: the same seed yields the same vector sequence.
    pub fn seeded(dimension: usize, seed: u64) -> Self {
        Self {
            dimension,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

#[async_trait]
impl VectorSource for RandomVectorSource {
    fn name(&self) -> &str {
        "random"
    }

    async fn vectors(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        Ok(texts
            .iter()
            .map(|_| (0..self.dimension).map(|_| rng.random::<f32>()).collect())
            .collect())
    }
}

/// Embeddings from a provider's `embed` capability.
pub struct ModelVectorSource {
    provider: Arc<dyn Provider>,
    model: String,
}

impl ModelVectorSource {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

#[async_trait]
impl VectorSource for ModelVectorSource {
    fn name(&self) -> &str {
        "model"
    }

    async fn vectors(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(model = %self.model, count = texts.len(), "Requesting embeddings");

        let response = self
            .provider
            .embed(EmbeddingRequest {
                model: self.model.clone(),
                inputs: texts.iter().map(|t| t.to_string()).collect(),
            })
            .await
            .map_err(|e| RetrievalError::Embedding(e.to_string()))?;

        if response.embeddings.len() != texts.len() {
            return Err(RetrievalError::Embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                response.embeddings.len()
            )));
        }

        Ok(response.embeddings)
    }
}

/// Select the vector source named by configuration.
///
/// `model` needs a provider; without one the random source is used.
pub fn build_vector_source(
    config: &RetrievalConfig,
    provider: Option<Arc<dyn Provider>>,
) -> Arc<dyn VectorSource> {
    match (config.vector_source, provider) {
        (VectorSourceKind::Model, Some(provider)) => {
            Arc::new(ModelVectorSource::new(provider, &config.embedding_model))
        }
        (VectorSourceKind::Model, None) => {
            warn!("Model vector source requested without a configured model, using random vectors");
            random_source(config)
        }
        (VectorSourceKind::Random, _) => random_source(config),
    }
}

fn random_source(config: &RetrievalConfig) -> Arc<dyn VectorSource> {
    match config.seed {
        Some(seed) => Arc::new(RandomVectorSource::seeded(config.dimension, seed)),
        None => Arc::new(RandomVectorSource::new(config.dimension)),
    }
}
