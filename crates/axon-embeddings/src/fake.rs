use async_trait::async_trait;
use axon_core::{AxonError, Embeddings};
use rand::Rng;

/// Fake embeddings for testing.
///
/// Every vector is filled with uniformly random values in `[0, 1)`. The
/// vectors carry no semantic meaning and are not derived from the input
/// text, so two calls with the same text return different vectors.
pub struct FakeEmbeddings {
    dim: usize,
}

impl FakeEmbeddings {
    /// Create a provider emitting vectors of the given dimension.
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    /// The configured vector dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    fn random_vector(&self) -> Vec<f32> {
        let mut rng = rand::rng();
        (0..self.dim).map(|_| rng.random::<f32>()).collect()
    }
}

#[async_trait]
impl Embeddings for FakeEmbeddings {
    async fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, AxonError> {
        Ok(texts.iter().map(|_| self.random_vector()).collect())
    }

    async fn embed_query(&self, _text: &str) -> Result<Vec<f32>, AxonError> {
        Ok(self.random_vector())
    }
}
