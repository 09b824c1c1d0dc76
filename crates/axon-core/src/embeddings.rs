use async_trait::async_trait;

use crate::AxonError;

/// Trait for text embedding providers.
#[async_trait]
pub trait Embeddings: Send + Sync {
    /// Embed a batch of document texts. Returns exactly one vector per
    /// input text, in the same order.
    async fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, AxonError>;

    /// Embed a single query string.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, AxonError>;
}
