use async_trait::async_trait;

use crate::{AxonError, Document, Embeddings};

/// Trait for vector storage backends.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Add documents to the store, computing their embeddings.
    ///
    /// Returns the ids the documents were stored under. Documents with an
    /// empty id get one assigned by the store.
    async fn add_documents(
        &self,
        docs: Vec<Document>,
        embeddings: &dyn Embeddings,
    ) -> Result<Vec<String>, AxonError>;

    /// Search for similar documents by query string.
    async fn similarity_search(
        &self,
        query: &str,
        k: usize,
        embeddings: &dyn Embeddings,
    ) -> Result<Vec<Document>, AxonError>;

    /// Search with similarity scores (higher = more similar).
    async fn similarity_search_with_score(
        &self,
        query: &str,
        k: usize,
        embeddings: &dyn Embeddings,
    ) -> Result<Vec<(Document, f32)>, AxonError>;

    /// Delete documents by id.
    async fn delete(&self, ids: &[&str]) -> Result<(), AxonError>;
}
