use async_trait::async_trait;
use axon_core::{AxonError, Document, Embeddings, VectorStore};
use axon_weaviate::WeaviateVectorStore;

/// The store surface the CRUD harness drives.
///
/// A thin layer over [`VectorStore`] plus the collection administration
/// operations the harness needs (count, existence check, drop).
#[async_trait]
pub trait CrudStore: Send + Sync {
    /// Insert texts as documents, returning the assigned ids.
    async fn add_texts(
        &self,
        texts: Vec<String>,
        embeddings: &dyn Embeddings,
    ) -> Result<Vec<String>, AxonError>;

    /// Hybrid keyword + vector search. `alpha` weights vector similarity;
    /// `1 - alpha` weights keyword relevance.
    async fn hybrid_search(
        &self,
        query: &str,
        k: usize,
        embeddings: &dyn Embeddings,
        alpha: f32,
    ) -> Result<Vec<Document>, AxonError>;

    /// Delete documents by id.
    async fn delete_ids(&self, ids: &[String]) -> Result<(), AxonError>;

    /// Total number of documents in the collection.
    async fn count(&self) -> Result<u64, AxonError>;

    /// Whether the collection exists.
    async fn exists(&self) -> Result<bool, AxonError>;

    /// Drop the collection and everything in it.
    async fn drop_collection(&self) -> Result<(), AxonError>;
}

#[async_trait]
impl CrudStore for WeaviateVectorStore {
    async fn add_texts(
        &self,
        texts: Vec<String>,
        embeddings: &dyn Embeddings,
    ) -> Result<Vec<String>, AxonError> {
        // Empty ids make the store assign UUIDs on insert.
        let docs = texts
            .into_iter()
            .map(|text| Document::new("", text))
            .collect();
        self.add_documents(docs, embeddings).await
    }

    async fn hybrid_search(
        &self,
        query: &str,
        k: usize,
        embeddings: &dyn Embeddings,
        alpha: f32,
    ) -> Result<Vec<Document>, AxonError> {
        let results = WeaviateVectorStore::hybrid_search(self, query, k, embeddings, alpha).await?;
        Ok(results.into_iter().map(|(doc, _)| doc).collect())
    }

    async fn delete_ids(&self, ids: &[String]) -> Result<(), AxonError> {
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        VectorStore::delete(self, &refs).await
    }

    async fn count(&self) -> Result<u64, AxonError> {
        WeaviateVectorStore::count(self).await
    }

    async fn exists(&self) -> Result<bool, AxonError> {
        WeaviateVectorStore::exists(self).await
    }

    async fn drop_collection(&self) -> Result<(), AxonError> {
        WeaviateVectorStore::drop_collection(self).await
    }
}
