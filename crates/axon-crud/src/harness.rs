use std::sync::Arc;

use axon_core::{AxonError, Embeddings};
use tracing::{info, warn};

use crate::CrudStore;

/// Number of documents the create phase inserts.
pub const DEFAULT_TARGET_COUNT: usize = 100_000;
/// Documents per batch insert.
pub const DEFAULT_BATCH_SIZE: usize = 100;
/// Dimension of the fake embedding vectors.
pub const EMBEDDING_DIM: usize = 1536;

/// Text inserted during create and read back verbatim.
const READ_BACK_TEXT: &str = "Random text 123";
/// Hybrid weighting for the read phase: heavily favour keyword match over
/// the (random, meaningless) vector similarity.
const READ_ALPHA: f32 = 0.1;
/// Result window for the read phase.
const READ_LIMIT: usize = 4;

/// Sequential CRUD smoke test against an externally-owned collection.
///
/// Runs create, read, update and delete in order, then drops the
/// collection. Cleanup runs on every exit path; the first phase error is
/// what [`run`](CrudHarness::run) returns.
pub struct CrudHarness {
    store: Arc<dyn CrudStore>,
    embeddings: Arc<dyn Embeddings>,
    collection: String,
    target_count: usize,
    batch_size: usize,
}

impl CrudHarness {
    /// Create a harness with the default target count and batch size.
    pub fn new(
        store: Arc<dyn CrudStore>,
        embeddings: Arc<dyn Embeddings>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            store,
            embeddings,
            collection: collection.into(),
            target_count: DEFAULT_TARGET_COUNT,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Override the number of documents the create phase inserts.
    pub fn with_target_count(mut self, target_count: usize) -> Self {
        self.target_count = target_count;
        self
    }

    /// Override the batch size used for inserts.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Run all phases in sequence, then clean up.
    ///
    /// Cleanup runs whether the phases succeeded or not. A cleanup failure
    /// is logged but never masks a phase error.
    pub async fn run(&self) -> Result<(), AxonError> {
        info!("Running all CRUD operations in sequence...");
        let outcome = self.run_phases().await;
        if let Err(e) = self.cleanup().await {
            warn!(collection = %self.collection, "cleanup failed: {e}");
        }
        outcome
    }

    async fn run_phases(&self) -> Result<(), AxonError> {
        self.create().await?;
        self.read().await?;
        self.update().await?;
        self.delete().await?;
        Ok(())
    }

    /// Insert `target_count` synthetic documents in batches, then verify
    /// the server-side count matches exactly.
    pub async fn create(&self) -> Result<(), AxonError> {
        info!(
            collection = %self.collection,
            count = self.target_count,
            "creating random texts"
        );

        let total_batches = self.target_count.div_ceil(self.batch_size);
        for start in (0..self.target_count).step_by(self.batch_size) {
            let end = (start + self.batch_size).min(self.target_count);
            let texts: Vec<String> = (start..end).map(|i| format!("Random text {i}")).collect();
            self.store
                .add_texts(texts, self.embeddings.as_ref())
                .await?;
            info!(
                "added batch {} of {}",
                start / self.batch_size + 1,
                total_batches
            );
        }

        let total = self.store.count().await?;
        if total != self.target_count as u64 {
            return Err(AxonError::Assertion(format!(
                "expected {} records, got {total}",
                self.target_count
            )));
        }

        info!(
            collection = %self.collection,
            total,
            "create phase passed"
        );
        Ok(())
    }

    /// Search for a known document and verify it comes back as the top
    /// result, matched by literal text.
    ///
    /// The embedding vectors are random, so the match has to come from the
    /// keyword side of the hybrid search — never from vector distance.
    pub async fn read(&self) -> Result<(), AxonError> {
        info!(collection = %self.collection, "reading a test record");

        let docs = self
            .store
            .hybrid_search(
                READ_BACK_TEXT,
                READ_LIMIT,
                self.embeddings.as_ref(),
                READ_ALPHA,
            )
            .await?;
        info!("found {} similar documents", docs.len());

        let doc = docs.first().ok_or_else(|| {
            AxonError::Assertion(format!("expected at least one result for '{READ_BACK_TEXT}'"))
        })?;
        if doc.content != READ_BACK_TEXT {
            return Err(AxonError::Assertion(format!(
                "expected '{READ_BACK_TEXT}', got '{}'",
                doc.content
            )));
        }

        info!(collection = %self.collection, "read phase passed");
        Ok(())
    }

    /// Update is not supported by this integration; the phase only reports
    /// the limitation. It never fails and never changes the count.
    pub async fn update(&self) -> Result<(), AxonError> {
        info!("update operation is not supported by this integration");
        Ok(())
    }

    /// Insert one extra document, delete it by id, and verify the count
    /// drops by exactly one.
    pub async fn delete(&self) -> Result<(), AxonError> {
        info!(collection = %self.collection, "deleting a record");

        let ids = self
            .store
            .add_texts(vec![READ_BACK_TEXT.to_string()], self.embeddings.as_ref())
            .await?;

        let before = self.store.count().await?;
        self.store.delete_ids(&ids).await?;
        let after = self.store.count().await?;

        let expected = before.saturating_sub(1);
        if after != expected {
            return Err(AxonError::Assertion(format!(
                "expected {expected} records, got {after}"
            )));
        }

        info!(total = after, "delete phase passed");
        Ok(())
    }

    /// Drop the collection if it exists. Safe to call on any exit path.
    pub async fn cleanup(&self) -> Result<(), AxonError> {
        if self.store.exists().await? {
            self.store.drop_collection().await?;
            info!(collection = %self.collection, "collection dropped");
        }
        Ok(())
    }
}
