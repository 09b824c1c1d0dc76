use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axon_core::{AxonError, Document, Embeddings};
use axon_crud::{CrudHarness, CrudStore};
use axon_embeddings::FakeEmbeddings;

/// In-memory stand-in for the Weaviate store.
///
/// Search ranks exact text matches first, mirroring what the hybrid
/// query does at low alpha (keyword match dominates while the random
/// vectors contribute noise).
#[derive(Default)]
struct InMemoryCrudStore {
    entries: Mutex<Vec<(String, String)>>,
    created: Mutex<bool>,
    next_id: AtomicUsize,
    /// When non-zero, `count` over-reports by this amount, forcing the
    /// harness count assertions to fail.
    count_skew: u64,
}

#[async_trait]
impl CrudStore for InMemoryCrudStore {
    async fn add_texts(
        &self,
        texts: Vec<String>,
        _embeddings: &dyn Embeddings,
    ) -> Result<Vec<String>, AxonError> {
        *self.created.lock().unwrap() = true;
        let mut entries = self.entries.lock().unwrap();
        let mut ids = Vec::with_capacity(texts.len());
        for text in texts {
            let id = format!("doc-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
            entries.push((id.clone(), text));
            ids.push(id);
        }
        Ok(ids)
    }

    async fn hybrid_search(
        &self,
        query: &str,
        k: usize,
        _embeddings: &dyn Embeddings,
        _alpha: f32,
    ) -> Result<Vec<Document>, AxonError> {
        let entries = self.entries.lock().unwrap();
        let mut docs: Vec<Document> = entries
            .iter()
            .filter(|(_, text)| text == query)
            .map(|(id, text)| Document::new(id.clone(), text.clone()))
            .collect();
        for (id, text) in entries.iter() {
            if text != query {
                docs.push(Document::new(id.clone(), text.clone()));
            }
        }
        docs.truncate(k);
        Ok(docs)
    }

    async fn delete_ids(&self, ids: &[String]) -> Result<(), AxonError> {
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|(id, _)| !ids.contains(id));
        Ok(())
    }

    async fn count(&self) -> Result<u64, AxonError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.len() as u64 + self.count_skew)
    }

    async fn exists(&self) -> Result<bool, AxonError> {
        Ok(*self.created.lock().unwrap())
    }

    async fn drop_collection(&self) -> Result<(), AxonError> {
        self.entries.lock().unwrap().clear();
        *self.created.lock().unwrap() = false;
        Ok(())
    }
}

fn harness(store: Arc<InMemoryCrudStore>) -> CrudHarness {
    // Target count must cover "Random text 123" for the read phase;
    // small enough to keep the tests quick.
    CrudHarness::new(store, Arc::new(FakeEmbeddings::new(8)), "SmokeTest")
        .with_target_count(130)
        .with_batch_size(50)
}

#[tokio::test]
async fn full_run_succeeds_and_drops_collection() {
    let store = Arc::new(InMemoryCrudStore::default());
    let h = harness(store.clone());

    h.run().await.unwrap();

    assert!(!store.exists().await.unwrap());
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn create_inserts_exact_count_in_batches() {
    let store = Arc::new(InMemoryCrudStore::default());
    let h = harness(store.clone());

    h.create().await.unwrap();

    assert_eq!(store.count().await.unwrap(), 130);
    let entries = store.entries.lock().unwrap();
    assert_eq!(entries[0].1, "Random text 0");
    assert_eq!(entries[129].1, "Random text 129");
}

#[tokio::test]
async fn create_reports_expected_vs_actual_on_mismatch() {
    let store = Arc::new(InMemoryCrudStore {
        count_skew: 1,
        ..Default::default()
    });
    let h = harness(store);

    let err = h.create().await.unwrap_err();
    assert!(matches!(err, AxonError::Assertion(_)));
    let msg = err.to_string();
    assert!(msg.contains("expected 130"), "message: {msg}");
    assert!(msg.contains("got 131"), "message: {msg}");
}

#[tokio::test]
async fn read_returns_exact_text_match() {
    let store = Arc::new(InMemoryCrudStore::default());
    let h = harness(store.clone());
    let emb = FakeEmbeddings::new(8);

    store
        .add_texts(
            vec![
                "Random text 7".to_string(),
                "Random text 123".to_string(),
                "Random text 99".to_string(),
            ],
            &emb,
        )
        .await
        .unwrap();

    h.read().await.unwrap();
}

#[tokio::test]
async fn read_fails_when_record_is_missing() {
    let store = Arc::new(InMemoryCrudStore::default());
    let h = harness(store.clone());
    let emb = FakeEmbeddings::new(8);

    store
        .add_texts(vec!["Random text 7".to_string()], &emb)
        .await
        .unwrap();

    let err = h.read().await.unwrap_err();
    assert!(matches!(err, AxonError::Assertion(_)));
}

#[tokio::test]
async fn update_is_a_noop() {
    let store = Arc::new(InMemoryCrudStore::default());
    let h = harness(store.clone());
    let emb = FakeEmbeddings::new(8);

    store
        .add_texts(vec!["Random text 1".to_string()], &emb)
        .await
        .unwrap();
    let before = store.count().await.unwrap();

    h.update().await.unwrap();

    assert_eq!(store.count().await.unwrap(), before);
}

#[tokio::test]
async fn delete_decrements_count_by_exactly_one() {
    let store = Arc::new(InMemoryCrudStore::default());
    let h = harness(store.clone());
    let emb = FakeEmbeddings::new(8);

    store
        .add_texts(
            vec!["Random text 1".to_string(), "Random text 2".to_string()],
            &emb,
        )
        .await
        .unwrap();

    // Inserts one extra document, deletes it, count ends where it started.
    h.delete().await.unwrap();

    assert_eq!(store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn cleanup_runs_even_when_a_phase_fails() {
    let store = Arc::new(InMemoryCrudStore {
        count_skew: 1,
        ..Default::default()
    });
    let h = harness(store.clone());

    let err = h.run().await.unwrap_err();
    assert!(matches!(err, AxonError::Assertion(_)));

    // The create phase inserted documents before failing its count check;
    // cleanup must still have dropped the collection.
    assert!(!store.exists().await.unwrap());
    assert_eq!(store.entries.lock().unwrap().len(), 0);
}

#[tokio::test]
async fn cleanup_is_safe_when_collection_was_never_created() {
    let store = Arc::new(InMemoryCrudStore::default());
    let h = harness(store.clone());

    h.cleanup().await.unwrap();
    assert!(!store.exists().await.unwrap());
}
