//! CRUD smoke-test harness for a Weaviate-backed vector store.
//!
//! The harness drives four sequential phases — create, read, update,
//! delete — against a collection it owns for the duration of the run, and
//! always tears the collection down afterwards, whether the phases passed
//! or not.
//!
//! The phases operate through the [`CrudStore`] trait so they can be
//! exercised against an in-memory double in tests; in production the
//! store is [`WeaviateVectorStore`](axon_weaviate::WeaviateVectorStore).

mod harness;
mod store;

pub use harness::{CrudHarness, DEFAULT_BATCH_SIZE, DEFAULT_TARGET_COUNT, EMBEDDING_DIM};
pub use store::CrudStore;
