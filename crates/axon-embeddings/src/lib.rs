mod fake;

pub use fake::FakeEmbeddings;

// Re-export the Embeddings trait from core (forward-declared there).
pub use axon_core::Embeddings;
