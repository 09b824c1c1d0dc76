use thiserror::Error;

/// Errors produced by Axon crates.
#[derive(Debug, Error)]
pub enum AxonError {
    /// Required configuration is missing or invalid. Raised before any
    /// network activity takes place.
    #[error("configuration error: {0}")]
    Config(String),

    /// An embeddings provider failed.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// A vector store operation failed.
    #[error("vector store error: {0}")]
    VectorStore(String),

    /// A post-condition check on store contents failed.
    #[error("assertion failed: {0}")]
    Assertion(String),
}
