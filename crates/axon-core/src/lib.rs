//! Core traits and types shared by all Axon crates.
//!
//! Vector store integrations implement [`VectorStore`], embedding providers
//! implement [`Embeddings`], and both exchange [`Document`]s. All fallible
//! operations return [`AxonError`].

mod document;
mod embeddings;
mod error;
mod vector_store;

pub use document::Document;
pub use embeddings::Embeddings;
pub use error::AxonError;
pub use vector_store::VectorStore;
