//! Weaviate vector store integration for Axon.
//!
//! This crate provides [`WeaviateVectorStore`], an implementation of the
//! [`VectorStore`](axon_core::VectorStore) trait backed by
//! [Weaviate](https://weaviate.io/) using its REST and GraphQL APIs.
//!
//! # Example
//!
//! ```rust,no_run
//! use axon_weaviate::{WeaviateVectorStore, WeaviateConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WeaviateConfig::from_env("MyCollection")?;
//! let store = WeaviateVectorStore::new(config);
//! let total = store.count().await?;
//! # Ok(())
//! # }
//! ```

mod vector_store;

pub use vector_store::{WeaviateConfig, WeaviateVectorStore};

// Re-export core traits for convenience.
pub use axon_core::{Document, Embeddings, VectorStore};
