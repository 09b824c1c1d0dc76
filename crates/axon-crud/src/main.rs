//! CRUD smoke test against a Weaviate collection.
//!
//! Required env vars:
//!   WEAVIATE_URL     — Weaviate cluster endpoint
//!   WEAVIATE_API_KEY — Weaviate API key
//!
//! Run:
//!   WEAVIATE_URL=https://cluster.weaviate.cloud \
//!   WEAVIATE_API_KEY=secret \
//!   cargo run -p axon-crud -- --weaviate_collection SmokeTest

use std::sync::Arc;

use axon_core::AxonError;
use axon_crud::{CrudHarness, EMBEDDING_DIM};
use axon_embeddings::FakeEmbeddings;
use axon_weaviate::{WeaviateConfig, WeaviateVectorStore};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Run CRUD operations against a Weaviate collection.
#[derive(Parser)]
#[command(name = "axon-crud")]
struct Args {
    /// The Weaviate collection to use.
    #[arg(long = "weaviate_collection")]
    weaviate_collection: String,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        tracing::error!("CRUD run failed: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), AxonError> {
    let config = WeaviateConfig::from_env(&args.weaviate_collection)?;
    let store = Arc::new(WeaviateVectorStore::new(config));
    let embeddings = Arc::new(FakeEmbeddings::new(EMBEDDING_DIM));
    let harness = CrudHarness::new(store, embeddings, &args.weaviate_collection);
    harness.run().await
}
