use std::collections::HashMap;

use async_trait::async_trait;
use axon_core::{AxonError, Document, Embeddings, VectorStore};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

/// Environment variable holding the Weaviate endpoint URL.
pub const ENV_WEAVIATE_URL: &str = "WEAVIATE_URL";
/// Environment variable holding the Weaviate API key.
pub const ENV_WEAVIATE_API_KEY: &str = "WEAVIATE_API_KEY";

/// Configuration for [`WeaviateVectorStore`].
#[derive(Debug, Clone)]
pub struct WeaviateConfig {
    /// Base URL of the Weaviate instance, e.g. `https://my-cluster.weaviate.cloud`.
    pub url: String,
    /// API key used as a bearer token.
    pub api_key: String,
    /// Collection (Weaviate class) the documents live in.
    pub collection: String,
    /// Object property holding the document text.
    pub text_property: String,
}

impl WeaviateConfig {
    /// Create a new configuration targeting the given collection.
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            collection: collection.into(),
            text_property: "text".to_string(),
        }
    }

    /// Override the object property that holds the document text.
    pub fn with_text_property(mut self, property: impl Into<String>) -> Self {
        self.text_property = property.into();
        self
    }

    /// Build a configuration from `WEAVIATE_URL` and `WEAVIATE_API_KEY`.
    ///
    /// Fails with [`AxonError::Config`] naming the missing variable before
    /// any network activity takes place.
    pub fn from_env(collection: impl Into<String>) -> Result<Self, AxonError> {
        let url = require_env(ENV_WEAVIATE_URL)?;
        let api_key = require_env(ENV_WEAVIATE_API_KEY)?;
        Ok(Self::new(url, api_key, collection))
    }
}

fn require_env(name: &str) -> Result<String, AxonError> {
    std::env::var(name)
        .map_err(|_| AxonError::Config(format!("missing required environment variable: {name}")))
}

/// Weaviate-backed implementation of the [`VectorStore`] trait.
///
/// Documents are stored as objects of the configured class with the text in
/// a single property and the embedding as the object vector. The class is
/// created implicitly by Weaviate on first insert (auto-schema) and can be
/// dropped with [`drop_collection`](WeaviateVectorStore::drop_collection).
pub struct WeaviateVectorStore {
    config: WeaviateConfig,
    client: reqwest::Client,
}

/// Per-object entry in a `/v1/batch/objects` response.
#[derive(Debug, Deserialize)]
struct BatchEntry {
    #[serde(default)]
    result: Option<BatchEntryResult>,
}

#[derive(Debug, Deserialize)]
struct BatchEntryResult {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    errors: Option<Value>,
}

impl WeaviateVectorStore {
    /// Create a new `WeaviateVectorStore` from the given configuration.
    pub fn new(config: WeaviateConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// The configuration this store was built from.
    pub fn config(&self) -> &WeaviateConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{}", self.config.url.trim_end_matches('/'), path)
    }

    /// Execute a GraphQL query and return the response body.
    async fn graphql(&self, query: String) -> Result<Value, AxonError> {
        let resp = self
            .client
            .post(self.endpoint("graphql"))
            .bearer_auth(&self.config.api_key)
            .json(&json!({ "query": query }))
            .send()
            .await
            .map_err(|e| AxonError::VectorStore(format!("Weaviate GraphQL request failed: {e}")))?;

        let body: Value = resp
            .json()
            .await
            .map_err(|e| AxonError::VectorStore(format!("Weaviate GraphQL parse failed: {e}")))?;

        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            if let Some(first) = errors.first() {
                let message = first["message"].as_str().unwrap_or("unknown");
                return Err(AxonError::VectorStore(format!(
                    "Weaviate GraphQL error: {message}"
                )));
            }
        }

        Ok(body)
    }

    /// Total number of objects in the collection (server-side aggregation).
    pub async fn count(&self) -> Result<u64, AxonError> {
        let body = self.graphql(build_aggregate_query(&self.config.collection)).await?;
        body["data"]["Aggregate"][self.config.collection.as_str()][0]["meta"]["count"]
            .as_u64()
            .ok_or_else(|| AxonError::VectorStore("Weaviate: missing aggregate count".to_string()))
    }

    /// Whether the collection's class exists in the schema.
    pub async fn exists(&self) -> Result<bool, AxonError> {
        let resp = self
            .client
            .get(self.endpoint(&format!("schema/{}", self.config.collection)))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| AxonError::VectorStore(format!("Weaviate schema request failed: {e}")))?;
        Ok(resp.status().is_success())
    }

    /// Delete the collection's class and every object in it.
    pub async fn drop_collection(&self) -> Result<(), AxonError> {
        let resp = self
            .client
            .delete(self.endpoint(&format!("schema/{}", self.config.collection)))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| AxonError::VectorStore(format!("Weaviate schema delete failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AxonError::VectorStore(format!(
                "Weaviate schema delete failed with status {}",
                resp.status()
            )));
        }
        Ok(())
    }

    /// Hybrid search blending keyword (BM25) and vector similarity.
    ///
    /// `alpha` controls the balance:
    /// - `1.0` = pure vector similarity
    /// - `0.0` = pure keyword relevance
    pub async fn hybrid_search(
        &self,
        query: &str,
        k: usize,
        embeddings: &dyn Embeddings,
        alpha: f32,
    ) -> Result<Vec<(Document, f32)>, AxonError> {
        let query_vec = embeddings.embed_query(query).await?;
        let gql = build_hybrid_query(
            &self.config.collection,
            &self.config.text_property,
            query,
            &query_vec,
            alpha,
            k,
        )?;
        let body = self.graphql(gql).await?;

        let hits = body["data"]["Get"][self.config.collection.as_str()]
            .as_array()
            .cloned()
            .unwrap_or_default();

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            results.push(self.parse_hit(hit)?);
        }
        Ok(results)
    }

    fn parse_hit(&self, hit: Value) -> Result<(Document, f32), AxonError> {
        let obj = hit
            .as_object()
            .ok_or_else(|| AxonError::VectorStore("Weaviate: malformed search hit".to_string()))?;

        let content = obj
            .get(&self.config.text_property)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let additional = obj.get("_additional").cloned().unwrap_or(Value::Null);
        let id = additional["id"].as_str().unwrap_or_default().to_string();
        // Hybrid scores come back as strings in `_additional`.
        let score = match &additional["score"] {
            Value::String(s) => s.parse::<f32>().unwrap_or(0.0),
            Value::Number(n) => n.as_f64().unwrap_or(0.0) as f32,
            _ => 0.0,
        };

        let metadata: HashMap<String, Value> = obj
            .iter()
            .filter(|(key, _)| key.as_str() != self.config.text_property && *key != "_additional")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok((
            Document {
                id,
                content,
                metadata,
            },
            score,
        ))
    }
}

#[async_trait]
impl VectorStore for WeaviateVectorStore {
    async fn add_documents(
        &self,
        docs: Vec<Document>,
        embeddings: &dyn Embeddings,
    ) -> Result<Vec<String>, AxonError> {
        let texts: Vec<&str> = docs.iter().map(|d| d.content.as_str()).collect();
        let vectors = embeddings.embed_documents(&texts).await?;

        let mut ids = Vec::with_capacity(docs.len());
        let mut objects = Vec::with_capacity(docs.len());

        for (doc, vector) in docs.iter().zip(vectors) {
            // Auto-assign UUID if id is empty.
            let id = if doc.id.is_empty() {
                Uuid::new_v4().to_string()
            } else {
                doc.id.clone()
            };

            let mut properties = serde_json::Map::new();
            properties.insert(
                self.config.text_property.clone(),
                Value::String(doc.content.clone()),
            );
            for (key, value) in &doc.metadata {
                properties.insert(key.clone(), value.clone());
            }

            objects.push(json!({
                "class": self.config.collection,
                "id": id,
                "properties": properties,
                "vector": vector,
            }));
            ids.push(id);
        }

        let resp = self
            .client
            .post(self.endpoint("batch/objects"))
            .bearer_auth(&self.config.api_key)
            .json(&json!({ "objects": objects }))
            .send()
            .await
            .map_err(|e| AxonError::VectorStore(format!("Weaviate batch request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AxonError::VectorStore(format!(
                "Weaviate batch insert failed with status {}",
                resp.status()
            )));
        }

        let entries: Vec<BatchEntry> = resp
            .json()
            .await
            .map_err(|e| AxonError::VectorStore(format!("Weaviate batch parse failed: {e}")))?;

        for entry in &entries {
            if let Some(result) = &entry.result {
                let failed = result.status.as_deref() == Some("FAILED");
                if failed || result.errors.is_some() {
                    return Err(AxonError::VectorStore(format!(
                        "Weaviate batch insert rejected an object: {:?}",
                        result.errors
                    )));
                }
            }
        }

        Ok(ids)
    }

    async fn similarity_search(
        &self,
        query: &str,
        k: usize,
        embeddings: &dyn Embeddings,
    ) -> Result<Vec<Document>, AxonError> {
        let results = self
            .similarity_search_with_score(query, k, embeddings)
            .await?;
        Ok(results.into_iter().map(|(doc, _)| doc).collect())
    }

    async fn similarity_search_with_score(
        &self,
        query: &str,
        k: usize,
        embeddings: &dyn Embeddings,
    ) -> Result<Vec<(Document, f32)>, AxonError> {
        // alpha = 1.0 makes hybrid search equivalent to pure vector search.
        self.hybrid_search(query, k, embeddings, 1.0).await
    }

    async fn delete(&self, ids: &[&str]) -> Result<(), AxonError> {
        for id in ids {
            let resp = self
                .client
                .delete(self.endpoint(&format!("objects/{}/{id}", self.config.collection)))
                .bearer_auth(&self.config.api_key)
                .send()
                .await
                .map_err(|e| AxonError::VectorStore(format!("Weaviate delete failed: {e}")))?;

            if !resp.status().is_success() {
                return Err(AxonError::VectorStore(format!(
                    "Weaviate delete of object {id} failed with status {}",
                    resp.status()
                )));
            }
        }
        Ok(())
    }
}

/// Build the `Aggregate` GraphQL query for a total object count.
fn build_aggregate_query(class: &str) -> String {
    format!("{{ Aggregate {{ {class} {{ meta {{ count }} }} }} }}")
}

/// Build the `Get` GraphQL query with a `hybrid` clause.
fn build_hybrid_query(
    class: &str,
    text_property: &str,
    query: &str,
    query_vec: &[f32],
    alpha: f32,
    k: usize,
) -> Result<String, AxonError> {
    // GraphQL string literals share JSON's escaping rules.
    let query_literal = serde_json::to_string(query)
        .map_err(|e| AxonError::VectorStore(format!("query serialize error: {e}")))?;
    let vector_literal = serde_json::to_string(query_vec)
        .map_err(|e| AxonError::VectorStore(format!("vector serialize error: {e}")))?;

    Ok(format!(
        "{{ Get {{ {class}(limit: {k}, hybrid: {{ query: {query_literal}, vector: {vector_literal}, alpha: {alpha} }}) \
         {{ {text_property} _additional {{ id score }} }} }} }}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_query_shape() {
        let q = build_aggregate_query("TestCollection");
        assert_eq!(q, "{ Aggregate { TestCollection { meta { count } } } }");
    }

    #[test]
    fn hybrid_query_contains_clauses() {
        let q = build_hybrid_query("Docs", "text", "Random text 123", &[0.5, 0.25], 0.1, 4)
            .unwrap();
        assert!(q.contains("Get"));
        assert!(q.contains("Docs(limit: 4"));
        assert!(q.contains("query: \"Random text 123\""));
        assert!(q.contains("vector: [0.5,0.25]"));
        assert!(q.contains("alpha: 0.1"));
        assert!(q.contains("_additional { id score }"));
    }

    #[test]
    fn hybrid_query_escapes_quotes() {
        let q = build_hybrid_query("Docs", "text", "say \"hi\"", &[1.0], 0.5, 1).unwrap();
        assert!(q.contains(r#"query: "say \"hi\"""#));
    }
}
