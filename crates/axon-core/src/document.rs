use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A piece of text with an identifier and arbitrary JSON metadata.
///
/// Stores accept documents with an empty `id` and assign one on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl Document {
    /// Create a document with empty metadata.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    /// Create a document carrying metadata.
    pub fn with_metadata(
        id: impl Into<String>,
        content: impl Into<String>,
        metadata: HashMap<String, Value>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata,
        }
    }
}
