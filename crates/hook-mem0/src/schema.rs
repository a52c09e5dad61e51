//! Wire schema for the mem0 memory API.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A conversation message forwarded to mem0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Speaker role ("user", "assistant", ...)
    pub role: String,

    /// Message text
    pub content: String,

    /// Additional fields, forwarded unchanged
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            extra: HashMap::new(),
        }
    }

    /// A message spoken by the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

/// A memory returned by search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Memory text
    #[serde(default)]
    pub memory: Option<String>,

    /// Category tags
    #[serde(default)]
    pub categories: Option<Vec<String>>,

    /// Additional fields (id, score, metadata, ...)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl MemoryRecord {
    pub fn new(memory: impl Into<String>) -> Self {
        Self {
            memory: Some(memory.into()),
            ..Self::default()
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    /// Memory text, if non-empty.
    pub fn text(&self) -> Option<&str> {
        self.memory.as_deref().filter(|m| !m.is_empty())
    }

    /// Category tags, empty when absent.
    pub fn category_list(&self) -> &[String] {
        self.categories.as_deref().unwrap_or(&[])
    }
}

/// Search response in any of the shapes the API returns.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SearchResponse {
    /// Bare list of records
    List(Vec<MemoryRecord>),
    /// Object wrapping the records in `results`
    Wrapped {
        #[serde(default)]
        results: Vec<MemoryRecord>,
    },
    /// Anything else
    Other(serde_json::Value),
}

impl SearchResponse {
    /// Records carried by the response; unknown shapes yield none.
    pub fn into_records(self) -> Vec<MemoryRecord> {
        match self {
            SearchResponse::List(records) => records,
            SearchResponse::Wrapped { results } => results,
            SearchResponse::Other(_) => Vec::new(),
        }
    }
}

/// Body of an add request.
#[derive(Debug, Clone, Serialize)]
pub struct AddRequest<'a> {
    pub messages: &'a [Message],
    pub user_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<&'a str>,
}

/// Filters applied to a search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchFilters<'a> {
    pub user_id: &'a str,
}

/// Body of a search request.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub filters: SearchFilters<'a>,
    pub top_k: usize,
    pub threshold: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<&'a str>,
}
