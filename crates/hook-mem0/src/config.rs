//! mem0 configuration from environment variables.

use std::str::FromStr;

/// Default hosted API endpoint.
pub const DEFAULT_HOST: &str = "https://api.mem0.ai";

/// Default user scope for memories.
pub const DEFAULT_USER_ID: &str = "claude-code-user";

/// Default number of memories to retrieve.
pub const DEFAULT_TOP_K: usize = 5;

/// Default minimum similarity score.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Settings for one hook invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Mem0Config {
    /// API key (empty when not configured)
    pub api_key: String,
    /// User scope for add and search
    pub user_id: String,
    /// Maximum search results
    pub top_k: usize,
    /// Minimum similarity for search results
    pub threshold: f64,
    /// API base URL
    pub host: String,
    /// Organization scope
    pub org_id: Option<String>,
    /// Project scope
    pub project_id: Option<String>,
}

impl Default for Mem0Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            user_id: DEFAULT_USER_ID.to_string(),
            top_k: DEFAULT_TOP_K,
            threshold: DEFAULT_THRESHOLD,
            host: DEFAULT_HOST.to_string(),
            org_id: None,
            project_id: None,
        }
    }
}

impl Mem0Config {
    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unset variables take their defaults. Empty `MEM0_USER_ID` and
    /// `MEM0_HOST` are kept as-is; unparsable numbers fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            api_key: lookup("MEM0_API_KEY").unwrap_or_default(),
            user_id: lookup("MEM0_USER_ID").unwrap_or(defaults.user_id),
            top_k: parse_or("MEM0_TOP_K", lookup("MEM0_TOP_K"), defaults.top_k),
            threshold: parse_or("MEM0_THRESHOLD", lookup("MEM0_THRESHOLD"), defaults.threshold),
            host: lookup("MEM0_HOST")
                .map(|h| h.trim_end_matches('/').to_string())
                .unwrap_or(defaults.host),
            org_id: lookup("MEM0_ORG_ID").filter(|v| !v.is_empty()),
            project_id: lookup("MEM0_PROJECT_ID").filter(|v| !v.is_empty()),
        }
    }

    /// Whether an API key is available.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

fn parse_or<T: FromStr + Copy>(name: &str, raw: Option<String>, default: T) -> T {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(variable = name, value = %raw, "invalid number, using default");
            default
        }
    }
}
