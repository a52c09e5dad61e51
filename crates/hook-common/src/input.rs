//! Hook input parsing from stdin.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Read};

/// Hook payload received from Claude Code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HookInput {
    /// Hook event name (e.g., "UserPromptSubmit")
    #[serde(default)]
    pub hook_event_name: Option<String>,

    /// User prompt (for UserPromptSubmit hooks)
    #[serde(default)]
    pub user_prompt: Option<String>,

    /// Session ID
    #[serde(default)]
    pub session_id: Option<String>,

    /// Working directory of the session
    #[serde(default)]
    pub cwd: Option<String>,

    /// Additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl HookInput {
    /// Read and parse hook input from stdin.
    pub fn from_stdin() -> anyhow::Result<Self> {
        Self::from_reader(io::stdin().lock())
    }

    /// Read and parse hook input from any reader.
    pub fn from_reader(mut reader: impl Read) -> anyhow::Result<Self> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        let parsed: HookInput = serde_json::from_str(&input)?;
        Ok(parsed)
    }

    /// The user prompt, if present and non-empty.
    pub fn prompt(&self) -> Option<&str> {
        self.user_prompt.as_deref().filter(|p| !p.is_empty())
    }
}
