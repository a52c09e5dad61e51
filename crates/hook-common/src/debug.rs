//! Debug logging for hooks.
//!
//! Logs hook decisions to a JSONL file for debugging memory recall and save.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

const SUMMARY_MAX_CHARS: usize = 200;

/// Debug log entry for hook execution
#[derive(Debug, Serialize)]
pub struct HookDebugLog {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Hook name (e.g., "mem0-recall")
    pub hook_name: String,
    /// Event that triggered the hook
    pub event: String,
    /// Decision made (inject/skip/saved/error)
    pub decision: String,
    /// Reason for the decision
    pub reason: String,
    /// Additional context (truncated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl HookDebugLog {
    pub fn new(hook_name: &str, event: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            hook_name: hook_name.to_string(),
            event: event.to_string(),
            decision: String::new(),
            reason: String::new(),
            context: None,
        }
    }

    pub fn with_decision(mut self, decision: &str, reason: &str) -> Self {
        self.decision = decision.to_string();
        self.reason = reason.to_string();
        self
    }

    pub fn with_context(mut self, context: &str) -> Self {
        self.context = Some(truncate(context, SUMMARY_MAX_CHARS));
        self
    }

    /// Write log entry to file
    pub fn write(&self) -> std::io::Result<()> {
        if !is_debug_enabled() {
            return Ok(());
        }

        let log_path = debug_log_path();

        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let json = serde_json::to_string(self).unwrap_or_default();
        writeln!(file, "{}", json)?;

        Ok(())
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// Check if debug mode is enabled
pub fn is_debug_enabled() -> bool {
    if std::env::var("CLAUDE_HOOK_DEBUG").is_ok() {
        return true;
    }

    let project_dir = std::env::var("CLAUDE_PROJECT_DIR").unwrap_or_else(|_| ".".to_string());
    let marker = PathBuf::from(&project_dir)
        .join(".claude")
        .join(".hook-debug");
    marker.exists()
}

/// Get debug log file path
pub fn debug_log_path() -> PathBuf {
    let project_dir = std::env::var("CLAUDE_PROJECT_DIR").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(&project_dir)
        .join(".claude")
        .join("logs")
        .join("hook-debug.jsonl")
}

/// Quick helper to log a hook decision
pub fn log_decision(hook_name: &str, event: &str, decision: &str, reason: &str) {
    let log = HookDebugLog::new(hook_name, event).with_decision(decision, reason);

    if let Err(e) = log.write() {
        tracing::debug!(error = %e, "failed to write hook debug log");
    }
}
