//! UserPromptSubmit hook: Recall relevant memories from mem0.
//!
//! Searches the user's mem0 memories with the submitted prompt and injects
//! matches into the conversation context. Any failure degrades to a silent
//! pass so the prompt pipeline is never interrupted.

use anyhow::Result;
use hook_common::prelude::*;
use hook_mem0::{Mem0Client, Mem0Config, MemoryApi, MemoryRecord};

const HOOK_NAME: &str = "mem0-recall";
const EVENT: &str = "UserPromptSubmit";
const HEADER: &str = "## Relevant memories from previous conversations:";

fn main() -> Result<()> {
    init_tracing();
    let env = load_project_env();

    let input = match HookInput::from_stdin() {
        Ok(input) => input,
        Err(e) => {
            tracing::debug!(error = %e, "unreadable hook input");
            return Ok(());
        }
    };

    let Some(prompt) = input.prompt() else {
        return Ok(());
    };

    let config = Mem0Config::from_lookup(|key| env.var(key));
    if !config.has_api_key() {
        log_decision(HOOK_NAME, EVENT, "skip", "MEM0_API_KEY not configured");
        return Ok(());
    }

    let memories = match Mem0Client::new(&config) {
        Ok(client) => search_memories(&client, prompt, &config),
        Err(e) => {
            tracing::warn!("mem0 search error: {}", e);
            Vec::new()
        }
    };

    let Some(context) = format_memories_for_context(&memories) else {
        log_decision(HOOK_NAME, EVENT, "skip", "no memories matched");
        return Ok(());
    };

    HookDebugLog::new(HOOK_NAME, EVENT)
        .with_decision("inject", &format!("{} memories matched", memories.len()))
        .with_context(&context)
        .write()
        .ok();

    HookOutput::proceed().with_message(context).write_stdout()?;

    Ok(())
}

/// Search memories for the prompt; remote errors count as no results.
fn search_memories(api: &impl MemoryApi, prompt: &str, config: &Mem0Config) -> Vec<MemoryRecord> {
    match api.search(prompt, &config.user_id, config.top_k, config.threshold) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("mem0 search error: {}", e);
            Vec::new()
        }
    }
}

/// Render memories as a markdown bullet list, `None` when nothing to show.
fn format_memories_for_context(memories: &[MemoryRecord]) -> Option<String> {
    let lines: Vec<String> = memories
        .iter()
        .filter_map(|record| {
            let text = record.text()?;
            let categories = record.category_list();
            if categories.is_empty() {
                Some(format!("- {}", text))
            } else {
                Some(format!("- [{}] {}", categories.join(", "), text))
            }
        })
        .collect();

    if lines.is_empty() {
        return None;
    }

    Some(format!("{}\n{}", HEADER, lines.join("\n")))
}
