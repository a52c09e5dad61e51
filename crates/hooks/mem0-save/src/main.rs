//! Manual save: store conversation messages in mem0.
//!
//! Usage:
//!   echo '{"messages": [...]}' | mem0-save
//!   mem0-save "message to save"
//!
//! Prints a JSON outcome. Exits 1 when the API key is missing or there is
//! nothing to save.

use anyhow::Result;
use clap::Parser;
use hook_common::prelude::*;
use hook_mem0::{Mem0Client, Mem0Config, MemoryApi, Message};
use serde_json::Value;
use std::io::{self, Read};
use std::process::ExitCode;

const HOOK_NAME: &str = "mem0-save";
const EVENT: &str = "manual";

const NOT_CONFIGURED: &str = "MEM0_API_KEY not configured";
const NO_MESSAGES_PROVIDED: &str = "No messages provided";
const NO_MESSAGES_TO_SAVE: &str = "No messages to save";

#[derive(Parser, Debug)]
#[command(
    name = "mem0-save",
    about = "Save messages to mem0 memory",
    disable_help_flag = true
)]
struct Cli {
    /// Text saved as a single user message; JSON is read from stdin when omitted
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    words: Vec<String>,
}

/// Result printed on stdout.
#[derive(Debug, Serialize, PartialEq)]
struct SaveOutcome {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl SaveOutcome {
    fn saved(result: Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();
    let env = load_project_env();

    let config = Mem0Config::from_lookup(|key| env.var(key));
    if !config.has_api_key() {
        return fail(NOT_CONFIGURED);
    }

    let messages = if cli.words.is_empty() {
        match messages_from_json(io::stdin().lock()) {
            Ok(messages) => messages,
            Err(reason) => return fail(reason),
        }
    } else {
        messages_from_args(&cli.words)
    };

    if messages.is_empty() {
        return fail(NO_MESSAGES_TO_SAVE);
    }

    let outcome = match Mem0Client::new(&config) {
        Ok(client) => save_memories(&client, &messages, &config),
        Err(e) => SaveOutcome::failed(e.to_string()),
    };

    let decision = if outcome.success { "saved" } else { "error" };
    let mut log = HookDebugLog::new(HOOK_NAME, EVENT)
        .with_decision(decision, &format!("{} messages", messages.len()));
    if let Some(error) = &outcome.error {
        log = log.with_context(error);
    }
    log.write().ok();

    write_json(&outcome, true)?;
    Ok(ExitCode::SUCCESS)
}

/// Print a failure outcome and exit with status 1.
fn fail(reason: &str) -> Result<ExitCode> {
    log_decision(HOOK_NAME, EVENT, "error", reason);
    write_json(&SaveOutcome::failed(reason), false)?;
    Ok(ExitCode::FAILURE)
}

/// Join command-line words into one user message.
fn messages_from_args(words: &[String]) -> Vec<Message> {
    vec![Message::user(words.join(" "))]
}

/// Read messages from a JSON document: `{"messages": [...]}` or a bare list.
///
/// Other JSON shapes carry no messages. Unparsable input is an error.
fn messages_from_json(mut reader: impl Read) -> Result<Vec<Message>, &'static str> {
    let mut input = String::new();
    reader
        .read_to_string(&mut input)
        .map_err(|_| NO_MESSAGES_PROVIDED)?;

    let value: Value = serde_json::from_str(&input).map_err(|_| NO_MESSAGES_PROVIDED)?;
    let list = match value {
        Value::Object(mut map) => map.remove("messages").unwrap_or(Value::Null),
        list @ Value::Array(_) => list,
        _ => Value::Null,
    };

    if list.is_null() {
        return Ok(Vec::new());
    }

    serde_json::from_value(list).map_err(|e| {
        tracing::debug!(error = %e, "invalid message list");
        NO_MESSAGES_PROVIDED
    })
}

/// Forward messages to mem0, folding any failure into the outcome.
fn save_memories(api: &impl MemoryApi, messages: &[Message], config: &Mem0Config) -> SaveOutcome {
    match api.add(messages, &config.user_id) {
        Ok(result) => SaveOutcome::saved(result),
        Err(e) => {
            tracing::debug!(error = %e, "mem0 add failed");
            SaveOutcome::failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hook_mem0::{Mem0Error, MemoryRecord};
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeApi {
        fail: bool,
        added: RefCell<Vec<(Vec<Message>, String)>>,
    }

    impl MemoryApi for FakeApi {
        fn add(&self, messages: &[Message], user_id: &str) -> Result<Value, Mem0Error> {
            self.added
                .borrow_mut()
                .push((messages.to_vec(), user_id.to_string()));
            if self.fail {
                return Err(Mem0Error::Api {
                    status: 401,
                    body: "Invalid API key".to_string(),
                });
            }
            Ok(json!([{"id": "m1", "event": "ADD", "memory": "likes coffee"}]))
        }

        fn search(
            &self,
            _query: &str,
            _user_id: &str,
            _top_k: usize,
            _threshold: f64,
        ) -> Result<Vec<MemoryRecord>, Mem0Error> {
            unreachable!("save never searches")
        }
    }

    #[test]
    fn test_args_become_one_user_message() {
        let words = vec!["hello".to_string(), "world".to_string()];
        let messages = messages_from_args(&words);
        assert_eq!(
            serde_json::to_value(&messages).unwrap(),
            json!([{"role": "user", "content": "hello world"}])
        );
    }

    #[test]
    fn test_cli_collects_words() {
        let cli = Cli::try_parse_from(["mem0-save", "prefers", "-v", "flags"]).unwrap();
        assert_eq!(cli.words, ["prefers", "-v", "flags"]);

        let cli = Cli::try_parse_from(["mem0-save"]).unwrap();
        assert!(cli.words.is_empty());
    }

    #[test]
    fn test_cli_leading_dash_words_are_content() {
        let cli = Cli::try_parse_from(["mem0-save", "-h", "is", "my", "shortcut"]).unwrap();
        assert_eq!(
            messages_from_args(&cli.words),
            vec![Message::user("-h is my shortcut")]
        );

        let cli = Cli::try_parse_from(["mem0-save", "--help", "me", "remember"]).unwrap();
        assert_eq!(cli.words, ["--help", "me", "remember"]);
    }

    #[test]
    fn test_json_messages_object() {
        let input = r#"{"messages": [{"role": "user", "content": "I like tea"}, {"role": "assistant", "content": "Noted"}]}"#;
        let messages = messages_from_json(input.as_bytes()).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1], Message::new("assistant", "Noted"));
    }

    #[test]
    fn test_json_bare_list() {
        let input = r#"[{"role": "user", "content": "I like tea"}]"#;
        let messages = messages_from_json(input.as_bytes()).unwrap();
        assert_eq!(messages, vec![Message::user("I like tea")]);
    }

    #[test]
    fn test_json_without_messages_is_empty() {
        assert!(messages_from_json(r#"{"text": "hi"}"#.as_bytes()).unwrap().is_empty());
        assert!(messages_from_json(r#"{"messages": null}"#.as_bytes()).unwrap().is_empty());
        assert!(messages_from_json(r#""just a string""#.as_bytes()).unwrap().is_empty());
        assert!(messages_from_json("[]".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_json_unparsable_is_error() {
        assert_eq!(messages_from_json("".as_bytes()), Err(NO_MESSAGES_PROVIDED));
        assert_eq!(messages_from_json("{oops".as_bytes()), Err(NO_MESSAGES_PROVIDED));
        assert_eq!(
            messages_from_json(r#"{"messages": [{"role": "user"}]}"#.as_bytes()),
            Err(NO_MESSAGES_PROVIDED)
        );
    }

    #[test]
    fn test_save_success() {
        let api = FakeApi::default();
        let config = Mem0Config {
            user_id: "alice".to_string(),
            ..Mem0Config::default()
        };

        let outcome = save_memories(&api, &[Message::user("likes coffee")], &config);
        assert!(outcome.success);
        assert_eq!(outcome.result.unwrap()[0]["event"], "ADD");

        let added = api.added.borrow();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].1, "alice");
    }

    #[test]
    fn test_save_failure_reported() {
        let api = FakeApi {
            fail: true,
            ..FakeApi::default()
        };
        let outcome = save_memories(&api, &[Message::user("x")], &Mem0Config::default());
        assert_eq!(
            outcome,
            SaveOutcome::failed("mem0 API error 401: Invalid API key")
        );
    }

    #[test]
    fn test_failure_json_shape() {
        let json = serde_json::to_value(SaveOutcome::failed(NOT_CONFIGURED)).unwrap();
        assert_eq!(json, json!({"success": false, "error": "MEM0_API_KEY not configured"}));
    }
}
