//! Hook output generation for stdout.

use serde::Serialize;
use std::io::{self, Write};

/// Output understood by the prompt pipeline.
///
/// `message` is merged into the conversation context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HookOutput {
    /// Whether the pipeline should keep going
    #[serde(rename = "continue")]
    pub continue_processing: bool,

    /// Context message to inject
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HookOutput {
    /// Let the pipeline proceed.
    pub fn proceed() -> Self {
        Self {
            continue_processing: true,
            message: None,
        }
    }

    /// Attach a context message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Write the output to stdout.
    pub fn write_stdout(&self) -> anyhow::Result<()> {
        write_json(self, false)
    }
}

/// Write any serializable value to stdout as a single JSON document.
pub fn write_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json)?;
    stdout.flush()?;
    Ok(())
}
