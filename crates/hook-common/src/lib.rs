//! Common utilities for the mem0 Claude Code hooks.
//!
//! This crate provides shared functionality for every hook binary:
//! - JSON input/output over stdin/stdout
//! - Project `.env` loading
//! - Stderr logging setup
//! - Debug decision log

pub mod debug;
pub mod env;
pub mod input;
pub mod logging;
pub mod output;

pub use debug::{HookDebugLog, is_debug_enabled, log_decision};
pub use env::{ProjectEnv, load_project_env, project_env_path};
pub use input::HookInput;
pub use logging::init_tracing;
pub use output::{HookOutput, write_json};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::debug::{HookDebugLog, is_debug_enabled, log_decision};
    pub use crate::env::{ProjectEnv, load_project_env};
    pub use crate::input::HookInput;
    pub use crate::logging::init_tracing;
    pub use crate::output::{HookOutput, write_json};
    pub use anyhow::{Context, Result};
    pub use serde::{Deserialize, Serialize};
}
