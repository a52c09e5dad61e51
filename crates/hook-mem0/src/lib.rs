//! mem0 memory service for Claude Code hooks.
//!
//! Provides:
//! - Configuration from the environment
//! - Wire schema for messages and search results
//! - Blocking HTTP client behind the `MemoryApi` trait

pub mod client;
pub mod config;
pub mod schema;

pub use client::{Mem0Client, Mem0Error, MemoryApi};
pub use config::Mem0Config;
pub use schema::{MemoryRecord, Message, SearchResponse};
