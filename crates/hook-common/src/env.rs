//! Project `.env` loading.
//!
//! Values from `$CLAUDE_PROJECT_DIR/.env` only fill in variables that are
//! not already present in the process environment. Nothing is written back
//! to the environment; callers read through [`ProjectEnv::var`].

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::env;
use std::fs;

/// Path of the project `.env` file, if `CLAUDE_PROJECT_DIR` is set.
pub fn project_env_path() -> Option<Utf8PathBuf> {
    let project_dir = env::var("CLAUDE_PROJECT_DIR").ok()?;
    if project_dir.is_empty() {
        return None;
    }
    Some(Utf8PathBuf::from(project_dir).join(".env"))
}

/// Process environment layered over project `.env` defaults.
#[derive(Debug, Clone, Default)]
pub struct ProjectEnv {
    defaults: Vec<(String, String)>,
}

impl ProjectEnv {
    /// Build from already-parsed defaults.
    pub fn from_defaults(defaults: Vec<(String, String)>) -> Self {
        Self { defaults }
    }

    /// Look up a variable: process environment first, then `.env`.
    pub fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok().or_else(|| self.default_for(key))
    }

    /// Value supplied by the `.env` file, ignoring the process environment.
    pub fn default_for(&self, key: &str) -> Option<String> {
        self.defaults
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// Number of variables the `.env` file supplied.
    pub fn len(&self) -> usize {
        self.defaults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defaults.is_empty()
    }
}

/// Load the project `.env`. A missing or unreadable file is never fatal.
pub fn load_project_env() -> ProjectEnv {
    let Some(path) = project_env_path() else {
        return ProjectEnv::default();
    };
    if !path.exists() {
        return ProjectEnv::default();
    }

    match env_defaults(&path, |key| env::var_os(key).is_some()) {
        Ok(defaults) => {
            tracing::debug!(path = %path, count = defaults.len(), "loaded project env");
            ProjectEnv::from_defaults(defaults)
        }
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "ignoring unreadable .env");
            ProjectEnv::default()
        }
    }
}

/// Read `KEY=VALUE` pairs from `path`, dropping keys for which `is_set`
/// returns true.
pub fn env_defaults(
    path: &Utf8Path,
    is_set: impl Fn(&str) -> bool,
) -> Result<Vec<(String, String)>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read env file: {}", path))?;
    Ok(parse_env(&contents, is_set))
}

/// Parse `.env` text.
///
/// Each line is trimmed; blank lines, `#` comments and lines without `=`
/// are skipped. The first `=` splits key from value, both trimmed, and the
/// value is otherwise taken literally. The first occurrence of a key wins.
pub fn parse_env(contents: &str, is_set: impl Fn(&str) -> bool) -> Vec<(String, String)> {
    let mut defaults: Vec<(String, String)> = Vec::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() || is_set(key) || defaults.iter().any(|(k, _)| k == key) {
            continue;
        }
        defaults.push((key.to_string(), value.trim().to_string()));
    }

    defaults
}
