//! Static catalog configuration: canned example invocations and the
//! related-command recommendation table.
//!
//! The catalog is plain data injected into the extractor at construction,
//! so tests can substitute fixtures. [`Catalog::builtin`] carries the
//! default tables; [`Catalog::from_json_file`] loads an override.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Immutable lookup tables for example invocations and recommendations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Command name → canned shell invocation used for the Example field.
    #[serde(default)]
    pub examples: BTreeMap<String, String>,
    /// Command name → statically curated related commands.
    #[serde(default)]
    pub recommendations: BTreeMap<String, Vec<String>>,
}

impl Catalog {
    /// Returns an empty catalog; every example lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the built-in tables for the common coreutils set.
    pub fn builtin() -> Self {
        let examples = [
            ("touch", "touch example.txt"),
            ("ls", "ls -l"),
            ("cat", "cat file.txt"),
            ("echo", "echo 'Hello World'"),
            ("head", "head -n 1 /etc/passwd"),
            ("tail", "tail -n 1 /etc/passwd"),
            ("date", "date"),
            ("cut", "echo 'sample text' | cut -f1 -d ' '"),
            ("sed", "echo 'sample time' | sed 's/time/TIME/'"),
            ("tr", "echo 'hello' | tr 'lo' 'LO'"),
            ("pwd", "pwd"),
            ("wc", "echo 'hello world' | wc"),
            ("sort", "echo -e '3\\n1\\n2' | sort"),
        ]
        .into_iter()
        .map(|(name, invocation)| (name.to_string(), invocation.to_string()))
        .collect();

        let recommendations = [
            ("touch", &["mkdir", "rm", "nano"][..]),
            ("ls", &["cd", "pwd"]),
            ("cat", &["less", "head", "tail"]),
            ("echo", &["printf", "read"]),
            ("head", &["tail", "less", "more"]),
            ("tail", &["head", "less", "more"]),
            ("date", &["cal", "clock", "uptime"]),
            ("cut", &["awk", "grep", "sed"]),
            ("sed", &["awk", "grep", "tr"]),
            ("tr", &["sed", "awk", "grep"]),
            ("pwd", &["cd", "ls", "mkdir"]),
            ("wc", &["cat", "sort", "uniq"]),
            ("sort", &["uniq", "awk", "grep"]),
        ]
        .into_iter()
        .map(|(name, related)| {
            (
                name.to_string(),
                related.iter().map(|r| (*r).to_string()).collect(),
            )
        })
        .collect();

        Self {
            examples,
            recommendations,
        }
    }

    /// Loads a catalog from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Looks up the canned invocation for a command.
    pub fn example_for(&self, command: &str) -> Option<&str> {
        self.examples.get(command).map(String::as_str)
    }

    /// Looks up the curated related commands for a command.
    pub fn recommendations_for(&self, command: &str) -> Option<&[String]> {
        self.recommendations.get(command).map(Vec::as_slice)
    }
}
