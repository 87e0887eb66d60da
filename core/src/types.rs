//! Metadata entity and field failure taxonomy for command manuals.
//!
//! [`CommandMetadata`] is the central entity: one record per executable,
//! with six always-populated text fields. A field holds either real data
//! captured from the command itself or one of the fixed sentinel strings
//! below. The extractor guarantees no field is ever left unset, so two
//! documents generated for the same command are field-for-field comparable.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel when no version flag produced a zero exit.
pub const VERSION_UNAVAILABLE: &str =
    "Version information not available or command does not support version flags.";

/// Sentinel when the catalog has no canned invocation for a command.
pub const NO_EXAMPLE: &str = "No example available for this command.";

/// Sentinel when the canned example exceeded its time budget.
pub const EXAMPLE_TIMED_OUT: &str = "A command timed out.";

/// Sentinel when the completion query itself failed.
pub const RELATED_FAILED: &str = "Failed to fetch related commands using 'compgen -c'.";

/// Sentinel when completion succeeded but nothing besides the command itself matched.
pub const NO_RELATED: &str = "No related commands available";

/// Sentinel when the manual page lookup failed or had no SYNOPSIS section.
pub const SYNTAX_FAILED: &str = "Failed to fetch syntax commands.";

/// Sentinel when the help probe backing the documentation lookup failed.
pub const DOC_LINK_FAILED: &str = "Failed to fetch documentation commands.";

/// Sentinel when help output carries no usable documentation pointer.
pub const NO_DOC_LINK: &str = "No documentation for command available";

/// Canonical child-element order of a serialized manual document.
pub const FIELD_TAGS: [&str; 6] = [
    "Description",
    "Version",
    "Example",
    "Related",
    "Syntax",
    "DocumentationLink",
];

/// Extracted metadata for one executable.
///
/// Constructed fresh per extraction pass and never mutated afterwards.
/// Every field is populated: either captured output or a sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// Invocable name of the executable; unique key for persisted documents.
    pub name: String,
    /// First lines of `--help` output, or an error marker.
    pub description: String,
    /// First line of output from the first version flag that succeeded.
    pub version: String,
    /// Canned invocation plus its captured output, or an error/timeout marker.
    pub example: String,
    /// Newline-joined name-prefix matches from shell completion.
    pub related: String,
    /// SYNOPSIS block from the system manual page.
    pub syntax: String,
    /// Lines following the "Full documentation" marker in help output.
    pub documentation_link: String,
}

impl CommandMetadata {
    /// Returns the six `(tag, value)` pairs in canonical document order.
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("Description", self.description.as_str()),
            ("Version", self.version.as_str()),
            ("Example", self.example.as_str()),
            ("Related", self.related.as_str()),
            ("Syntax", self.syntax.as_str()),
            ("DocumentationLink", self.documentation_link.as_str()),
        ]
    }
}

/// How a single field extraction failed.
///
/// Field operations return these so callers (and tests) can branch on the
/// failure kind. The extractor's `extract()` boundary is where each variant
/// collapses into the field-specific sentinel string; nothing here escapes
/// past that boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The target executable could not be started at all.
    #[error("failed to launch: {0}")]
    Launch(String),

    /// The process ran but exited non-zero; stderr is the message payload.
    #[error("exited with failure status: {stderr}")]
    NonZeroExit { stderr: String },

    /// A bounded execution exceeded its budget.
    #[error("execution timed out")]
    TimedOut,

    /// Expected absence: no catalog entry, no version flag accepted, no marker found.
    #[error("nothing found")]
    LookupMiss,

    /// Anything the probe could not classify (I/O errors mid-capture and the like).
    #[error("{0}")]
    Unexpected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CommandMetadata {
        CommandMetadata {
            name: "ls".to_string(),
            description: "list directory contents".to_string(),
            version: "ls (GNU coreutils) 9.4".to_string(),
            example: "EXAMPLE for ls\n\tls -l\ntotal 0".to_string(),
            related: "lsblk\nlscpu".to_string(),
            syntax: "SYNOPSIS\n       ls [OPTION]... [FILE]...".to_string(),
            documentation_link: NO_DOC_LINK.to_string(),
        }
    }

    #[test]
    fn fields_follow_canonical_order() {
        let meta = sample();
        let tags: Vec<&str> = meta.fields().iter().map(|(tag, _)| *tag).collect();
        assert_eq!(tags, FIELD_TAGS);
    }

    #[test]
    fn fields_expose_current_values() {
        let meta = sample();
        let pairs = meta.fields();
        assert_eq!(pairs[1], ("Version", "ls (GNU coreutils) 9.4"));
        assert_eq!(pairs[5], ("DocumentationLink", NO_DOC_LINK));
    }

    #[test]
    fn metadata_round_trips_through_json() {
        let meta = sample();
        let json = serde_json::to_string(&meta).unwrap();
        let back: CommandMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meta);
    }
}
