//! Drift detection between two generated manual documents.
//!
//! Reconciliation extracts a command's metadata twice, serializes both
//! passes, persists the canonical and verification documents, and diffs
//! them line by line. The two passes re-invoke live system state (shell
//! completion, manual pages, the command itself), so they may legitimately
//! differ even when nothing in this codebase changed: the engine reports
//! the delta, it does not judge correctness.
//!
//! Classification is strict: the pair is [`Reconciliation::Equal`] iff the
//! delta is empty; a whitespace-only change still counts as different.

use similar::{ChangeTag, TextDiff};
use tracing::{debug, info};

use command_manual_document::{DocumentStore, Result, serialize};
use command_manual_extract::MetadataExtractor;

/// Direction of one changed line in the delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaKind {
    /// Present only in the verification document.
    Added,
    /// Present only in the canonical document.
    Removed,
}

/// One changed line, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaLine {
    pub kind: DeltaKind,
    /// The line text without its trailing newline.
    pub text: String,
}

impl std::fmt::Display for DeltaLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = match self.kind {
            DeltaKind::Added => '+',
            DeltaKind::Removed => '-',
        };
        write!(f, "{sign}{}", self.text)
    }
}

/// Outcome of comparing two documents for the same command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// The documents are byte-for-byte line-equal.
    Equal,
    /// The documents diverge; every changed line is listed in order.
    Different { delta: Vec<DeltaLine> },
}

impl Reconciliation {
    /// True for [`Reconciliation::Equal`].
    pub fn is_equal(&self) -> bool {
        matches!(self, Reconciliation::Equal)
    }
}

/// Diffs two serialized documents line by line, context-free.
pub fn diff_documents(canonical: &str, verification: &str) -> Reconciliation {
    let diff = TextDiff::from_lines(canonical, verification);
    let mut delta = Vec::new();
    for change in diff.iter_all_changes() {
        let kind = match change.tag() {
            ChangeTag::Equal => continue,
            ChangeTag::Insert => DeltaKind::Added,
            ChangeTag::Delete => DeltaKind::Removed,
        };
        delta.push(DeltaLine {
            kind,
            text: change.value().trim_end_matches('\n').to_string(),
        });
    }

    if delta.is_empty() {
        Reconciliation::Equal
    } else {
        Reconciliation::Different { delta }
    }
}

/// Runs two extraction passes for a command and reports their divergence.
pub struct ReconciliationEngine {
    extractor: MetadataExtractor,
    store: DocumentStore,
}

impl ReconciliationEngine {
    pub fn new(extractor: MetadataExtractor, store: DocumentStore) -> Self {
        Self { extractor, store }
    }

    /// Extracts `command` twice, persists both documents, and diffs them.
    ///
    /// The first pass becomes the canonical `<command>.xml`, the second the
    /// verification `<command>.check.xml`; the verification extension keeps
    /// the canonical file intact for later display.
    pub fn reconcile(&self, command: &str) -> Result<Reconciliation> {
        debug!(command, "first extraction pass");
        let first = self.extractor.extract(command);
        debug!(command, "second extraction pass");
        let second = self.extractor.extract(command);

        let canonical = serialize(&first);
        let verification = serialize(&second);
        self.store.write_canonical(&first)?;
        self.store.write_verification(&second)?;

        let outcome = diff_documents(&canonical, &verification);
        info!(command, equal = outcome.is_equal(), "reconciled manual");
        Ok(outcome)
    }
}
