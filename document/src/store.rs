//! On-disk document storage, one file per command.
//!
//! The canonical document for a command lives at `<dir>/<command>.xml`;
//! reconciliation writes its second pass to `<dir>/<command>.check.xml`
//! so the canonical file is never clobbered by a verification run. Last
//! write for a command wins; execution is sequential so no locking is
//! needed.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use command_manual_core::CommandMetadata;

use crate::error::{DocumentError, Result};
use crate::xml::{ParsedDocument, deserialize, serialize};

/// Extension of the canonical per-command document.
pub const CANONICAL_EXTENSION: &str = "xml";

/// Extension of the verification document written by reconciliation.
pub const VERIFICATION_EXTENSION: &str = "check.xml";

/// Reads and writes manual documents under one directory.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    dir: PathBuf,
}

impl DocumentStore {
    /// Creates a store rooted at `dir`. The directory is created lazily on
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory documents are stored in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the canonical document for `command`.
    pub fn canonical_path(&self, command: &str) -> PathBuf {
        self.dir.join(format!("{command}.{CANONICAL_EXTENSION}"))
    }

    /// Path of the verification document for `command`.
    pub fn verification_path(&self, command: &str) -> PathBuf {
        self.dir.join(format!("{command}.{VERIFICATION_EXTENSION}"))
    }

    /// Serializes and writes the canonical document, returning its path.
    pub fn write_canonical(&self, metadata: &CommandMetadata) -> Result<PathBuf> {
        self.write(self.canonical_path(&metadata.name), metadata)
    }

    /// Serializes and writes the verification document, returning its path.
    pub fn write_verification(&self, metadata: &CommandMetadata) -> Result<PathBuf> {
        self.write(self.verification_path(&metadata.name), metadata)
    }

    /// Loads and parses the canonical document for `command`.
    ///
    /// A missing file is [`DocumentError::NotFound`], distinct from a file
    /// that exists but does not parse.
    pub fn load(&self, command: &str) -> Result<ParsedDocument> {
        let path = self.canonical_path(command);
        let text = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                DocumentError::NotFound(command.to_string())
            } else {
                DocumentError::Io(e)
            }
        })?;
        deserialize(&text)
    }

    fn write(&self, path: PathBuf, metadata: &CommandMetadata) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, serialize(metadata))?;
        debug!(command = %metadata.name, path = %path.display(), "wrote manual document");
        Ok(path)
    }
}
