//! Executable probing and manual metadata extraction.
//!
//! This crate derives the six manual fields for an installed command by
//! invoking it with standard introspection flags:
//!
//! - [`Probe`] — runs a target executable (directly or through a shell),
//!   captures stdout/stderr/exit status, and enforces a timeout where one
//!   is specified. Non-zero exits are data, not errors.
//! - [`MetadataExtractor`] — one operation per field, each with its own
//!   fallback chain and sentinel rendering. [`MetadataExtractor::extract`]
//!   always yields a fully populated [`CommandMetadata`]; no failure of an
//!   external command escapes it.
//! - [`read_command_list`] — reads the newline-delimited input file naming
//!   the commands to process.
//!
//! # Example
//!
//! ```no_run
//! use command_manual_core::Catalog;
//! use command_manual_extract::MetadataExtractor;
//!
//! let extractor = MetadataExtractor::new(Catalog::builtin());
//! let meta = extractor.extract("sort");
//! println!("{}", meta.description);
//! ```
//!
//! [`CommandMetadata`]: command_manual_core::CommandMetadata

pub mod extractor;
pub mod list;
pub mod probe;

pub use extractor::{
    DESCRIPTION_LINE_LIMIT, EXAMPLE_TIMEOUT, ExampleRun, MetadataExtractor, VERSION_FLAGS,
};
pub use list::read_command_list;
pub use probe::{Probe, ProbeOutcome, ProbeOutput};
