//! Manual document serialization and storage.
//!
//! This crate turns a [`CommandMetadata`] record into its persisted XML
//! document and back:
//!
//! - [`serialize`] / [`deserialize`] — deterministic rendering of the
//!   `<Command>` tree and parsing of both the canonical six-field form and
//!   the legacy four-field form.
//! - [`DocumentStore`] — per-command files in a configurable directory,
//!   with the canonical/verification split used by reconciliation.
//! - [`DocumentError`] — keeps "file absent" distinct from "file present
//!   but malformed".
//!
//! # Example
//!
//! ```
//! use command_manual_core::CommandMetadata;
//! use command_manual_document::{deserialize, serialize};
//!
//! let meta = CommandMetadata {
//!     name: "pwd".into(),
//!     description: "print working directory".into(),
//!     version: "9.4".into(),
//!     example: "EXAMPLE for pwd\n\tpwd\n/home".into(),
//!     related: "pwdx".into(),
//!     syntax: "SYNOPSIS\n       pwd".into(),
//!     documentation_link: "No documentation for command available".into(),
//! };
//!
//! let text = serialize(&meta);
//! assert_eq!(deserialize(&text).unwrap().metadata, meta);
//! ```
//!
//! [`CommandMetadata`]: command_manual_core::CommandMetadata

mod error;
mod store;
mod xml;

pub use error::{DocumentError, Result};
pub use store::{CANONICAL_EXTENSION, DocumentStore, VERIFICATION_EXTENSION};
pub use xml::{DocumentSchema, ParsedDocument, deserialize, serialize};
