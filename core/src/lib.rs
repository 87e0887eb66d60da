//! Core types for command manual generation.
//!
//! This crate defines the foundational types shared by the extraction,
//! document, and reconciliation crates:
//!
//! - [`CommandMetadata`] — one manual record per executable: six text fields,
//!   each always populated with captured output or a fixed sentinel.
//! - [`FieldError`] — the per-field failure taxonomy (launch failure,
//!   non-zero exit, timeout, lookup miss).
//! - [`Catalog`] — injectable configuration: canned example invocations and
//!   the static related-command recommendation table.
//! - The sentinel string constants shared between the extractor and tests.
//!
//! # Example
//!
//! ```
//! use command_manual_core::{Catalog, CommandMetadata, NO_DOC_LINK};
//!
//! let catalog = Catalog::builtin();
//! assert!(catalog.example_for("sort").is_some());
//!
//! let meta = CommandMetadata {
//!     name: "pwd".into(),
//!     description: "print working directory".into(),
//!     version: "pwd (GNU coreutils) 9.4".into(),
//!     example: "EXAMPLE for pwd\n\tpwd\n/home".into(),
//!     related: "pwd\npwdx".into(),
//!     syntax: "SYNOPSIS\n       pwd [OPTION]...".into(),
//!     documentation_link: NO_DOC_LINK.into(),
//! };
//! assert_eq!(meta.fields()[0].0, "Description");
//! ```

mod catalog;
mod types;

pub use catalog::{Catalog, CatalogError};
pub use types::*;
