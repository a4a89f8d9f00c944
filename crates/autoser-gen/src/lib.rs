#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
//! Build-time generator for `autoser`.
//!
//! Scans a crate's sources for structs annotated with
//! `#[autoser::auto_serialize]` and emits one fragment per struct holding its
//! `Serializable` impl and, unless disabled, `PartialEq`, `DynEq` and `Hash`
//! impls over the same fields. Use [`build::generate`] from a build script or
//! the `autoser-gen` binary to check generated files into the tree.

pub mod build;
pub mod generator;
pub mod ui;
pub mod utils;
