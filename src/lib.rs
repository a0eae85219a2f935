//! # Folio
//!
//! Content indexer and gallery planner for a photography and film portfolio.
//! Your filesystem is the data source: photos are files, categories are
//! subdirectories or file-name prefixes, projects are folders, and optional
//! JSON sidecars override anything derived from names.
//!
//! # Architecture: Index, Then Plan
//!
//! ```text
//! 1. Index   content/         →  ContentItem / ProjectRecord / PhotoCategory
//! 2. Plan    ordered items    →  (item, span) placements
//! 3. Emit    both             →  manifest.json or CLI listing
//! ```
//!
//! Indexing reads the filesystem through an explicit [`ContentRepository`]
//! value; planning is a pure function of an item sequence and knows nothing
//! about files. A renderer consumes the placements and never reaches back
//! into the indexer.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`repository`] | The indexer: photos, categories, projects, galleries, next-project links |
//! | [`scan`] | Filesystem enumeration and cover lookup; no file contents are read |
//! | [`metadata`] | Typed JSON sidecars and their field-by-field merge |
//! | [`imaging`] | Header-only dimension probing behind the [`imaging::ImageBackend`] trait |
//! | [`cache`] | Per-repository memoization keyed by operation and arguments |
//! | [`layout`] | Orientation, span classes, bento and full-width strategies |
//! | [`manifest`] | One JSON document holding every planned record |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`types`] | Record types shared by every stage |
//! | [`naming`] | File-name conventions: ids, titles, numeric-aware order, prefixes |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## No Ambient State
//!
//! The content root and base path are injected once, at construction. Two
//! repositories over two roots never share results, and nothing reads
//! environment variables below the CLI.
//!
//! ## Memoize, Never Watch
//!
//! Each read operation is computed once per repository and returned as an
//! `Arc`, so a build that asks for the project list fifty times reads the
//! disk once. There is no change detection: a long-running process calls
//! [`ContentRepository::invalidate`] or builds a new repository.
//!
//! ## Header-Only Probing
//!
//! Image sizes come from file headers via the `image` crate; pixels are never
//! decoded. Videos are not probed at all and get a fixed 16:9 size. A file
//! that cannot be measured falls back to a default size with a warning, so a
//! single bad upload never takes the site down.
//!
//! ## Loud Metadata Errors
//!
//! A missing sidecar is normal. A sidecar that fails to parse is an authoring
//! bug, and the indexing call fails with
//! [`repository::IndexError::MalformedMetadata`] naming the file.

pub mod cache;
pub mod config;
pub mod imaging;
pub mod layout;
pub mod manifest;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod repository;
pub mod scan;
pub mod types;

pub use repository::{ContentRepository, IndexError};

#[cfg(test)]
pub(crate) mod test_helpers;
