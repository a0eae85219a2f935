//! Shared test utilities for the folio test suite.
//!
//! Builds content trees in temp directories with real image headers, so
//! the production [`RustBackend`](crate::imaging::RustBackend) can probe
//! them, plus lookup helpers for indexed records.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = content_root();
//! photo(tmp.path(), "nature1.png", 40, 60);
//! project(tmp.path(), "brand-film", Some(r#"{"year": "2021"}"#));
//!
//! let repo = repository(tmp.path());
//! let photos = repo.list_photos(None).unwrap();
//! assert_eq!(ids(&photos), vec!["nature1"]);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::SiteConfig;
use crate::repository::ContentRepository;
use crate::types::{ContentItem, ProjectRecord};

// =========================================================================
// Fixture setup
// =========================================================================

/// An empty content root in a fresh temp directory.
pub fn content_root() -> TempDir {
    TempDir::new().unwrap()
}

/// Write a real PNG of the given size.
pub fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    image::RgbImage::new(width, height).save(path).unwrap();
}

/// Write a placeholder file whose contents are irrelevant (videos, covers,
/// files the test expects to fail probing).
pub fn write_stub(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"stub").unwrap();
}

/// Add a photo under `<root>/photos/<rel>`. PNG content is real; the file
/// name may carry any allowed extension since probing reads the header.
pub fn photo(root: &Path, rel: &str, width: u32, height: u32) -> PathBuf {
    let path = root.join("photos").join(rel);
    write_png(&path, width, height);
    path
}

/// Create a project folder, optionally with a `meta.json`.
pub fn project(root: &Path, slug: &str, meta: Option<&str>) -> PathBuf {
    let dir = root.join("projects").join(slug);
    fs::create_dir_all(&dir).unwrap();
    if let Some(json) = meta {
        fs::write(dir.join("meta.json"), json).unwrap();
    }
    dir
}

/// Repository over `root` with stock configuration.
pub fn repository(root: &Path) -> ContentRepository {
    ContentRepository::new(root, SiteConfig::default())
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// Item ids in order.
pub fn ids(items: &[ContentItem]) -> Vec<&str> {
    items.iter().map(|i| i.id.as_str()).collect()
}

/// Project slugs in order.
pub fn slugs(projects: &[ProjectRecord]) -> Vec<&str> {
    projects.iter().map(|p| p.slug.as_str()).collect()
}

/// Find an item by id. Panics if not found.
pub fn find_item<'a>(items: &'a [ContentItem], id: &str) -> &'a ContentItem {
    items.iter().find(|i| i.id == id).unwrap_or_else(|| {
        panic!("item '{id}' not found. Available: {:?}", ids(items))
    })
}
