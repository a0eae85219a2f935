//! Value records produced by the content indexer.
//!
//! None of these carry identity beyond their derivation key (file id or
//! project slug). They are rebuilt from the filesystem on every index call
//! and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Whether an asset is a still image or a video clip, decided by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// Image extensions, lowercase, without the dot.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// Video extensions, lowercase, without the dot.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "webm"];

impl MediaKind {
    /// Classify an extension (case-insensitive, no dot). `None` for anything
    /// outside the allowed media set.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Image)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

/// One photo or project-gallery asset.
///
/// `width` and `height` are always positive once indexing completes: probed
/// from the file header for images, a fixed resolution for video, and the
/// configured fallback whenever probing fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// File name with the extension stripped.
    pub id: String,
    /// Public URL of the asset, base path included.
    pub source_path: String,
    pub kind: MediaKind,
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub width: u32,
    pub height: u32,
    /// Category the item was filed under: its subdirectory, or its filename
    /// prefix for root-level files. `None` when neither applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Layout hint authored in a project's `meta.json`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryAspectRatio {
    #[default]
    Horizontal,
    Vertical,
    Square,
    Original,
}

/// A project folder under the projects root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    /// Folder name; unique within the projects root.
    pub slug: String,
    pub title: String,
    pub client: String,
    pub category: String,
    pub year: String,
    pub description: String,
    pub challenge: String,
    pub solution: String,
    pub services: Vec<String>,
    pub tools_used: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shot_on: Option<Vec<String>>,
    pub cover_image: String,
    pub cover_kind: MediaKind,
    pub gallery_aspect_ratio: GalleryAspectRatio,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
    /// Slug of the project to link to next, when the author pinned one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_project: Option<String>,
}

impl ProjectRecord {
    /// The leading integer of the year, used for ordering: `"2021-2022"`
    /// and `"2023 (ongoing)"` read as 2021 and 2023. `None` when the year
    /// does not start with digits.
    pub fn year_number(&self) -> Option<i32> {
        leading_integer(&self.year)
    }
}

fn leading_integer(text: &str) -> Option<i32> {
    let text = text.trim_start();
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse::<i32>().ok().map(|n| sign * n)
}

/// A facet over the photo collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoCategory {
    pub name: String,
    /// Lowercased name; the value accepted by the category filter.
    pub slug: String,
    pub count: usize,
}

impl PhotoCategory {
    pub const ALL_SLUG: &'static str = "all";

    /// The synthetic category spanning every photo.
    pub fn all(count: usize) -> Self {
        Self {
            name: "All".to_string(),
            slug: Self::ALL_SLUG.to_string(),
            count,
        }
    }
}
