//! Sidecar metadata: optional JSON files that override derived fields.
//!
//! ## Photo sidecars
//!
//! `content/photos/travel/rome-01.jpg` may be accompanied by
//! `content/photos/travel/rome-01.json`:
//!
//! ```json
//! { "title": "Rome at dusk", "location": "Rome, Italy", "date": "2023-10" }
//! ```
//!
//! ## Project sidecars
//!
//! Each project folder may hold a `meta.json` using the camelCase keys of
//! [`ProjectMetadata`].
//!
//! ## Merge semantics
//!
//! Every recognized key is optional. Each field is merged independently: a
//! value present in the sidecar replaces the derived default, an absent key
//! keeps it. Unknown keys are ignored. A sidecar that exists but is not
//! valid JSON for its record type is an authoring bug and is reported as
//! [`MetadataError::Malformed`]; a missing sidecar is not an error.

use crate::types::{ContentItem, GalleryAspectRatio, ProjectRecord};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed metadata in {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Recognized keys of a photo or gallery-image sidecar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhotoMetadata {
    pub title: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl PhotoMetadata {
    /// Apply this sidecar onto a derived item.
    ///
    /// - `title`, `location`, `date`: replaced when present.
    /// - `width`, `height`: replaced only when present *and* positive, so
    ///   the item keeps usable dimensions.
    pub fn merge_into(self, item: &mut ContentItem) {
        if let Some(title) = self.title {
            item.title = Some(title);
        }
        if let Some(location) = self.location {
            item.location = Some(location);
        }
        if let Some(date) = self.date {
            item.date = Some(date);
        }
        if let Some(width) = self.width.filter(|w| *w > 0) {
            item.width = width;
        }
        if let Some(height) = self.height.filter(|h| *h > 0) {
            item.height = height;
        }
    }
}

/// A year authored either as `"2024"` or `2024`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum YearValue {
    Text(String),
    Number(i64),
}

impl YearValue {
    fn into_string(self) -> String {
        match self {
            YearValue::Text(s) => s,
            YearValue::Number(n) => n.to_string(),
        }
    }
}

/// Recognized keys of a project's `meta.json`.
///
/// `slug`, `coverImage` and `coverKind` are not accepted here: the slug is
/// the folder name and the cover is always resolved from the filesystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub title: Option<String>,
    pub client: Option<String>,
    pub category: Option<String>,
    pub year: Option<YearValue>,
    pub description: Option<String>,
    pub challenge: Option<String>,
    pub solution: Option<String>,
    pub services: Option<Vec<String>>,
    pub tools_used: Option<Vec<String>>,
    pub shot_on: Option<Vec<String>>,
    pub gallery_aspect_ratio: Option<GalleryAspectRatio>,
    pub youtube_url: Option<String>,
    pub next_project: Option<String>,
}

impl ProjectMetadata {
    /// Apply this sidecar onto a record built from defaults. Every present
    /// field replaces the default wholesale (lists are not concatenated).
    pub fn merge_into(self, record: &mut ProjectRecord) {
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(client) = self.client {
            record.client = client;
        }
        if let Some(category) = self.category {
            record.category = category;
        }
        if let Some(year) = self.year {
            record.year = year.into_string();
        }
        if let Some(description) = self.description {
            record.description = description;
        }
        if let Some(challenge) = self.challenge {
            record.challenge = challenge;
        }
        if let Some(solution) = self.solution {
            record.solution = solution;
        }
        if let Some(services) = self.services {
            record.services = services;
        }
        if let Some(tools_used) = self.tools_used {
            record.tools_used = tools_used;
        }
        if self.shot_on.is_some() {
            record.shot_on = self.shot_on;
        }
        if let Some(ratio) = self.gallery_aspect_ratio {
            record.gallery_aspect_ratio = ratio;
        }
        if self.youtube_url.is_some() {
            record.youtube_url = self.youtube_url;
        }
        if self.next_project.is_some() {
            record.next_project = self.next_project;
        }
    }
}

/// Path of the JSON sidecar for a media file: same directory, same id.
///
/// `photos/rome-01.jpg` → `photos/rome-01.json`
pub fn sidecar_path(media_path: &Path) -> PathBuf {
    media_path.with_extension("json")
}

/// Read and parse a JSON sidecar.
///
/// Returns `Ok(None)` if the file doesn't exist, `Err(Malformed)` if it
/// exists but doesn't parse.
pub fn read_json_sidecar<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, MetadataError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(MetadataError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| MetadataError::Malformed {
            path: path.to_path_buf(),
            source,
        })
}

/// Read the sidecar belonging to a photo or gallery image.
pub fn read_photo_sidecar(media_path: &Path) -> Result<Option<PhotoMetadata>, MetadataError> {
    read_json_sidecar(&sidecar_path(media_path))
}

/// Read `meta.json` from a project folder.
pub fn read_project_meta(project_dir: &Path) -> Result<Option<ProjectMetadata>, MetadataError> {
    read_json_sidecar(&project_dir.join("meta.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MediaKind;
    use std::fs;
    use tempfile::TempDir;

    fn item() -> ContentItem {
        ContentItem {
            id: "rome-01".into(),
            source_path: "/photos/rome-01.jpg".into(),
            kind: MediaKind::Image,
            title: Some("rome 01".into()),
            location: None,
            date: None,
            width: 1200,
            height: 800,
            category: None,
        }
    }

    fn record() -> ProjectRecord {
        ProjectRecord {
            slug: "brand-film".into(),
            title: "brand film".into(),
            client: String::new(),
            category: "Uncategorized".into(),
            year: "2026".into(),
            description: String::new(),
            challenge: String::new(),
            solution: String::new(),
            services: vec![],
            tools_used: vec![],
            shot_on: None,
            cover_image: "/images/placeholder.jpg".into(),
            cover_kind: MediaKind::Image,
            gallery_aspect_ratio: GalleryAspectRatio::Horizontal,
            youtube_url: None,
            next_project: None,
        }
    }

    // =========================================================================
    // PhotoMetadata
    // =========================================================================

    #[test]
    fn photo_metadata_overrides_present_fields_only() {
        let meta: PhotoMetadata =
            serde_json::from_str(r#"{"title": "Rome at dusk", "location": "Rome"}"#).unwrap();
        let mut it = item();
        meta.merge_into(&mut it);

        assert_eq!(it.title.as_deref(), Some("Rome at dusk"));
        assert_eq!(it.location.as_deref(), Some("Rome"));
        assert_eq!(it.date, None);
        assert_eq!((it.width, it.height), (1200, 800));
    }

    #[test]
    fn photo_metadata_ignores_unknown_keys() {
        let meta: PhotoMetadata =
            serde_json::from_str(r#"{"camera": "X100V", "date": "2023-10"}"#).unwrap();
        assert_eq!(meta.date.as_deref(), Some("2023-10"));
    }

    #[test]
    fn photo_metadata_zero_dimensions_ignored() {
        let meta: PhotoMetadata = serde_json::from_str(r#"{"width": 0, "height": 900}"#).unwrap();
        let mut it = item();
        meta.merge_into(&mut it);
        assert_eq!((it.width, it.height), (1200, 900));
    }

    // =========================================================================
    // ProjectMetadata
    // =========================================================================

    #[test]
    fn project_metadata_merges_field_by_field() {
        let meta: ProjectMetadata = serde_json::from_str(
            r#"{
                "title": "Brand Film",
                "client": "Acme",
                "services": ["Direction", "Edit"],
                "toolsUsed": ["Resolve"],
                "galleryAspectRatio": "vertical"
            }"#,
        )
        .unwrap();
        let mut rec = record();
        meta.merge_into(&mut rec);

        assert_eq!(rec.title, "Brand Film");
        assert_eq!(rec.client, "Acme");
        assert_eq!(rec.category, "Uncategorized");
        assert_eq!(rec.services, vec!["Direction", "Edit"]);
        assert_eq!(rec.tools_used, vec!["Resolve"]);
        assert_eq!(rec.gallery_aspect_ratio, GalleryAspectRatio::Vertical);
        assert_eq!(rec.shot_on, None);
    }

    #[test]
    fn project_year_accepts_string_or_number() {
        let text: ProjectMetadata = serde_json::from_str(r#"{"year": "2021"}"#).unwrap();
        let number: ProjectMetadata = serde_json::from_str(r#"{"year": 2019}"#).unwrap();

        let mut a = record();
        text.merge_into(&mut a);
        let mut b = record();
        number.merge_into(&mut b);

        assert_eq!(a.year, "2021");
        assert_eq!(b.year, "2019");
    }

    #[test]
    fn project_metadata_supplementary_links() {
        let meta: ProjectMetadata = serde_json::from_str(
            r#"{"youtubeUrl": "https://youtu.be/x", "nextProject": "other", "shotOn": ["FX3"]}"#,
        )
        .unwrap();
        let mut rec = record();
        meta.merge_into(&mut rec);
        assert_eq!(rec.youtube_url.as_deref(), Some("https://youtu.be/x"));
        assert_eq!(rec.next_project.as_deref(), Some("other"));
        assert_eq!(rec.shot_on, Some(vec!["FX3".to_string()]));
    }

    #[test]
    fn project_metadata_rejects_bad_aspect_ratio() {
        let result: Result<ProjectMetadata, _> =
            serde_json::from_str(r#"{"galleryAspectRatio": "diagonal"}"#);
        assert!(result.is_err());
    }

    // =========================================================================
    // Reading sidecars
    // =========================================================================

    #[test]
    fn sidecar_path_swaps_extension() {
        assert_eq!(
            sidecar_path(Path::new("photos/rome-01.jpg")),
            PathBuf::from("photos/rome-01.json")
        );
    }

    #[test]
    fn read_sidecar_missing_is_none() {
        let tmp = TempDir::new().unwrap();
        let result = read_photo_sidecar(&tmp.path().join("dawn.jpg")).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn read_sidecar_parses_json() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("dawn.json"), r#"{"title": "Dawn"}"#).unwrap();
        let result = read_photo_sidecar(&tmp.path().join("dawn.jpg")).unwrap();
        assert_eq!(result.unwrap().title.as_deref(), Some("Dawn"));
    }

    #[test]
    fn read_sidecar_malformed_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("dawn.json"), "{ not json").unwrap();
        let result = read_photo_sidecar(&tmp.path().join("dawn.jpg"));
        assert!(matches!(result, Err(MetadataError::Malformed { .. })));
    }

    #[test]
    fn read_project_meta_from_folder() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("meta.json"), r#"{"category": "Film"}"#).unwrap();
        let meta = read_project_meta(tmp.path()).unwrap().unwrap();
        assert_eq!(meta.category.as_deref(), Some("Film"));
    }
}
