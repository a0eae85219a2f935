//! Site manifest: every indexed record in one JSON document.
//!
//! The manifest is what a renderer consumes: the photo page already planned
//! with the configured strategy, the category facets, and each project with
//! its planned gallery and the slug of the project to link to next.

use crate::config::SiteConfig;
use crate::imaging::ImageBackend;
use crate::layout::{self, LayoutStrategy, PlacedItem};
use crate::repository::{ContentRepository, IndexError};
use crate::types::{ContentItem, PhotoCategory, ProjectRecord};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;

/// Manifest output from the index stage
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteManifest {
    pub base_path: String,
    pub categories: Vec<PhotoCategory>,
    pub photo_layout: LayoutStrategy,
    pub photos: Vec<PlacedItem>,
    pub projects: Vec<ProjectPage>,
}

/// A project with everything its detail page needs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPage {
    pub project: ProjectRecord,
    pub gallery_layout: LayoutStrategy,
    pub gallery: Vec<PlacedItem>,
    /// Slug of the project linked as "next".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Index the whole content root.
///
/// `photo_layout` overrides the configured photo strategy.
pub fn build_manifest<B: ImageBackend>(
    repo: &ContentRepository<B>,
    photo_layout: Option<LayoutStrategy>,
) -> Result<SiteManifest, IndexError> {
    let config: &SiteConfig = repo.config();
    let photo_layout = photo_layout.unwrap_or(config.layout.photos);

    let photos = repo.list_photos(None)?;
    let categories = repo.list_categories()?;
    let projects = repo.list_projects()?;

    let project_pages = projects
        .iter()
        .map(|project| project_page(repo, project))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SiteManifest {
        base_path: config.url_prefix().to_string(),
        categories: categories.to_vec(),
        photo_layout,
        photos: planned(&photos, photo_layout),
        projects: project_pages,
    })
}

/// Detail-page data for one project.
pub fn project_page<B: ImageBackend>(
    repo: &ContentRepository<B>,
    project: &ProjectRecord,
) -> Result<ProjectPage, IndexError> {
    let gallery_layout = repo.config().layout.projects;
    let gallery = repo.list_project_gallery_images(&project.slug)?;
    let next = repo.next_project(&project.slug)?.map(|p| p.slug);
    Ok(ProjectPage {
        project: project.clone(),
        gallery_layout,
        gallery: planned(&gallery, gallery_layout),
        next,
    })
}

fn planned(items: &[ContentItem], strategy: LayoutStrategy) -> Vec<PlacedItem> {
    layout::plan(items, strategy)
        .into_iter()
        .map(PlacedItem::from)
        .collect()
}

/// Pretty JSON, as written by `folio manifest`.
pub fn to_json(manifest: &SiteManifest) -> serde_json::Result<String> {
    serde_json::to_string_pretty(manifest)
}

pub fn write_manifest(manifest: &SiteManifest, path: &Path) -> io::Result<()> {
    let json = to_json(manifest)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)
}
