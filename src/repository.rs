//! The content indexer: typed records over a content root.
//!
//! A [`ContentRepository`] is built once per build (or per request) from an
//! explicit root path and a [`SiteConfig`]. Every read operation is a pure
//! function of the filesystem under that root and is memoized for the
//! lifetime of the repository, so repeated calls return the same `Arc`.
//!
//! ## Photo categories
//!
//! A photo belongs to at most one category:
//!
//! - a file inside a subdirectory belongs to that subdirectory
//!   (`Travel/rome.jpg` → "Travel");
//! - a root-level file belongs to the category named by its id prefix
//!   (`nature_02.jpg` → "Nature"), unless a subdirectory with the same
//!   name exists, which shadows the prefix.
//!
//! Filtering follows the same rule, so the count reported by
//! [`ContentRepository::list_categories`] for a slug always equals the
//! length of [`ContentRepository::list_photos`] for that slug.
//!
//! ## Failure policy
//!
//! | Condition | Result |
//! |-----------|--------|
//! | Content root, projects root or `images/` missing | empty, warning |
//! | Unknown project slug | `None`, warning |
//! | Image header unreadable | fallback dimensions, warning |
//! | Sidecar exists but is not valid JSON | [`IndexError::MalformedMetadata`] |

use crate::cache::{CacheStats, Memo};
use crate::config::SiteConfig;
use crate::imaging::{DimensionDefaults, ImageBackend, RustBackend, probe_dimensions};
use crate::metadata::{self, MetadataError};
use crate::naming::{self, capitalize, display_title};
use crate::scan::{self, MediaEntry, PhotoScan};
use crate::types::{ContentItem, GalleryAspectRatio, MediaKind, PhotoCategory, ProjectRecord};
use chrono::Datelike;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Subfolder of a project holding its gallery.
pub const GALLERY_DIR: &str = "images";

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("IO error reading {path}: {source}")]
    SidecarIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed metadata in {path}: {source}")]
    MalformedMetadata {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl From<walkdir::Error> for IndexError {
    fn from(e: walkdir::Error) -> Self {
        IndexError::Io(e.into())
    }
}

impl From<MetadataError> for IndexError {
    fn from(e: MetadataError) -> Self {
        match e {
            MetadataError::Io { path, source } => IndexError::SidecarIo { path, source },
            MetadataError::Malformed { path, source } => {
                IndexError::MalformedMetadata { path, source }
            }
        }
    }
}

/// Explicit handle on a content root.
///
/// Generic over the [`ImageBackend`] so tests can count or fail probes.
pub struct ContentRepository<B: ImageBackend = RustBackend> {
    root: PathBuf,
    config: SiteConfig,
    backend: B,
    defaults: DimensionDefaults,
    memo: Memo,
}

impl ContentRepository<RustBackend> {
    /// Repository over `root` using the pure-Rust image probe.
    pub fn new(root: &Path, config: SiteConfig) -> Self {
        Self::with_backend(root, config, RustBackend::new())
    }
}

impl<B: ImageBackend> ContentRepository<B> {
    pub fn with_backend(root: &Path, config: SiteConfig, backend: B) -> Self {
        let defaults = config.dimensions.defaults();
        Self {
            root: root.to_path_buf(),
            config,
            backend,
            defaults,
            memo: Memo::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Forget every memoized result. The next call rereads the filesystem.
    pub fn invalidate(&self) {
        self.memo.invalidate();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.memo.stats()
    }

    fn photos_root(&self) -> PathBuf {
        self.root.join(&self.config.content.photos_dir)
    }

    fn projects_root(&self) -> PathBuf {
        self.root.join(&self.config.content.projects_dir)
    }

    // =========================================================================
    // Photos
    // =========================================================================

    /// Photos under the content root, optionally filtered by category.
    ///
    /// `None`, `"all"` and blank filters return everything. Otherwise a
    /// subdirectory whose name equals the filter (ignoring case) selects its
    /// files; failing that, the filter selects root-level files whose id
    /// starts with it at a word boundary (`nature` matches `nature1`, not
    /// `national`).
    pub fn list_photos(&self, category: Option<&str>) -> Result<Arc<Vec<ContentItem>>, IndexError> {
        self.memo
            .get_or_try_insert("list_photos", &category, || {
                let Some(scan) = self.scan_photos()? else {
                    return Ok(Vec::new());
                };
                let filter = category
                    .map(str::trim)
                    .filter(|f| !f.is_empty() && !f.eq_ignore_ascii_case(PhotoCategory::ALL_SLUG));

                let selected: Vec<&MediaEntry> = match filter {
                    None => scan.entries.iter().collect(),
                    Some(filter) => match scan.subdirectory(filter) {
                        Some(dir) => scan
                            .entries
                            .iter()
                            .filter(|e| e.directory.as_deref() == Some(dir))
                            .collect(),
                        None => scan
                            .entries
                            .iter()
                            .filter(|e| {
                                e.directory.is_none()
                                    && naming::matches_category_prefix(&e.id, filter)
                            })
                            .collect(),
                    },
                };

                let photos_dir = &self.config.content.photos_dir;
                let items = selected
                    .par_iter()
                    .map(|entry| {
                        let site_path = format!("{}/{}", photos_dir, entry.rel_path);
                        let category = photo_category(&scan, entry).map(|(_, name)| name);
                        self.index_media(entry, &site_path, category)
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                debug!(filter = ?category, count = items.len(), "indexed photos");
                Ok(items)
            })
    }

    /// Category facets: `All` first, then every non-empty category by
    /// display name, ignoring case.
    pub fn list_categories(&self) -> Result<Arc<Vec<PhotoCategory>>, IndexError> {
        self.memo.get_or_try_insert("list_categories", &(), || {
            let Some(scan) = self.scan_photos()? else {
                return Ok(vec![PhotoCategory::all(0)]);
            };

            let mut by_slug: BTreeMap<String, PhotoCategory> = BTreeMap::new();
            for entry in &scan.entries {
                if let Some((slug, name)) = photo_category(&scan, entry) {
                    by_slug
                        .entry(slug.clone())
                        .or_insert_with(|| PhotoCategory { name, slug, count: 0 })
                        .count += 1;
                }
            }

            let mut categories: Vec<PhotoCategory> = by_slug.into_values().collect();
            categories.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then_with(|| a.name.cmp(&b.name))
            });
            categories.insert(0, PhotoCategory::all(scan.entries.len()));
            Ok(categories)
        })
    }

    /// Scan the photos root, or `None` (with a warning) when it is missing.
    fn scan_photos(&self) -> Result<Option<PhotoScan>, IndexError> {
        let photos_root = self.photos_root();
        if !photos_root.is_dir() {
            warn!(path = %photos_root.display(), "photos directory not found");
            return Ok(None);
        }
        let scan = scan::scan_photos(&photos_root)?;
        if let Some(dir) = scan.subdirectory(PhotoCategory::ALL_SLUG) {
            warn!(dir, "subdirectory name is reserved; its photos only appear under All");
        }
        Ok(Some(scan))
    }

    // =========================================================================
    // Projects
    // =========================================================================

    /// Every project, newest year first. Equal years keep folder order;
    /// years that do not start with an integer sort last.
    pub fn list_projects(&self) -> Result<Arc<Vec<ProjectRecord>>, IndexError> {
        self.memo.get_or_try_insert("list_projects", &(), || {
            let projects_root = self.projects_root();
            if !projects_root.is_dir() {
                warn!(path = %projects_root.display(), "projects directory not found");
                return Ok(Vec::new());
            }

            let dirs = scan::scan_project_dirs(&projects_root)?;
            let current_year = chrono::Local::now().year().to_string();
            let mut projects = dirs
                .par_iter()
                .map(|(slug, dir)| self.index_project(slug, dir, &current_year))
                .collect::<Result<Vec<_>, _>>()?;

            // Stable: ties keep discovery order. `None` < `Some`, so
            // unparseable years land at the end of a descending sort.
            projects.sort_by(|a, b| b.year_number().cmp(&a.year_number()));

            debug!(count = projects.len(), "indexed projects");
            Ok(projects)
        })
    }

    /// One project by slug, or `None` with a warning. Slugs that could
    /// leave the projects root are rejected without indexing anything.
    pub fn get_project(&self, slug: &str) -> Result<Option<Arc<ProjectRecord>>, IndexError> {
        if !scan::is_valid_slug(slug) {
            warn!(slug, "invalid project slug");
            return Ok(None);
        }
        let found = self.memo.get_or_try_insert("get_project", slug, || {
            let projects = self.list_projects()?;
            Ok::<_, IndexError>(
                projects
                    .iter()
                    .find(|p| p.slug == slug)
                    .cloned()
                    .map(Arc::new),
            )
        })?;

        if found.is_none() {
            warn!(slug, "project not found");
        }
        Ok((*found).clone())
    }

    /// The project to link to after `slug`.
    ///
    /// A `nextProject` named in `meta.json` wins when it exists; otherwise
    /// the following project in [`list_projects`](Self::list_projects)
    /// order, wrapping around.
    pub fn next_project(&self, slug: &str) -> Result<Option<ProjectRecord>, IndexError> {
        let projects = self.list_projects()?;
        let Some(index) = projects.iter().position(|p| p.slug == slug) else {
            warn!(slug, "project not found");
            return Ok(None);
        };

        if let Some(pinned) = &projects[index].next_project {
            match projects.iter().find(|p| &p.slug == pinned) {
                Some(next) => return Ok(Some(next.clone())),
                None => warn!(slug, next = %pinned, "nextProject names an unknown project"),
            }
        }
        Ok(Some(projects[(index + 1) % projects.len()].clone()))
    }

    /// Gallery media from the project's `images/` folder, ordered like
    /// photos. No category logic applies.
    pub fn list_project_gallery_images(
        &self,
        slug: &str,
    ) -> Result<Arc<Vec<ContentItem>>, IndexError> {
        self.memo
            .get_or_try_insert("list_project_gallery_images", slug, || {
                if !scan::is_valid_slug(slug) {
                    warn!(slug, "invalid project slug");
                    return Ok(Vec::new());
                }
                let gallery_dir = self.projects_root().join(slug).join(GALLERY_DIR);
                if !gallery_dir.is_dir() {
                    warn!(path = %gallery_dir.display(), "project gallery not found");
                    return Ok(Vec::new());
                }

                let projects_dir = &self.config.content.projects_dir;
                let entries = scan::scan_media_dir(&gallery_dir)?;
                let items = entries
                    .par_iter()
                    .map(|entry| {
                        let site_path =
                            format!("{projects_dir}/{slug}/{GALLERY_DIR}/{}", entry.rel_path);
                        self.index_media(entry, &site_path, None)
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                debug!(slug, count = items.len(), "indexed gallery");
                Ok(items)
            })
    }

    // =========================================================================
    // Record construction
    // =========================================================================

    /// Probe, default, then overlay the sidecar.
    fn index_media(
        &self,
        entry: &MediaEntry,
        site_path: &str,
        category: Option<String>,
    ) -> Result<ContentItem, IndexError> {
        let dims = probe_dimensions(&self.backend, &entry.path, entry.kind, &self.defaults);
        let mut item = ContentItem {
            id: entry.id.clone(),
            source_path: self.config.asset_url(site_path),
            kind: entry.kind,
            title: Some(display_title(&entry.id)),
            location: None,
            date: None,
            width: dims.width,
            height: dims.height,
            category,
        };
        if let Some(meta) = metadata::read_photo_sidecar(&entry.path)? {
            meta.merge_into(&mut item);
        }
        Ok(item)
    }

    fn index_project(
        &self,
        slug: &str,
        dir: &Path,
        current_year: &str,
    ) -> Result<ProjectRecord, IndexError> {
        let (cover_image, cover_kind) = match scan::find_cover(dir) {
            Some((file_name, kind)) => (
                self.config.asset_url(&format!(
                    "{}/{}/{}",
                    self.config.content.projects_dir, slug, file_name
                )),
                kind,
            ),
            None => (
                self.config.asset_url(&self.config.placeholder_image),
                MediaKind::Image,
            ),
        };

        let mut record = ProjectRecord {
            slug: slug.to_string(),
            title: display_title(slug),
            client: String::new(),
            category: "Uncategorized".to_string(),
            year: current_year.to_string(),
            description: String::new(),
            challenge: String::new(),
            solution: String::new(),
            services: Vec::new(),
            tools_used: Vec::new(),
            shot_on: None,
            cover_image,
            cover_kind,
            gallery_aspect_ratio: GalleryAspectRatio::default(),
            youtube_url: None,
            next_project: None,
        };
        if let Some(meta) = metadata::read_project_meta(dir)? {
            meta.merge_into(&mut record);
        }
        Ok(record)
    }
}

/// `(slug, display name)` of the category an entry belongs to.
fn photo_category(scan: &PhotoScan, entry: &MediaEntry) -> Option<(String, String)> {
    let (slug, name) = match &entry.directory {
        Some(dir) => (dir.to_lowercase(), dir.clone()),
        None => {
            let prefix = naming::category_prefix(&entry.id)?;
            if scan.subdirectory(&prefix).is_some() {
                return None;
            }
            let name = capitalize(&prefix);
            (prefix, name)
        }
    };
    // `all` is the synthetic facet; such files count toward it only.
    (slug != PhotoCategory::ALL_SLUG).then_some((slug, name))
}
