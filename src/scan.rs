//! Filesystem enumeration for the content indexer.
//!
//! This module only discovers entries and orders them; it never opens media
//! files or sidecars. [`crate::repository`] turns entries into records.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── photos/
//! │   ├── nature1.jpg              # Root-level photo (prefix category "nature")
//! │   ├── nature_02.jpg
//! │   ├── nature_02.json           # Optional sidecar
//! │   ├── national.jpg             # Prefix category "national"
//! │   └── Travel/                  # Subdirectory = category "Travel"
//! │       ├── rome-01.jpg
//! │       └── reel.mp4
//! └── projects/
//!     └── brand-film/              # One folder per project, slug = folder name
//!         ├── meta.json            # Optional
//!         ├── cover.mp4            # Optional; video covers win over images
//!         └── images/              # Optional gallery
//!             ├── 01.jpg
//!             └── 02.jpg
//! ```
//!
//! ## Rules
//!
//! - Only files whose extension is in the media set are entries.
//! - Photos: files directly in the photos root plus one level of
//!   subdirectories. Deeper files are ignored.
//! - Dotfiles and dot-directories are skipped.
//! - Symlinks are followed; a dangling link is skipped with a warning.
//! - Everything is ordered with [`natural_cmp`] on the file name, ties
//!   broken by relative path.

use crate::naming::{self, natural_cmp};
use crate::types::MediaKind;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// Cover candidates, checked in order. Videos first.
const COVER_VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "webm"];
const COVER_IMAGE_EXTENSIONS: &[&str] = &["gif", "webp", "jpg", "jpeg", "png"];

/// A media file discovered on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaEntry {
    /// Absolute (or root-joined) path on disk.
    pub path: PathBuf,
    /// Path relative to the scanned root, `/`-separated.
    pub rel_path: String,
    pub file_name: String,
    /// File name without extension.
    pub id: String,
    pub kind: MediaKind,
    /// Name of the subdirectory holding the file, if any.
    pub directory: Option<String>,
}

/// Result of scanning the photos root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoScan {
    /// Every media file, ordered.
    pub entries: Vec<MediaEntry>,
    /// Names of the first-level subdirectories, ordered.
    pub subdirectories: Vec<String>,
}

impl PhotoScan {
    /// The subdirectory whose name equals `name` ignoring case.
    pub fn subdirectory(&self, name: &str) -> Option<&str> {
        let wanted = name.to_lowercase();
        self.subdirectories
            .iter()
            .find(|d| d.to_lowercase() == wanted)
            .map(String::as_str)
    }
}

fn is_hidden_entry(entry: &DirEntry) -> bool {
    entry.depth() > 0 && naming::is_hidden(&entry.file_name().to_string_lossy())
}

/// Walk `root` following symlinks, hidden entries pruned. Dangling links
/// and link cycles below the root are logged and dropped; any other error
/// is returned.
fn walk(root: &Path, max_depth: usize) -> impl Iterator<Item = io::Result<DirEntry>> {
    WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_hidden_entry(e))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(Ok(entry)),
            Err(err) if err.depth() > 0 && is_broken_link(&err) => {
                let path = err.path().map(|p| p.display().to_string()).unwrap_or_default();
                warn!(path = %path, error = %err, "skipping unreadable link");
                None
            }
            Err(err) => Some(Err(err.into())),
        })
}

fn is_broken_link(err: &walkdir::Error) -> bool {
    err.loop_ancestor().is_some()
        || err
            .io_error()
            .is_some_and(|io| io.kind() == io::ErrorKind::NotFound)
}

/// Classify a file path as media, returning `(id, kind)`.
pub fn classify(path: &Path) -> Option<(String, MediaKind)> {
    let name = path.file_name()?.to_string_lossy();
    let (id, ext) = naming::split_file_name(&name);
    let kind = MediaKind::from_extension(ext?)?;
    Some((id.to_string(), kind))
}

fn sort_entries(entries: &mut [MediaEntry]) {
    entries.sort_by(|a, b| {
        natural_cmp(&a.file_name, &b.file_name).then_with(|| natural_cmp(&a.rel_path, &b.rel_path))
    });
}

/// Scan the photos root: root-level files and one level of subdirectories.
pub fn scan_photos(photos_root: &Path) -> io::Result<PhotoScan> {
    let mut scan = PhotoScan::default();

    for entry in walk(photos_root, 2) {
        let entry = entry?;
        let file_type = entry.file_type();

        if file_type.is_dir() {
            if entry.depth() == 1 {
                scan.subdirectories
                    .push(entry.file_name().to_string_lossy().to_string());
            }
            continue;
        }
        if !file_type.is_file() {
            continue;
        }
        let Some((id, kind)) = classify(entry.path()) else {
            continue;
        };

        let file_name = entry.file_name().to_string_lossy().to_string();
        let directory = (entry.depth() == 2)
            .then(|| {
                entry
                    .path()
                    .parent()
                    .and_then(Path::file_name)
                    .map(|n| n.to_string_lossy().to_string())
            })
            .flatten();
        let rel_path = match &directory {
            Some(dir) => format!("{dir}/{file_name}"),
            None => file_name.clone(),
        };

        scan.entries.push(MediaEntry {
            path: entry.path().to_path_buf(),
            rel_path,
            file_name,
            id,
            kind,
            directory,
        });
    }

    sort_entries(&mut scan.entries);
    scan.subdirectories.sort_by(|a, b| natural_cmp(a, b));
    Ok(scan)
}

/// Media files directly inside `dir` (no recursion), ordered.
pub fn scan_media_dir(dir: &Path) -> io::Result<Vec<MediaEntry>> {
    let mut entries = Vec::new();
    for entry in walk(dir, 1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some((id, kind)) = classify(entry.path()) else {
            continue;
        };
        let file_name = entry.file_name().to_string_lossy().to_string();
        entries.push(MediaEntry {
            path: entry.path().to_path_buf(),
            rel_path: file_name.clone(),
            file_name,
            id,
            kind,
            directory: None,
        });
    }
    sort_entries(&mut entries);
    Ok(entries)
}

/// Project folders under the projects root as `(slug, path)`, in
/// numeric-aware name order. This is the discovery order that ties in the
/// year sort fall back to.
pub fn scan_project_dirs(projects_root: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut dirs: Vec<(String, PathBuf)> = fs::read_dir(projects_root)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| (e.file_name().to_string_lossy().to_string(), e.path()))
        .filter(|(name, _)| !naming::is_hidden(name))
        .collect();
    dirs.sort_by(|a, b| natural_cmp(&a.0, &b.0));
    Ok(dirs)
}

/// Find `cover.<ext>` in a project folder: video extensions first, then
/// image extensions, each in fixed priority order.
///
/// Returns the cover's file name and kind.
pub fn find_cover(project_dir: &Path) -> Option<(String, MediaKind)> {
    let videos = COVER_VIDEO_EXTENSIONS
        .iter()
        .map(|ext| (*ext, MediaKind::Video));
    let images = COVER_IMAGE_EXTENSIONS
        .iter()
        .map(|ext| (*ext, MediaKind::Image));

    videos.chain(images).find_map(|(ext, kind)| {
        let name = format!("cover.{ext}");
        project_dir.join(&name).is_file().then_some((name, kind))
    })
}

/// A slug names exactly one folder: no separators, no `.`/`..`, not hidden.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.contains(['/', '\\'])
        && slug != "."
        && slug != ".."
        && !naming::is_hidden(slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_stub;
    use tempfile::TempDir;

    fn names(entries: &[MediaEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.rel_path.as_str()).collect()
    }

    #[test]
    fn classify_media_files() {
        assert_eq!(
            classify(Path::new("a/dawn.JPG")),
            Some(("dawn".to_string(), MediaKind::Image))
        );
        assert_eq!(
            classify(Path::new("reel.webm")),
            Some(("reel".to_string(), MediaKind::Video))
        );
        assert_eq!(classify(Path::new("dawn.json")), None);
        assert_eq!(classify(Path::new("README")), None);
    }

    #[test]
    fn scan_photos_root_and_one_level() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_stub(&root.join("img2.jpg"));
        write_stub(&root.join("img10.jpg"));
        write_stub(&root.join("img1.jpg"));
        write_stub(&root.join("Travel/rome.jpg"));
        write_stub(&root.join("Travel/deep/ignored.jpg"));
        write_stub(&root.join("notes.txt"));
        write_stub(&root.join("img1.json"));

        let scan = scan_photos(root).unwrap();
        assert_eq!(
            names(&scan.entries),
            vec!["img1.jpg", "img2.jpg", "img10.jpg", "Travel/rome.jpg"]
        );
        assert_eq!(scan.subdirectories, vec!["Travel"]);
        assert_eq!(scan.entries[3].directory.as_deref(), Some("Travel"));
        assert_eq!(scan.entries[0].directory, None);
    }

    #[test]
    fn scan_photos_skips_hidden() {
        let tmp = TempDir::new().unwrap();
        write_stub(&tmp.path().join(".secret.jpg"));
        write_stub(&tmp.path().join(".cache/thumb.jpg"));
        write_stub(&tmp.path().join("shown.png"));

        let scan = scan_photos(tmp.path()).unwrap();
        assert_eq!(names(&scan.entries), vec!["shown.png"]);
        assert!(scan.subdirectories.is_empty());
    }

    #[test]
    fn scan_photos_same_name_in_two_dirs() {
        let tmp = TempDir::new().unwrap();
        write_stub(&tmp.path().join("b/x.jpg"));
        write_stub(&tmp.path().join("a/x.jpg"));

        let scan = scan_photos(tmp.path()).unwrap();
        assert_eq!(names(&scan.entries), vec!["a/x.jpg", "b/x.jpg"]);
    }

    #[cfg(unix)]
    #[test]
    fn scan_photos_follows_symlinks() {
        use std::os::unix::fs::symlink;

        let outside = TempDir::new().unwrap();
        write_stub(&outside.path().join("shared.jpg"));
        write_stub(&outside.path().join("Archive/old.jpg"));

        let tmp = TempDir::new().unwrap();
        write_stub(&tmp.path().join("local.jpg"));
        symlink(outside.path().join("shared.jpg"), tmp.path().join("linked.jpg")).unwrap();
        symlink(outside.path().join("Archive"), tmp.path().join("Archive")).unwrap();
        symlink(outside.path().join("gone.jpg"), tmp.path().join("dangling.jpg")).unwrap();

        let scan = scan_photos(tmp.path()).unwrap();
        assert_eq!(
            names(&scan.entries),
            vec!["linked.jpg", "local.jpg", "Archive/old.jpg"]
        );
        assert_eq!(scan.subdirectories, vec!["Archive"]);
    }

    #[cfg(unix)]
    #[test]
    fn scan_media_dir_follows_symlinks() {
        use std::os::unix::fs::symlink;

        let outside = TempDir::new().unwrap();
        write_stub(&outside.path().join("still.png"));

        let tmp = TempDir::new().unwrap();
        write_stub(&tmp.path().join("01.jpg"));
        symlink(outside.path().join("still.png"), tmp.path().join("02.png")).unwrap();

        let entries = scan_media_dir(tmp.path()).unwrap();
        assert_eq!(names(&entries), vec!["01.jpg", "02.png"]);
    }

    #[test]
    fn subdirectory_lookup_ignores_case() {
        let scan = PhotoScan {
            entries: vec![],
            subdirectories: vec!["Travel".into()],
        };
        assert_eq!(scan.subdirectory("travel"), Some("Travel"));
        assert_eq!(scan.subdirectory("trav"), None);
    }

    #[test]
    fn scan_media_dir_is_flat() {
        let tmp = TempDir::new().unwrap();
        write_stub(&tmp.path().join("02.jpg"));
        write_stub(&tmp.path().join("01.mp4"));
        write_stub(&tmp.path().join("nested/03.jpg"));

        let entries = scan_media_dir(tmp.path()).unwrap();
        assert_eq!(names(&entries), vec!["01.mp4", "02.jpg"]);
        assert_eq!(entries[0].kind, MediaKind::Video);
    }

    #[test]
    fn project_dirs_sorted_and_files_ignored() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("project-10")).unwrap();
        fs::create_dir_all(tmp.path().join("project-2")).unwrap();
        fs::create_dir_all(tmp.path().join(".git")).unwrap();
        write_stub(&tmp.path().join("stray.jpg"));

        let dirs = scan_project_dirs(tmp.path()).unwrap();
        let slugs: Vec<&str> = dirs.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(slugs, vec!["project-2", "project-10"]);
    }

    #[test]
    fn cover_video_beats_image() {
        let tmp = TempDir::new().unwrap();
        write_stub(&tmp.path().join("cover.jpg"));
        write_stub(&tmp.path().join("cover.webm"));
        assert_eq!(
            find_cover(tmp.path()),
            Some(("cover.webm".to_string(), MediaKind::Video))
        );
    }

    #[test]
    fn cover_image_priority_order() {
        let tmp = TempDir::new().unwrap();
        write_stub(&tmp.path().join("cover.png"));
        write_stub(&tmp.path().join("cover.webp"));
        assert_eq!(
            find_cover(tmp.path()),
            Some(("cover.webp".to_string(), MediaKind::Image))
        );
    }

    #[test]
    fn cover_missing() {
        let tmp = TempDir::new().unwrap();
        write_stub(&tmp.path().join("poster.jpg"));
        assert_eq!(find_cover(tmp.path()), None);
    }

    #[test]
    fn slug_validation() {
        assert!(is_valid_slug("brand-film"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug(".."));
        assert!(!is_valid_slug("a/b"));
        assert!(!is_valid_slug(".hidden"));
    }
}
