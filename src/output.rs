//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every entity (photo,
//! category, project) leads with its positional index and display title;
//! asset URLs and metadata are shown as indented context lines.
//!
//! # Output Format
//!
//! ## Photos
//!
//! ```text
//! Photos: nature (bento, 2 items)
//! 001 nature 1 [span-third]
//!     Source: /photos/nature1.jpg
//!     600x900 image, Nature
//! 002 nature 02 [span-two-thirds]
//!     Source: /photos/nature_02.jpg
//!     600x900 image, Nature
//! ```
//!
//! ## Categories
//!
//! ```text
//! Categories
//! 001 All (12 photos)
//! 002 Nature (2 photos)
//!     Slug: nature
//! ```
//!
//! ## Projects
//!
//! ```text
//! Projects
//! 001 Launch Day (2021)
//!     Client: Acme
//!     Category: Film
//!     Cover: /projects/launch/cover.mp4 (video)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::layout::{LayoutStrategy, Placement, SpanClass};
use crate::manifest::ProjectPage;
use crate::types::{ContentItem, MediaKind, PhotoCategory, ProjectRecord};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn kind_label(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Image => "image",
        MediaKind::Video => "video",
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

/// Planned items at the given depth: header with span, then context.
fn placement_lines<'a>(
    placements: impl IntoIterator<Item = (&'a ContentItem, SpanClass)>,
    depth: usize,
) -> Vec<String> {
    let pad = indent(depth);
    let mut lines = Vec::new();
    for (i, (item, span)) in placements.into_iter().enumerate() {
        let title = item.title.as_deref().unwrap_or(&item.id);
        lines.push(format!("{}{} {} [{}]", pad, format_index(i + 1), title, span));
        lines.push(format!("{}    Source: {}", pad, item.source_path));

        let mut detail = format!("{}x{} {}", item.width, item.height, kind_label(item.kind));
        if let Some(category) = &item.category {
            detail.push_str(&format!(", {}", category));
        }
        lines.push(format!("{}    {}", pad, detail));

        match (&item.location, &item.date) {
            (Some(location), Some(date)) => {
                lines.push(format!("{}    {} · {}", pad, location, date))
            }
            (Some(value), None) | (None, Some(value)) => {
                lines.push(format!("{}    {}", pad, value))
            }
            (None, None) => {}
        }
    }
    lines
}

// ============================================================================
// Photos
// ============================================================================

/// Format a planned photo list.
pub fn format_photos(
    filter: Option<&str>,
    strategy: LayoutStrategy,
    placements: &[Placement<'_>],
) -> Vec<String> {
    let mut lines = vec![format!(
        "Photos: {} ({}, {})",
        filter.unwrap_or(PhotoCategory::ALL_SLUG),
        strategy,
        plural(placements.len(), "item")
    )];
    lines.extend(placement_lines(placements.iter().map(|p| (p.item, p.span)), 0));
    lines
}

/// Print a planned photo list to stdout.
pub fn print_photos(filter: Option<&str>, strategy: LayoutStrategy, placements: &[Placement<'_>]) {
    for line in format_photos(filter, strategy, placements) {
        println!("{}", line);
    }
}

// ============================================================================
// Categories
// ============================================================================

/// Format category facets. Every real category shows its filter slug.
pub fn format_categories(categories: &[PhotoCategory]) -> Vec<String> {
    let mut lines = vec!["Categories".to_string()];
    for (i, category) in categories.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            category.name,
            plural(category.count, "photo")
        ));
        if category.slug != PhotoCategory::ALL_SLUG {
            lines.push(format!("    Slug: {}", category.slug));
        }
    }
    lines
}

/// Print category facets to stdout.
pub fn print_categories(categories: &[PhotoCategory]) {
    for line in format_categories(categories) {
        println!("{}", line);
    }
}

// ============================================================================
// Projects
// ============================================================================

fn project_header(project: &ProjectRecord) -> String {
    format!("{} ({})", project.title, project.year)
}

fn project_context(project: &ProjectRecord, depth: usize) -> Vec<String> {
    let pad = indent(depth);
    let mut lines = Vec::new();
    if !project.client.is_empty() {
        lines.push(format!("{}Client: {}", pad, project.client));
    }
    lines.push(format!("{}Category: {}", pad, project.category));
    lines.push(format!(
        "{}Cover: {} ({})",
        pad,
        project.cover_image,
        kind_label(project.cover_kind)
    ));
    lines
}

/// Format the project listing.
pub fn format_projects(projects: &[ProjectRecord]) -> Vec<String> {
    let mut lines = vec!["Projects".to_string()];
    for (i, project) in projects.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), project_header(project)));
        lines.extend(project_context(project, 1));
    }
    lines
}

/// Print the project listing to stdout.
pub fn print_projects(projects: &[ProjectRecord]) {
    for line in format_projects(projects) {
        println!("{}", line);
    }
}

/// Format one project's detail page: record, planned gallery, next link.
pub fn format_project(page: &ProjectPage) -> Vec<String> {
    let project = &page.project;
    let mut lines = vec![project_header(project)];
    lines.extend(project_context(project, 1));

    let lists = [
        ("Services", Some(&project.services)),
        ("Tools", Some(&project.tools_used)),
        ("Shot on", project.shot_on.as_ref()),
    ];
    for (label, values) in lists {
        if let Some(values) = values.filter(|v| !v.is_empty()) {
            lines.push(format!("    {}: {}", label, values.join(", ")));
        }
    }
    if let Some(url) = &project.youtube_url {
        lines.push(format!("    Video: {}", url));
    }

    for (label, text) in [
        ("Description", &project.description),
        ("Challenge", &project.challenge),
        ("Solution", &project.solution),
    ] {
        let text = text.trim();
        if !text.is_empty() {
            lines.push(format!("    {}: {}", label, truncate_desc(text, 60)));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Gallery ({}, {})",
        page.gallery_layout,
        plural(page.gallery.len(), "item")
    ));
    lines.extend(placement_lines(
        page.gallery.iter().map(|p| (&p.item, p.span)),
        1,
    ));

    if let Some(next) = &page.next {
        lines.push(String::new());
        lines.push(format!("Next: {}", next));
    }
    lines
}

/// Print one project's detail page to stdout.
pub fn print_project(page: &ProjectPage) {
    for line in format_project(page) {
        println!("{}", line);
    }
}
