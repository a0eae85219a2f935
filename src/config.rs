//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults
//! are overridden by an optional `config.toml` in the content root.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── config.toml              # Optional, overrides stock defaults
//! ├── photos/
//! │   └── ...
//! └── projects/
//!     └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! base_path = ""                                 # URL subpath the site is deployed under
//! placeholder_image = "/images/placeholder.jpg"  # Cover used when a project has none
//!
//! [content]
//! photos_dir = "photos"      # Photo collection, relative to the content root
//! projects_dir = "projects"  # One folder per project, relative to the content root
//!
//! [dimensions]
//! image_fallback = [800, 600]  # Used when an image header can't be read
//! video = [1920, 1080]         # Videos are never probed
//!
//! [layout]
//! photos = "bento"           # bento | full-width
//! projects = "full-width"    # bento | full-width
//!
//! [processing]
//! max_processes = 4          # Max parallel probe workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; override just the values you want:
//!
//! ```toml
//! [layout]
//! photos = "full-width"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{DimensionDefaults, Dimensions};
use crate::layout::LayoutStrategy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Prefix for every emitted asset URL (e.g. `"/portfolio"`).
    pub base_path: String,
    /// Cover URL for projects without a `cover.*` file, before `base_path`.
    pub placeholder_image: String,
    /// Where photos and projects live inside the content root.
    pub content: ContentConfig,
    /// Fallback sizes when a real measurement is unavailable.
    pub dimensions: DimensionsConfig,
    /// Default layout strategy per view.
    pub layout: LayoutConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            placeholder_image: "/images/placeholder.jpg".to_string(),
            content: ContentConfig::default(),
            dimensions: DimensionsConfig::default(),
            layout: LayoutConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, dims) in [
            ("dimensions.image_fallback", self.dimensions.image_fallback),
            ("dimensions.video", self.dimensions.video),
        ] {
            if dims[0] == 0 || dims[1] == 0 {
                return Err(ConfigError::Validation(format!(
                    "{key} values must be non-zero"
                )));
            }
        }
        for (key, dir) in [
            ("content.photos_dir", &self.content.photos_dir),
            ("content.projects_dir", &self.content.projects_dir),
        ] {
            if !is_single_component(dir) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a single directory name, got {dir:?}"
                )));
            }
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The base path as it is prefixed onto URLs: no trailing slash.
    pub fn url_prefix(&self) -> &str {
        self.base_path.trim_end_matches('/')
    }

    /// Prefix a site-absolute path (`/photos/x.jpg`) with the base path.
    pub fn asset_url(&self, site_path: &str) -> String {
        format!("{}/{}", self.url_prefix(), site_path.trim_start_matches('/'))
    }
}

fn is_single_component(dir: &str) -> bool {
    let mut components = Path::new(dir).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Content directory layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// Photo collection directory, relative to the content root.
    pub photos_dir: String,
    /// Projects directory, relative to the content root.
    pub projects_dir: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            photos_dir: "photos".to_string(),
            projects_dir: "projects".to_string(),
        }
    }
}

/// Fallback dimensions as `[width, height]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DimensionsConfig {
    /// Size assumed for images whose header can't be read.
    pub image_fallback: [u32; 2],
    /// Size assumed for every video.
    pub video: [u32; 2],
}

impl Default for DimensionsConfig {
    fn default() -> Self {
        Self {
            image_fallback: [800, 600],
            video: [1920, 1080],
        }
    }
}

impl DimensionsConfig {
    pub fn defaults(&self) -> DimensionDefaults {
        DimensionDefaults {
            image_fallback: Dimensions::from(self.image_fallback),
            video: Dimensions::from(self.video),
        }
    }
}

/// Which layout strategy each view uses unless the caller picks one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub photos: LayoutStrategy,
    pub projects: LayoutStrategy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            photos: LayoutStrategy::Bento,
            projects: LayoutStrategy::FullWidth,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel probe workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Loading
// =============================================================================

/// Name of the optional config file in the content root.
pub const CONFIG_FILE: &str = "config.toml";

/// [`SiteConfig::default`] as a TOML table: the layer user files are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    // Plain strings, arrays and an optional integer; serializing cannot fail.
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Deep-merge `overlay` onto `base`.
///
/// Tables merge per key, recursively. Any other overlay value (scalars,
/// arrays) replaces the base value outright.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut merged), toml::Value::Table(overrides)) => {
            for (key, value) in overrides {
                let value = match merged.remove(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => value,
                };
                merged.insert(key, value);
            }
            toml::Value::Table(merged)
        }
        (_, replacement) => replacement,
    }
}

/// Parse `config.toml` in `dir`, or `None` when the directory has none.
pub fn read_config_file(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    match fs::read_to_string(&path) {
        Ok(text) => Ok(Some(toml::from_str(&text)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Stock defaults, overridden by `config.toml` in the content root when
/// present, then checked with [`SiteConfig::validate`].
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let merged = match read_config_file(root)? {
        Some(user) => merge_toml(stock_defaults_value(), user),
        None => stock_defaults_value(),
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# folio configuration
# ===================
#
# Place this file in the content root. Every key is optional; anything you
# leave out keeps the value shown here. Unknown keys are rejected.

# URL subpath the site is deployed under (e.g. "/portfolio").
# Prefixed onto every asset URL. The BASE_PATH environment variable and
# the --base-path flag take precedence.
base_path = ""

# Cover shown for projects that have no cover.<ext> file.
placeholder_image = "/images/placeholder.jpg"

# ---------------------------------------------------------------------------
# Content layout
# ---------------------------------------------------------------------------
[content]
# Photo collection. Files directly inside it, plus one level of
# subdirectories (each subdirectory is a category).
photos_dir = "photos"

# One folder per project: meta.json, cover.<ext>, images/.
projects_dir = "projects"

# ---------------------------------------------------------------------------
# Dimensions
# ---------------------------------------------------------------------------
[dimensions]
# [width, height] used when an image header can't be read.
image_fallback = [800, 600]

# [width, height] assumed for every video (videos are not probed).
video = [1920, 1080]

# ---------------------------------------------------------------------------
# Layout
# ---------------------------------------------------------------------------
[layout]
# "bento": portraits first (up to 6), then landscapes (up to 3), then the
#          rest; portrait runs are grouped in threes.
# "full-width": original order; landscapes full width, portraits half.
photos = "bento"
projects = "full-width"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel probe workers. Omit to use every core.
# max_processes = 4
"##
}
