//! Dimension resolution with fallbacks.
//!
//! Videos are never probed: they get a fixed resolution. Images are probed
//! through the backend; any failure (unreadable file, corrupt header, a
//! zero-sized result) is logged and replaced with the image fallback, so a
//! single bad file never stops indexing.

use super::backend::{Dimensions, ImageBackend};
use crate::types::MediaKind;
use std::path::Path;
use tracing::warn;

/// Fixed sizes used when a real measurement is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionDefaults {
    /// Used when an image cannot be probed.
    pub image_fallback: Dimensions,
    /// Used for every video.
    pub video: Dimensions,
}

impl Default for DimensionDefaults {
    fn default() -> Self {
        Self {
            image_fallback: Dimensions::new(800, 600),
            video: Dimensions::new(1920, 1080),
        }
    }
}

/// Resolve the dimensions of a media file. Always returns positive sizes.
pub fn probe_dimensions(
    backend: &impl ImageBackend,
    path: &Path,
    kind: MediaKind,
    defaults: &DimensionDefaults,
) -> Dimensions {
    if kind == MediaKind::Video {
        return defaults.video;
    }
    match backend.identify(path) {
        Ok(dims) if dims.is_positive() => dims,
        Ok(dims) => {
            warn!(
                path = %path.display(),
                width = dims.width,
                height = dims.height,
                "probe reported an empty image; using fallback dimensions"
            );
            defaults.image_fallback
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read image dimensions; using fallback");
            defaults.image_fallback
        }
    }
}
