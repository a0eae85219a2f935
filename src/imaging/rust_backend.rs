//! Pure Rust probing backend built on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify (JPEG, PNG, GIF, WebP) | `image::image_dimensions` (header only) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use std::path::Path;

/// Header-only dimension reader.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| match e {
            image::ImageError::IoError(io) => BackendError::Io(io),
            other => BackendError::ProcessingFailed(format!(
                "Failed to read dimensions of {}: {}",
                path.display(),
                other
            )),
        })?;
        Ok(Dimensions { width, height })
    }
}
