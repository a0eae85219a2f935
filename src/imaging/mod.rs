//! Media dimension probing: pure Rust, header only.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Fallbacks** | fixed video size, configurable image fallback |
//!
//! The module is split into:
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: [`probe_dimensions`], which applies the fallback rules

pub mod backend;
pub mod operations;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use operations::{DimensionDefaults, probe_dimensions};
pub use rust_backend::RustBackend;
