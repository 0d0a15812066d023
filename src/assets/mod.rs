//! Asset loading and preparation.
//!
//! A [`project::Project`] manifest names the files; [`loader::RenderResources::load`] decodes them
//! in parallel, removes backgrounds, derives the silhouette and prepares gallery backdrops.

pub mod cutout;
/// Image decoding into premultiplied RGBA8.
pub mod decode;
/// System font discovery.
pub mod font;
/// Immutable raster images handed to surfaces.
pub mod image;
/// Parallel resource loading with per-asset fallbacks.
pub mod loader;
/// JSON project manifest.
pub mod project;

pub use self::image::RasterImage;
pub use loader::{GalleryPose, RenderResources};
pub use project::Project;

#[cfg(test)]
#[path = "../../tests/unit/support/fonts.rs"]
pub(crate) mod test_fonts;
