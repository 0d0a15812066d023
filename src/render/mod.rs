//! Drawing surfaces and pixel operations.
//!
//! The compositor paints through the [`Surface`] trait. [`CpuSurface`] is the production
//! implementation, rasterizing with `vello_cpu` and shaping text with `parley`.

/// Separable Gaussian blur and brightness scaling on premultiplied RGBA8.
pub mod blur;
/// `vello_cpu` surface.
pub mod cpu;
/// Surface trait, frames and layout helpers.
pub mod surface;
pub(crate) mod text;

pub use cpu::{CpuSurface, CpuSurfaceOpts};
pub use surface::{FrameRGBA, FrameTarget, Surface, TextAlign, contain_rect};

#[cfg(test)]
#[path = "../../tests/unit/support/recording_surface.rs"]
pub(crate) mod recording;
