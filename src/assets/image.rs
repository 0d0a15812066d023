use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::error::{StudioError, StudioResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Decoded raster image in premultiplied RGBA8 form.
///
/// Cloning is cheap; pixel storage is shared. Every image constructed gets a process-unique id
/// that surfaces use as a paint cache key.
#[derive(Clone)]
pub struct RasterImage {
    id: u64,
    width: u32,
    height: u32,
    rgba8_premul: Arc<Vec<u8>>,
}

impl RasterImage {
    /// Wrap already premultiplied RGBA8 bytes.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> StudioResult<Self> {
        if width == 0 || height == 0 {
            return Err(StudioError::validation("image width/height must be > 0"));
        }
        if rgba8_premul.len() != (width as usize) * (height as usize) * 4 {
            return Err(StudioError::validation(
                "image byte length must equal width*height*4",
            ));
        }
        Ok(Self {
            id: NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed),
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Premultiply straight-alpha RGBA8 bytes and wrap them.
    pub fn from_straight(width: u32, height: u32, mut rgba8: Vec<u8>) -> StudioResult<Self> {
        premultiply_rgba8_in_place(&mut rgba8);
        Self::from_premul(width, height, rgba8)
    }

    /// Convert an `image` buffer (straight alpha).
    pub fn from_rgba_image(img: image::RgbaImage) -> StudioResult<Self> {
        let (w, h) = img.dimensions();
        Self::from_straight(w, h, img.into_raw())
    }

    /// Solid single-color image, used as a stand-in when an asset cannot be loaded.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> StudioResult<Self> {
        let px = (width as usize) * (height as usize);
        Self::from_straight(width, height, rgba.repeat(px))
    }

    /// Cache key unique to this image's pixel storage.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Premultiplied RGBA8 bytes, row-major, tightly packed.
    pub fn premul_bytes(&self) -> &[u8] {
        &self.rgba8_premul
    }

    /// Straight-alpha copy of the pixels, e.g. for PNG export.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.rgba8_premul.as_ref().clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("id", &self.id)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/image.rs"]
mod tests;
