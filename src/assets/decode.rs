use anyhow::Context;

use crate::assets::image::RasterImage;
use crate::foundation::error::StudioResult;

/// Decode encoded image bytes into a straight-alpha RGBA8 buffer.
///
/// Pixel processing (background removal, silhouettes) runs on this form before premultiplying.
pub fn decode_rgba8(bytes: &[u8]) -> StudioResult<image::RgbaImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(dyn_img.to_rgba8())
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> StudioResult<RasterImage> {
    RasterImage::from_rgba_image(decode_rgba8(bytes)?)
}

/// Encode a straight-alpha RGBA8 buffer as PNG bytes.
pub fn encode_png(rgba8: &[u8], width: u32, height: u32) -> StudioResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(width, height, rgba8.to_vec())
        .context("png buffer does not match width*height*4")?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
