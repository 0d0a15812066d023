//! Pixel-level asset preparation: corner flood-fill background removal and silhouettes.
//!
//! Both operate on straight-alpha RGBA8 so that color channels are left exactly as decoded.

/// A pixel is background when R, G and B all exceed this value.
pub const BACKGROUND_THRESHOLD: u8 = 230;
/// A pixel is dropped from a silhouette when R, G and B all exceed this value.
pub const SILHOUETTE_WHITE_THRESHOLD: u8 = 240;
/// A pixel is dropped from a silhouette when its alpha is below this value.
pub const SILHOUETTE_MIN_ALPHA: u8 = 50;

fn is_background(px: &[u8]) -> bool {
    px[0] > BACKGROUND_THRESHOLD && px[1] > BACKGROUND_THRESHOLD && px[2] > BACKGROUND_THRESHOLD
}

/// Make the near-white region connected to the image corners transparent.
///
/// Region growing is 4-connected and seeded from the four corners. Only alpha changes; enclosed
/// white areas (eyes, teeth, highlights) are unreachable from the border and stay opaque.
/// Returns the number of pixels cleared.
pub fn remove_background(img: &mut image::RgbaImage) -> usize {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return 0;
    }
    let (w, h) = (w as usize, h as usize);
    let data: &mut [u8] = img;

    let mut visited = vec![false; w * h];
    let mut stack: Vec<usize> = Vec::new();

    for (cx, cy) in [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)] {
        let pos = cy * w + cx;
        if !visited[pos] && is_background(&data[pos * 4..pos * 4 + 4]) {
            visited[pos] = true;
            stack.push(pos);
        }
    }

    let mut cleared = 0usize;
    while let Some(pos) = stack.pop() {
        data[pos * 4 + 3] = 0;
        cleared += 1;

        let (x, y) = (pos % w, pos / w);
        let mut visit = |n: usize| {
            if !visited[n] && is_background(&data[n * 4..n * 4 + 4]) {
                visited[n] = true;
                stack.push(n);
            }
        };
        if x + 1 < w {
            visit(pos + 1);
        }
        if x > 0 {
            visit(pos - 1);
        }
        if y + 1 < h {
            visit(pos + w);
        }
        if y > 0 {
            visit(pos - w);
        }
    }

    tracing::debug!(cleared, total = w * h, "background removed");
    cleared
}

/// Turn every near-white or near-transparent pixel transparent and every other pixel solid black.
pub fn make_silhouette(img: &mut image::RgbaImage) {
    for px in img.pixels_mut() {
        let [r, g, b, a] = px.0;
        let white = r > SILHOUETTE_WHITE_THRESHOLD
            && g > SILHOUETTE_WHITE_THRESHOLD
            && b > SILHOUETTE_WHITE_THRESHOLD;
        if white || a < SILHOUETTE_MIN_ALPHA {
            px.0[3] = 0;
        } else {
            px.0 = [0, 0, 0, 255];
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cutout.rs"]
mod tests;
