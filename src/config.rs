//! Studio options shared by the CLI and library callers.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::assets::font::discover_system_font;
use crate::encode::ffmpeg::{DEFAULT_VIDEO_BITRATE_KBPS, FfmpegSinkOpts};
use crate::foundation::core::Canvas;
use crate::foundation::error::{StudioError, StudioResult};
use crate::render::cpu::CpuSurfaceOpts;

/// Recorded frame rate.
pub const DEFAULT_FPS: u32 = 30;
/// Target interval between realtime ticks (display refresh).
pub const DEFAULT_TICK_MS: f64 = 1000.0 / 60.0;

/// Options for a studio run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudioOpts {
    /// Drawing canvas. Scene layouts are authored for [`Canvas::STAGE`].
    pub canvas: Canvas,
    /// Frame rate of recorded and previewed streams.
    pub fps: u32,
    /// H.264 bitrate in kbit/s.
    pub video_bitrate_kbps: u32,
    /// Replace an existing output file.
    pub overwrite: bool,
    /// Color transparent pixels are flattened onto (straight RGBA8).
    pub bg_rgba: [u8; 4],
    /// Font for every on-screen text. `None` discovers a bold sans-serif system face.
    pub font_path: Option<PathBuf>,
    /// Interval between realtime ticks in milliseconds.
    pub tick_ms: f64,
}

impl Default for StudioOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas::STAGE,
            fps: DEFAULT_FPS,
            video_bitrate_kbps: DEFAULT_VIDEO_BITRATE_KBPS,
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
            font_path: None,
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}

impl StudioOpts {
    /// Reject values no run could use.
    pub fn validate(&self) -> StudioResult<()> {
        if self.fps == 0 {
            return Err(StudioError::validation("fps must be non-zero"));
        }
        if self.video_bitrate_kbps == 0 {
            return Err(StudioError::validation("video bitrate must be non-zero"));
        }
        if !(self.tick_ms.is_finite() && self.tick_ms > 0.0) {
            return Err(StudioError::validation(
                "tick interval must be finite and positive",
            ));
        }
        Ok(())
    }

    /// Read the font bytes.
    ///
    /// A configured font that cannot be read is a setup error, and so is finding no usable system
    /// font when none is configured.
    pub fn load_font(&self) -> StudioResult<Arc<Vec<u8>>> {
        match self.font_path.as_deref() {
            Some(path) => {
                let bytes = std::fs::read(path).map_err(|e| {
                    StudioError::setup(format!("failed to read font '{}': {e}", path.display()))
                })?;
                Ok(Arc::new(bytes))
            }
            None => discover_system_font(),
        }
    }

    /// Surface options for this run.
    pub fn surface_opts(&self) -> StudioResult<CpuSurfaceOpts> {
        Ok(CpuSurfaceOpts {
            font_bytes: self.load_font()?,
            clear_rgba: None,
        })
    }

    /// Encoder options for writing to `out_path`.
    pub fn ffmpeg_opts(&self, out_path: impl Into<PathBuf>) -> FfmpegSinkOpts {
        let mut opts = FfmpegSinkOpts::new(out_path);
        opts.overwrite = self.overwrite;
        opts.bg_rgba = self.bg_rgba;
        opts.video_bitrate_kbps = self.video_bitrate_kbps;
        opts
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
