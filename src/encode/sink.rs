use std::path::{Path, PathBuf};

use crate::foundation::error::{StudioError, StudioResult};
use crate::render::surface::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Output frames per second for sinks that produce a constant-rate stream.
    pub fps: u32,
}

impl SinkConfig {
    pub(crate) fn validate(&self) -> StudioResult<()> {
        if self.fps == 0 {
            return Err(StudioError::validation("fps must be non-zero"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(StudioError::validation("sink width/height must be non-zero"));
        }
        Ok(())
    }

    pub(crate) fn check_frame(&self, frame: &FrameRGBA) -> StudioResult<()> {
        if frame.width != self.width || frame.height != self.height {
            return Err(StudioError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Raw PCM audio handed to a sink when the recording completes.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioInputConfig {
    /// Path to interleaved `f32le` PCM data.
    pub path: PathBuf,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
}

/// Consumer of rendered frames.
///
/// Ordering contract: `push_frame` is called with non-decreasing `elapsed_ms`. `end` is called at
/// most once after a successful run; `abort` may be called at any time, any number of times, and
/// must release whatever the sink holds.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> StudioResult<()>;
    /// Push the frame painted at `elapsed_ms`.
    fn push_frame(&mut self, elapsed_ms: f64, frame: &FrameRGBA) -> StudioResult<()>;
    /// Finish the output. `audio` carries the mixed soundtrack when [`FrameSink::wants_audio`]
    /// returned `true`.
    fn end(&mut self, audio: Option<AudioInputConfig>) -> StudioResult<()>;
    /// Drop partial output. Idempotent.
    fn abort(&mut self) {}
    /// Return `true` when the sink muxes the mixed soundtrack into its output.
    fn wants_audio(&self) -> bool {
        false
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(f64, FrameRGBA)>,
    capture_audio: bool,
    audio: Option<(AudioInputConfig, Vec<f32>)>,
    ended: bool,
    aborted: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that also asks for the soundtrack and reads it back in `end`.
    pub fn with_audio() -> Self {
        Self {
            capture_audio: true,
            ..Self::default()
        }
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Captured frames with their elapsed time.
    pub fn frames(&self) -> &[(f64, FrameRGBA)] {
        &self.frames
    }

    /// Soundtrack read back in `end`.
    pub fn audio(&self) -> Option<&(AudioInputConfig, Vec<f32>)> {
        self.audio.as_ref()
    }

    /// Return `true` once `end` succeeded.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Return `true` once `abort` ran.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> StudioResult<()> {
        cfg.validate()?;
        self.cfg = Some(cfg);
        self.frames.clear();
        self.audio = None;
        self.ended = false;
        self.aborted = false;
        Ok(())
    }

    fn push_frame(&mut self, elapsed_ms: f64, frame: &FrameRGBA) -> StudioResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| StudioError::playback("in-memory sink not started"))?;
        cfg.check_frame(frame)?;
        self.frames.push((elapsed_ms, frame.clone()));
        Ok(())
    }

    fn end(&mut self, audio: Option<AudioInputConfig>) -> StudioResult<()> {
        if let Some(cfg) = audio {
            let samples = read_f32le_file(&cfg.path)?;
            self.audio = Some((cfg, samples));
        }
        self.ended = true;
        Ok(())
    }

    fn abort(&mut self) {
        self.frames.clear();
        self.aborted = true;
    }

    fn wants_audio(&self) -> bool {
        self.capture_audio
    }
}

/// Display sink that keeps only the most recent frame.
#[derive(Debug, Default)]
pub struct LatestFrameSink {
    cfg: Option<SinkConfig>,
    latest: Option<(f64, FrameRGBA)>,
    frames_seen: u64,
}

impl LatestFrameSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent frame and its elapsed time.
    pub fn latest(&self) -> Option<&(f64, FrameRGBA)> {
        self.latest.as_ref()
    }

    /// Number of frames pushed since `begin`.
    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    /// Write the most recent frame as a straight-alpha PNG.
    pub fn save_png(&self, path: &Path) -> StudioResult<()> {
        let (_, frame) = self
            .latest
            .as_ref()
            .ok_or_else(|| StudioError::playback("no frame has been displayed yet"))?;
        write_png(frame, path)
    }
}

impl FrameSink for LatestFrameSink {
    fn begin(&mut self, cfg: SinkConfig) -> StudioResult<()> {
        cfg.validate()?;
        self.cfg = Some(cfg);
        self.latest = None;
        self.frames_seen = 0;
        Ok(())
    }

    fn push_frame(&mut self, elapsed_ms: f64, frame: &FrameRGBA) -> StudioResult<()> {
        if let Some(cfg) = self.cfg.as_ref() {
            cfg.check_frame(frame)?;
        }
        self.latest = Some((elapsed_ms, frame.clone()));
        self.frames_seen += 1;
        Ok(())
    }

    fn end(&mut self, _audio: Option<AudioInputConfig>) -> StudioResult<()> {
        Ok(())
    }
}

/// Write `frame` as a straight-alpha PNG, creating parent directories.
pub fn write_png(frame: &FrameRGBA, path: &Path) -> StudioResult<()> {
    crate::encode::ffmpeg::ensure_parent_dir(path)?;
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.to_straight_rgba8())
        .ok_or_else(|| StudioError::validation("frame buffer does not match its dimensions"))?;
    img.save(path).map_err(|e| {
        StudioError::encode(format!("failed to write png '{}': {e}", path.display()))
    })
}

/// Read an interleaved little-endian `f32` PCM file.
pub fn read_f32le_file(path: &Path) -> StudioResult<Vec<f32>> {
    use anyhow::Context as _;
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read pcm file '{}'", path.display()))?;
    if !bytes.len().is_multiple_of(4) {
        return Err(StudioError::encode(format!(
            "pcm file '{}' is not a whole number of f32 samples",
            path.display()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
