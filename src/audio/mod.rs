//! Audio decoding, synthesis and mixing.
//!
//! Everything is normalized to interleaved `f32` PCM. Narration clips and synthesized tones are
//! placed on an [`graph::AudioGraph`] at the instant they fire and mixed down to stereo at
//! [`MIX_SAMPLE_RATE`] when a recording completes. A preview can play the same voices live
//! through any [`voice::VoiceOut`].

use std::sync::Arc;

use crate::foundation::error::{StudioError, StudioResult};

/// Voice scheduling and stereo mixdown.
pub mod graph;
/// Live playback on the default output device.
#[cfg(feature = "live-audio")]
pub mod live;
/// Narration file decoding.
pub mod media;
pub mod tone;
/// Destinations for cue voices.
pub mod voice;
pub mod wav;

/// Internal mixing sample rate used across decode/mix/encode.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

/// Decoded interleaved floating-point PCM.
///
/// Cloning is cheap; samples are shared.
#[derive(Clone, PartialEq)]
pub struct AudioPcm {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Interleaved `f32` samples in `[-1, 1]`.
    pub interleaved_f32: Arc<Vec<f32>>,
}

impl AudioPcm {
    /// Wrap interleaved samples after validating the layout.
    pub fn new(sample_rate: u32, channels: u16, interleaved_f32: Vec<f32>) -> StudioResult<Self> {
        if sample_rate == 0 {
            return Err(StudioError::validation("audio sample_rate must be non-zero"));
        }
        if channels == 0 {
            return Err(StudioError::validation("audio channels must be non-zero"));
        }
        if !interleaved_f32.len().is_multiple_of(usize::from(channels)) {
            return Err(StudioError::validation(
                "interleaved sample count must be a multiple of the channel count",
            ));
        }
        Ok(Self {
            sample_rate,
            channels,
            interleaved_f32: Arc::new(interleaved_f32),
        })
    }

    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> usize {
        self.interleaved_f32.len() / usize::from(self.channels.max(1))
    }

    /// Playback length in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 * 1000.0 / f64::from(self.sample_rate)
    }

    /// Return `true` when there are no samples.
    pub fn is_empty(&self) -> bool {
        self.interleaved_f32.is_empty()
    }
}

impl std::fmt::Debug for AudioPcm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioPcm")
            .field("sample_rate", &self.sample_rate)
            .field("channels", &self.channels)
            .field("frames", &self.frames())
            .finish()
    }
}
