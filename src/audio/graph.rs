use std::path::Path;
use std::sync::Arc;

use crate::audio::AudioPcm;
use crate::audio::tone::ToneSpec;
use crate::foundation::error::{StudioError, StudioResult};

const OUTPUT_CHANNELS: u16 = 2;

#[derive(Clone, Debug)]
struct Voice {
    start_sample: u64,
    source_rate: u32,
    source_channels: u16,
    source: Arc<Vec<f32>>,
    gain: f32,
}

/// Accumulates everything that should be audible in a recording.
///
/// Clips and tones are scheduled at the elapsed instant they fire and only mixed down when the
/// recording completes. Once closed the graph rejects new voices.
#[derive(Debug)]
pub struct AudioGraph {
    sample_rate: u32,
    voices: Vec<Voice>,
    closed: bool,
}

impl AudioGraph {
    /// Create an empty graph mixing at `sample_rate`.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            voices: Vec::new(),
            closed: false,
        }
    }

    /// Output sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Output channel count (always stereo).
    pub fn channels(&self) -> u16 {
        OUTPUT_CHANNELS
    }

    /// Number of voices scheduled so far.
    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    /// Return `true` after [`AudioGraph::close`].
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Start `clip` at `at_ms` on the output timeline.
    pub fn play_clip(&mut self, at_ms: f64, clip: &AudioPcm) -> StudioResult<()> {
        self.push_voice(
            at_ms,
            Voice {
                start_sample: 0,
                source_rate: clip.sample_rate,
                source_channels: clip.channels,
                source: Arc::clone(&clip.interleaved_f32),
                gain: 1.0,
            },
        )
    }

    /// Synthesize `tone` and start it at `at_ms`.
    pub fn play_tone(&mut self, at_ms: f64, tone: &ToneSpec) -> StudioResult<()> {
        let samples = tone.render(self.sample_rate);
        self.push_voice(
            at_ms,
            Voice {
                start_sample: 0,
                source_rate: self.sample_rate,
                source_channels: 1,
                source: Arc::new(samples),
                gain: 1.0,
            },
        )
    }

    fn push_voice(&mut self, at_ms: f64, mut voice: Voice) -> StudioResult<()> {
        if self.closed {
            return Err(StudioError::playback("audio graph is closed"));
        }
        if voice.source_rate == 0 || voice.source_channels == 0 {
            return Err(StudioError::validation("voice has zero sample rate or channels"));
        }
        voice.start_sample = ms_to_sample(at_ms, self.sample_rate);
        self.voices.push(voice);
        Ok(())
    }

    /// Mix all voices into `total_ms` of interleaved stereo, clamped to `[-1, 1]`.
    ///
    /// Voices that run past the end are cut; mono voices are duplicated to both channels.
    pub fn mix(&self, total_ms: f64) -> Vec<f32> {
        let frames = ms_to_sample(total_ms, self.sample_rate) as usize;
        let mut out = vec![0.0f32; frames * usize::from(OUTPUT_CHANNELS)];
        for voice in &self.voices {
            mix_voice(&mut out, self.sample_rate, voice);
        }
        for s in &mut out {
            *s = s.clamp(-1.0, 1.0);
        }
        out
    }

    /// Drop every scheduled voice and refuse new ones. Idempotent.
    pub fn close(&mut self) {
        if !self.closed {
            tracing::debug!(voices = self.voices.len(), "audio graph closed");
        }
        self.voices.clear();
        self.closed = true;
    }
}

fn mix_voice(out: &mut [f32], sample_rate: u32, voice: &Voice) {
    let ch = usize::from(OUTPUT_CHANNELS);
    let out_frames = out.len() / ch;
    let src = voice.source.as_slice();
    let src_ch = usize::from(voice.source_channels);
    let src_frames = src.len() / src_ch;
    if src_frames == 0 {
        return;
    }

    let step = f64::from(voice.source_rate) / f64::from(sample_rate);
    let start = voice.start_sample as usize;
    for dst_frame in start..out_frames {
        let src_pos = (dst_frame - start) as f64 * step;
        let f0 = src_pos.floor() as usize;
        if f0 >= src_frames {
            break;
        }
        let f1 = (f0 + 1).min(src_frames - 1);
        let frac = (src_pos - f0 as f64) as f32;

        let lerp = |c: usize| {
            let a = src[f0 * src_ch + c];
            let b = src[f1 * src_ch + c];
            a + (b - a) * frac
        };
        let (l, r) = if src_ch == 1 {
            let v = lerp(0);
            (v, v)
        } else {
            (lerp(0), lerp(1))
        };

        let i = dst_frame * ch;
        out[i] += l * voice.gain;
        out[i + 1] += r * voice.gain;
    }
}

/// Convert milliseconds to the nearest sample index at `sample_rate`. Negative times map to 0.
pub fn ms_to_sample(ms: f64, sample_rate: u32) -> u64 {
    if !(ms.is_finite() && ms > 0.0) {
        return 0;
    }
    (ms * f64::from(sample_rate) / 1000.0).round() as u64
}

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
pub fn write_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> StudioResult<()> {
    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        StudioError::encode(format!(
            "failed to write mixed audio file '{}': {e}",
            out_path.display()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/graph.rs"]
mod tests;
