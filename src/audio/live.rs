use crate::audio::tone::ToneSpec;
use crate::audio::voice::VoiceOut;
use crate::audio::{AudioPcm, MIX_SAMPLE_RATE};
use crate::foundation::error::{StudioError, StudioResult};

/// Plays voices on the default output device the moment they fire.
///
/// Each voice gets its own `rodio` sink so that [`VoiceOut::silence`] can cut them all; finished
/// sinks are pruned as new voices start.
pub struct LiveAudio {
    _stream: rodio::OutputStream,
    handle: rodio::OutputStreamHandle,
    voices: Vec<rodio::Sink>,
}

impl std::fmt::Debug for LiveAudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveAudio")
            .field("voices", &self.voices.len())
            .finish_non_exhaustive()
    }
}

impl LiveAudio {
    /// Open the system's default output device.
    pub fn open_default() -> StudioResult<Self> {
        let (stream, handle) = rodio::OutputStream::try_default()
            .map_err(|e| StudioError::setup(format!("failed to open audio output: {e}")))?;
        Ok(Self {
            _stream: stream,
            handle,
            voices: Vec::new(),
        })
    }

    /// Voices still queued or playing.
    pub fn active_voices(&mut self) -> usize {
        self.voices.retain(|sink| !sink.empty());
        self.voices.len()
    }

    fn play(&mut self, channels: u16, sample_rate: u32, samples: Vec<f32>) -> StudioResult<()> {
        if channels == 0 || sample_rate == 0 {
            return Err(StudioError::validation("voice has zero sample rate or channels"));
        }
        let sink = rodio::Sink::try_new(&self.handle)
            .map_err(|e| StudioError::playback(format!("audio output rejected voice: {e}")))?;
        sink.append(rodio::buffer::SamplesBuffer::new(
            channels,
            sample_rate,
            samples,
        ));
        self.voices.retain(|sink| !sink.empty());
        self.voices.push(sink);
        Ok(())
    }
}

impl VoiceOut for LiveAudio {
    fn play_clip(&mut self, _at_ms: f64, clip: &AudioPcm) -> StudioResult<()> {
        self.play(
            clip.channels,
            clip.sample_rate,
            clip.interleaved_f32.as_ref().clone(),
        )
    }

    fn play_tone(&mut self, _at_ms: f64, tone: &ToneSpec) -> StudioResult<()> {
        self.play(1, MIX_SAMPLE_RATE, tone.render(MIX_SAMPLE_RATE))
    }

    fn silence(&mut self) {
        for sink in self.voices.drain(..) {
            sink.stop();
        }
    }
}

impl Drop for LiveAudio {
    fn drop(&mut self) {
        self.silence();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/live.rs"]
mod tests;
