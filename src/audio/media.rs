use std::path::Path;

use anyhow::Context;

use crate::audio::AudioPcm;
use crate::audio::wav::{decode_wav, is_wav};
use crate::foundation::error::{StudioError, StudioResult};

/// Load an audio file as interleaved `f32` PCM.
///
/// WAV files are decoded in-process at their native rate and layout; anything else (MP3, OGG,
/// AAC, ...) goes through the system `ffmpeg`, resampled to stereo at `fallback_rate`.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_audio_file(path: &Path, fallback_rate: u32) -> StudioResult<AudioPcm> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read audio file '{}'", path.display()))?;
    if is_wav(&bytes) {
        match decode_wav(&bytes) {
            Ok(pcm) => return Ok(pcm),
            Err(e) => tracing::debug!("in-process WAV decode failed, trying ffmpeg: {e}"),
        }
    }
    decode_audio_f32_stereo(path, fallback_rate)
}

/// Decode audio from any media file to stereo interleaved `f32` PCM through `ffmpeg`.
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> StudioResult<AudioPcm> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "2",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| StudioError::asset(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        return Err(StudioError::asset(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    pcm_from_f32le(&out.stdout, sample_rate, 2)
}

/// Reinterpret raw little-endian `f32` bytes as interleaved PCM.
pub fn pcm_from_f32le(bytes: &[u8], sample_rate: u32, channels: u16) -> StudioResult<AudioPcm> {
    if !bytes.len().is_multiple_of(4) {
        return Err(StudioError::asset(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let mut pcm = Vec::<f32>::with_capacity(bytes.len() / 4);
    for chunk in bytes.chunks_exact(4) {
        pcm.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    let ch = usize::from(channels.max(1));
    pcm.truncate(pcm.len() - pcm.len() % ch);
    AudioPcm::new(sample_rate, channels, pcm)
}

#[cfg(test)]
#[path = "../../tests/unit/audio/media.rs"]
mod tests;
