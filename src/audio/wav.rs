//! RIFF/WAVE container support.
//!
//! [`pcm16_to_wav`] wraps raw mono 16-bit speech PCM in the canonical 44-byte header. The layout is
//! a fixed contract that players depend on, byte for byte.

use crate::audio::AudioPcm;
use crate::foundation::error::{StudioError, StudioResult};

/// Sample rate of raw narration PCM when none is given.
pub const DEFAULT_PCM_SAMPLE_RATE: u32 = 24_000;
/// Size of the canonical header written by [`pcm16_to_wav`].
pub const WAV_HEADER_LEN: usize = 44;

const PCM_CHANNELS: u16 = 1;
const PCM_BITS_PER_SAMPLE: u16 = 16;

const FORMAT_PCM: u16 = 1;
const FORMAT_IEEE_FLOAT: u16 = 3;
const FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// Wrap raw little-endian mono 16-bit PCM in a WAV header.
///
/// The output is exactly `44 + pcm.len()` bytes; `pcm` is copied verbatim after the header.
pub fn pcm16_to_wav(pcm: &[u8], sample_rate: u32) -> StudioResult<Vec<u8>> {
    let data_size = u32::try_from(pcm.len())
        .ok()
        .filter(|n| *n <= u32::MAX - 36)
        .ok_or_else(|| StudioError::validation("pcm payload too large for a WAV file"))?;
    let block_align = PCM_CHANNELS * PCM_BITS_PER_SAMPLE / 8;
    let byte_rate = sample_rate
        .checked_mul(u32::from(block_align))
        .ok_or_else(|| StudioError::validation("sample rate too large for a WAV header"))?;

    let mut out = Vec::with_capacity(WAV_HEADER_LEN + pcm.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_size).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&FORMAT_PCM.to_le_bytes());
    out.extend_from_slice(&PCM_CHANNELS.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&PCM_BITS_PER_SAMPLE.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_size.to_le_bytes());
    out.extend_from_slice(pcm);
    Ok(out)
}

/// Return `true` when `bytes` start with a RIFF/WAVE signature.
pub fn is_wav(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE"
}

#[derive(Clone, Copy, Debug)]
struct FmtChunk {
    format: u16,
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
}

/// Decode a PCM (8/16/24/32-bit integer) or 32-bit float WAV file.
///
/// Unknown chunks are skipped. A `data` chunk shorter than declared (truncated download) is read
/// up to the available bytes.
pub fn decode_wav(bytes: &[u8]) -> StudioResult<AudioPcm> {
    if !is_wav(bytes) {
        return Err(StudioError::asset("not a RIFF/WAVE file"));
    }

    let mut fmt: Option<FmtChunk> = None;
    let mut data: Option<&[u8]> = None;
    let mut pos = 12usize;
    while pos + 8 <= bytes.len() {
        let id = &bytes[pos..pos + 4];
        let size = u32::from_le_bytes([
            bytes[pos + 4],
            bytes[pos + 5],
            bytes[pos + 6],
            bytes[pos + 7],
        ]) as usize;
        let body_start = pos + 8;
        let body_end = body_start.saturating_add(size).min(bytes.len());
        let body = &bytes[body_start..body_end];

        match id {
            b"fmt " => fmt = Some(parse_fmt(body)?),
            b"data" => {
                data = Some(body);
                break;
            }
            _ => {}
        }
        // Chunks are word aligned.
        pos = body_start.saturating_add(size).saturating_add(size & 1);
    }

    let fmt = fmt.ok_or_else(|| StudioError::asset("WAV file has no fmt chunk"))?;
    let data = data.ok_or_else(|| StudioError::asset("WAV file has no data chunk"))?;
    if fmt.channels == 0 || fmt.sample_rate == 0 {
        return Err(StudioError::asset("WAV fmt chunk declares zero channels or rate"));
    }

    let mut samples: Vec<f32> = match (fmt.format, fmt.bits_per_sample) {
        (FORMAT_PCM, 8) => data.iter().map(|&b| (f32::from(b) - 128.0) / 128.0).collect(),
        (FORMAT_PCM, 16) => data
            .chunks_exact(2)
            .map(|c| f32::from(i16::from_le_bytes([c[0], c[1]])) / 32768.0)
            .collect(),
        (FORMAT_PCM, 24) => data
            .chunks_exact(3)
            .map(|c| {
                let v = i32::from_le_bytes([0, c[0], c[1], c[2]]) >> 8;
                v as f32 / 8_388_608.0
            })
            .collect(),
        (FORMAT_PCM, 32) => data
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f32 / 2_147_483_648.0)
            .collect(),
        (FORMAT_IEEE_FLOAT, 32) => data
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
        (format, bits) => {
            return Err(StudioError::asset(format!(
                "unsupported WAV encoding (format {format}, {bits} bits)"
            )));
        }
    };

    let ch = usize::from(fmt.channels);
    samples.truncate(samples.len() - samples.len() % ch);
    AudioPcm::new(fmt.sample_rate, fmt.channels, samples)
}

fn parse_fmt(body: &[u8]) -> StudioResult<FmtChunk> {
    if body.len() < 16 {
        return Err(StudioError::asset("WAV fmt chunk is too short"));
    }
    let u16_at = |i: usize| u16::from_le_bytes([body[i], body[i + 1]]);
    let mut format = u16_at(0);
    if format == FORMAT_EXTENSIBLE && body.len() >= 26 {
        // The sub-format GUID starts with the actual format tag.
        format = u16_at(24);
    }
    Ok(FmtChunk {
        format,
        channels: u16_at(2),
        sample_rate: u32::from_le_bytes([body[4], body[5], body[6], body[7]]),
        bits_per_sample: u16_at(14),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/wav.rs"]
mod tests;
