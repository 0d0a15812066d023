use super::*;
use crate::audio::wav::pcm16_to_wav;

#[test]
fn wav_files_decode_without_ffmpeg() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("speech.wav");
    let pcm: Vec<u8> = [0i16, 1000, -1000, 0]
        .iter()
        .flat_map(|s| s.to_le_bytes())
        .collect();
    std::fs::write(&path, pcm16_to_wav(&pcm, 24_000).unwrap()).unwrap();

    let audio = load_audio_file(&path, 48_000).unwrap();
    assert_eq!(audio.sample_rate, 24_000);
    assert_eq!(audio.channels, 1);
    assert_eq!(audio.frames(), 4);
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_audio_file(&dir.path().join("nope.mp3"), 48_000).is_err());
}

#[test]
fn f32le_bytes_must_be_aligned() {
    assert!(pcm_from_f32le(&[0, 0, 0], 48_000, 2).is_err());
    let bytes: Vec<u8> = [0.5f32, -0.5].iter().flat_map(|s| s.to_le_bytes()).collect();
    let pcm = pcm_from_f32le(&bytes, 48_000, 2).unwrap();
    assert_eq!(pcm.frames(), 1);
    assert_eq!(pcm.interleaved_f32.as_slice(), &[0.5, -0.5]);
}
