use super::*;

#[test]
fn waveforms_start_at_zero_crossing_or_edge() {
    assert!(Waveform::Sine.sample(0.0).abs() < 1e-12);
    assert!(Waveform::Triangle.sample(0.0).abs() < 1e-12);
    assert!(Waveform::Sawtooth.sample(0.0).abs() < 1e-12);
    assert_eq!(Waveform::Square.sample(0.0), 1.0);
    assert_eq!(Waveform::Square.sample(0.75), -1.0);
    assert!((Waveform::Triangle.sample(0.25) - 1.0).abs() < 1e-12);
}

#[test]
fn exponential_ramp_hits_endpoints_and_geometric_midpoint() {
    let r = Ramp::Exponential;
    assert!((r.at(880.0, 110.0, 0.0) - 880.0).abs() < 1e-9);
    assert!((r.at(880.0, 110.0, 1.0) - 110.0).abs() < 1e-9);
    assert!((r.at(100.0, 400.0, 0.5) - 200.0).abs() < 1e-9);
    // Non-positive endpoints degrade to linear.
    assert!((r.at(0.0, 1.0, 0.5) - 0.5).abs() < 1e-12);
}

#[test]
fn preset_durations_match_sample_counts() {
    assert_eq!(ToneSpec::PING.sample_len(48_000), 24_000);
    assert_eq!(ToneSpec::WHOOSH.sample_len(48_000), 14_400);
    assert_eq!(ToneSpec::SWISH.sample_len(48_000), 9_600);
    assert_eq!(ToneSpec::scan(1000.0).sample_len(48_000), 4_800);
}

#[test]
fn rendered_tone_respects_gain_envelope() {
    let samples = ToneSpec::PING.render(48_000);
    assert_eq!(samples.len(), 24_000);
    let peak_head = samples[..2_000].iter().fold(0.0f32, |m, s| m.max(s.abs()));
    let peak_tail = samples[22_000..].iter().fold(0.0f32, |m, s| m.max(s.abs()));
    assert!(peak_head <= 0.3 + 1e-6);
    assert!(peak_head > 0.2);
    assert!(peak_tail < 0.02);
}

#[test]
fn zero_duration_renders_nothing() {
    let mut spec = ToneSpec::WHOOSH;
    spec.duration_s = 0.0;
    assert!(spec.render(48_000).is_empty());
}
