//! Synthesized one-shot sound effects.
//!
//! A tone is a single oscillator whose frequency and gain each move from a start to an end value
//! over the tone's duration, either linearly or exponentially.

use std::f64::consts::TAU;

/// Oscillator shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    /// Pure sine.
    Sine,
    /// Symmetric triangle.
    Triangle,
    /// Rising sawtooth.
    Sawtooth,
    /// 50% duty square.
    Square,
}

impl Waveform {
    /// Sample the waveform at `phase` in cycles (`[0, 1)`), starting at zero crossing.
    pub fn sample(self, phase: f64) -> f64 {
        let p = phase.rem_euclid(1.0);
        match self {
            Self::Sine => (TAU * p).sin(),
            Self::Triangle => {
                if p < 0.25 {
                    4.0 * p
                } else if p < 0.75 {
                    2.0 - 4.0 * p
                } else {
                    4.0 * p - 4.0
                }
            }
            Self::Sawtooth => 2.0 * (p + 0.5).rem_euclid(1.0) - 1.0,
            Self::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}

/// Interpolation between a start and an end value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ramp {
    /// Straight line.
    Linear,
    /// Constant ratio per unit time. Falls back to linear when the endpoints are not both
    /// strictly positive.
    Exponential,
}

impl Ramp {
    /// Value at `t` in `[0, 1]`.
    pub fn at(self, from: f64, to: f64, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Exponential if from > 0.0 && to > 0.0 => from * (to / from).powf(t),
            _ => from + (to - from) * t,
        }
    }
}

/// Parameters of one synthesized tone.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToneSpec {
    /// Oscillator shape.
    pub waveform: Waveform,
    /// Frequency at the start, in Hz.
    pub freq_start_hz: f64,
    /// Frequency at the end, in Hz.
    pub freq_end_hz: f64,
    /// Frequency interpolation.
    pub freq_ramp: Ramp,
    /// Linear gain at the start.
    pub gain_start: f64,
    /// Linear gain at the end.
    pub gain_end: f64,
    /// Gain interpolation.
    pub gain_ramp: Ramp,
    /// Length in seconds.
    pub duration_s: f64,
}

impl ToneSpec {
    /// Descending sine chime played when the creature is revealed.
    pub const PING: Self = Self {
        waveform: Waveform::Sine,
        freq_start_hz: 880.0,
        freq_end_hz: 110.0,
        freq_ramp: Ramp::Exponential,
        gain_start: 0.3,
        gain_end: 0.01,
        gain_ramp: Ramp::Exponential,
        duration_s: 0.5,
    };

    /// Rising triangle sweep played on each gallery pose change.
    pub const WHOOSH: Self = Self {
        waveform: Waveform::Triangle,
        freq_start_hz: 100.0,
        freq_end_hz: 800.0,
        freq_ramp: Ramp::Linear,
        gain_start: 0.1,
        gain_end: 0.01,
        gain_ramp: Ramp::Linear,
        duration_s: 0.3,
    };

    /// Falling sawtooth played when the card appears.
    pub const SWISH: Self = Self {
        waveform: Waveform::Sawtooth,
        freq_start_hz: 800.0,
        freq_end_hz: 100.0,
        freq_ramp: Ramp::Exponential,
        gain_start: 0.2,
        gain_end: 0.01,
        gain_ramp: Ramp::Exponential,
        duration_s: 0.2,
    };

    /// Lowest start frequency of a scan beep.
    pub const SCAN_MIN_START_HZ: f64 = 800.0;
    /// Width of the scan beep start frequency range.
    pub const SCAN_START_SPREAD_HZ: f64 = 400.0;

    /// Short square blip repeated during the scan. `start_hz` is usually in `[800, 1200)`.
    pub const fn scan(start_hz: f64) -> Self {
        Self {
            waveform: Waveform::Square,
            freq_start_hz: start_hz,
            freq_end_hz: 400.0,
            freq_ramp: Ramp::Linear,
            gain_start: 0.04,
            gain_end: 0.01,
            gain_ramp: Ramp::Linear,
            duration_s: 0.1,
        }
    }

    /// Number of mono samples this tone renders to at `sample_rate`.
    pub fn sample_len(&self, sample_rate: u32) -> usize {
        if !(self.duration_s.is_finite() && self.duration_s > 0.0) {
            return 0;
        }
        (self.duration_s * f64::from(sample_rate)).round() as usize
    }

    /// Render to mono `f32` samples.
    ///
    /// Phase is accumulated sample by sample so that frequency sweeps stay continuous.
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let n = self.sample_len(sample_rate);
        let mut out = Vec::with_capacity(n);
        let sr = f64::from(sample_rate);
        let mut phase = 0.0f64;
        for i in 0..n {
            let t = i as f64 / n as f64;
            let freq = self.freq_ramp.at(self.freq_start_hz, self.freq_end_hz, t);
            let gain = self.gain_ramp.at(self.gain_start, self.gain_end, t);
            out.push((self.waveform.sample(phase) * gain) as f32);
            phase = (phase + freq / sr).rem_euclid(1.0);
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/tone.rs"]
mod tests;
