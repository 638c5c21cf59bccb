//! Closed-form waveform synthesis
//!
//! Every sound in the game is generated here from a frequency function and a
//! linear decay envelope: no audio assets ship with the binary.

use rand::Rng;

use crate::consts::{CHANNELS, SAMPLE_RATE};

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Square,
    Triangle,
    /// Uniform white noise (frequency is ignored)
    Noise,
}

impl Waveform {
    /// Oscillator value in [-1, 1] at time `t` for frequency `freq`
    fn value<R: Rng + ?Sized>(self, freq: f64, t: f64, rng: &mut R) -> f64 {
        match self {
            Waveform::Square => {
                if (freq * t).rem_euclid(1.0) < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => {
                let phase = t * freq;
                2.0 * (2.0 * (phase - (phase + 0.5).floor())).abs() - 1.0
            }
            Waveform::Noise => rng.random_range(-1.0..=1.0),
        }
    }
}

/// Interleaved 16-bit stereo PCM at [`SAMPLE_RATE`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoundBuffer {
    pub samples: Vec<i16>,
}

impl SoundBuffer {
    /// Number of stereo frames (sample pairs)
    pub fn frames(&self) -> usize {
        self.samples.len() / CHANNELS as usize
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Playback length in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / SAMPLE_RATE as f64
    }

    /// Left-channel sample of a frame
    pub fn frame(&self, index: usize) -> Option<i16> {
        self.samples.get(index * CHANNELS as usize).copied()
    }
}

/// Linear decay envelope: 1 at the first sample, approaching 0 at the last
#[inline]
pub fn envelope(i: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    (1.0 - i as f64 / n as f64).max(0.0)
}

/// Synthesize a tone using the thread RNG for noise
pub fn synthesize<F>(freq: F, duration: f64, volume: f64, wave: Waveform) -> SoundBuffer
where
    F: Fn(f64) -> f64,
{
    synthesize_with_rng(freq, duration, volume, wave, &mut rand::rng())
}

/// Synthesize `duration` seconds of `wave` following `freq(t)` Hz
///
/// Each sample is `round(wave * 32767 * volume * envelope)`, written to both
/// channels. A non-positive duration yields an empty buffer.
pub fn synthesize_with_rng<F, R>(
    freq: F,
    duration: f64,
    volume: f64,
    wave: Waveform,
    rng: &mut R,
) -> SoundBuffer
where
    F: Fn(f64) -> f64,
    R: Rng + ?Sized,
{
    let n = (SAMPLE_RATE as f64 * duration.max(0.0)).round() as usize;
    let mut samples = Vec::with_capacity(n * CHANNELS as usize);

    for i in 0..n {
        let t = i as f64 / SAMPLE_RATE as f64;
        let v = wave.value(freq(t), t, rng);
        let amp = (v * 32767.0 * volume * envelope(i, n))
            .round()
            .clamp(i16::MIN as f64, i16::MAX as f64) as i16;
        for _ in 0..CHANNELS {
            samples.push(amp);
        }
    }

    SoundBuffer { samples }
}
