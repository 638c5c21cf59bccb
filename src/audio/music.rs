//! Procedural background music
//!
//! A looping note table played one short square tone at a time. The caller
//! supplies the clock so the sequencer stays deterministic under test.

use std::time::Duration;

use super::synth::{SoundBuffer, Waveform, synthesize};

/// Fraction of a note's slot that actually sounds
const NOTE_GATE: f64 = 0.9;
/// Per-note volume
const NOTE_VOLUME: f64 = 0.08;

/// The overworld loop: (frequency Hz, duration s)
pub const THEME: &[(f64, f64)] = &[
    // Intro
    (330.0, 0.15),
    (330.0, 0.15),
    (330.0, 0.30),
    (261.0, 0.15),
    (330.0, 0.30),
    (392.0, 0.60),
    (196.0, 0.60),
    // Main
    (261.0, 0.45),
    (196.0, 0.45),
    (164.0, 0.45),
    (220.0, 0.30),
    (246.0, 0.30),
    (233.0, 0.15),
    (220.0, 0.30),
];

/// Cyclic note scheduler
#[derive(Debug, Clone)]
pub struct MusicSequencer {
    notes: Vec<(f64, f64)>,
    cursor: usize,
    next_note_at: Duration,
    pub playing: bool,
}

impl Default for MusicSequencer {
    fn default() -> Self {
        Self::new(THEME.to_vec())
    }
}

impl MusicSequencer {
    pub fn new(notes: Vec<(f64, f64)>) -> Self {
        Self {
            notes,
            cursor: 0,
            next_note_at: Duration::ZERO,
            playing: true,
        }
    }

    /// Index of the note that plays next
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Time at which the next note is due
    pub fn next_note_at(&self) -> Duration {
        self.next_note_at
    }

    /// Advance the sequencer to `now`
    ///
    /// Returns the tone to submit when the current note is due, then moves the
    /// cursor (wrapping) and schedules the following note at `now + duration`.
    pub fn update(&mut self, now: Duration) -> Option<SoundBuffer> {
        if !self.playing || self.notes.is_empty() || now < self.next_note_at {
            return None;
        }

        let (freq, duration) = self.notes[self.cursor];
        let tone = synthesize(|_| freq, duration * NOTE_GATE, NOTE_VOLUME, Waveform::Square);

        self.next_note_at = now + Duration::from_millis((duration * 1000.0).round() as u64);
        self.cursor = (self.cursor + 1) % self.notes.len();
        Some(tone)
    }
}
