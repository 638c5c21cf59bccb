//! Audio system
//!
//! Procedurally generated sound effects and music - no external files needed!
//! Playback goes through an [`AudioOutput`]; when no device is available the
//! [`NullOutput`] turns every call into a no-op and gameplay is unaffected.

pub mod music;
#[cfg(feature = "playback")]
pub mod rodio_output;
pub mod synth;

use std::collections::HashMap;

pub use music::MusicSequencer;
pub use synth::{SoundBuffer, Waveform, synthesize, synthesize_with_rng};

use crate::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Small player jumps
    Jump,
    /// Big player jumps
    JumpBig,
    /// Enemy stomped
    Stomp,
    /// Shell kicked or shell knocks out an enemy
    Kick,
    /// Coin collected
    Coin,
    /// Brick bumped from below
    Bump,
    /// Mushroom collected
    PowerUp,
    /// Big player demoted to small
    Break,
    /// Player died
    Die,
    /// Pause toggled
    Pause,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 10] = [
        SoundEffect::Jump,
        SoundEffect::JumpBig,
        SoundEffect::Stomp,
        SoundEffect::Kick,
        SoundEffect::Coin,
        SoundEffect::Bump,
        SoundEffect::PowerUp,
        SoundEffect::Break,
        SoundEffect::Die,
        SoundEffect::Pause,
    ];

    /// Synthesize this effect's sample buffer
    pub fn generate(self) -> SoundBuffer {
        match self {
            SoundEffect::Jump => synthesize(|t| 150.0 + t * 300.0, 0.15, 0.15, Waveform::Square),
            SoundEffect::JumpBig => synthesize(|t| 100.0 + t * 200.0, 0.2, 0.15, Waveform::Square),
            SoundEffect::Stomp => synthesize(|t| 300.0 - t * 900.0, 0.1, 0.2, Waveform::Square),
            SoundEffect::Kick => synthesize(|t| 500.0 - t * 900.0, 0.1, 0.2, Waveform::Square),
            SoundEffect::Coin => synthesize(
                |t| if t < 0.05 { 1174.0 } else { 1568.0 },
                0.3,
                0.15,
                Waveform::Square,
            ),
            SoundEffect::Bump => synthesize(|t| 100.0 - t * 100.0, 0.1, 0.2, Waveform::Square),
            SoundEffect::PowerUp => synthesize(
                |t| {
                    const ARPEGGIO: [f64; 4] = [523.0, 659.0, 784.0, 1047.0];
                    ARPEGGIO[((t / 0.1) as usize).min(ARPEGGIO.len() - 1)]
                },
                0.4,
                0.15,
                Waveform::Square,
            ),
            SoundEffect::Break => synthesize(|_| 0.0, 0.15, 0.2, Waveform::Noise),
            SoundEffect::Die => synthesize(|t| 400.0 - t * 150.0, 2.5, 0.3, Waveform::Square),
            SoundEffect::Pause => synthesize(
                |t| if (t * 10.0) % 2.0 < 1.0 { 600.0 } else { 0.0 },
                0.4,
                0.2,
                Waveform::Triangle,
            ),
        }
    }

    /// Cue for a gameplay event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<SoundEffect> {
        match event {
            GameEvent::Jump { big: false } => Some(SoundEffect::Jump),
            GameEvent::Jump { big: true } => Some(SoundEffect::JumpBig),
            GameEvent::Stomp => Some(SoundEffect::Stomp),
            GameEvent::Kick | GameEvent::ShellHit => Some(SoundEffect::Kick),
            GameEvent::Coin => Some(SoundEffect::Coin),
            GameEvent::Bump => Some(SoundEffect::Bump),
            GameEvent::PowerUp => Some(SoundEffect::PowerUp),
            GameEvent::Shrink => Some(SoundEffect::Break),
            GameEvent::Die => Some(SoundEffect::Die),
            GameEvent::Paused | GameEvent::Resumed => Some(SoundEffect::Pause),
            GameEvent::StageClear => None,
        }
    }
}

/// Logical mixer channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Overlapping one-shot effects
    Effects,
    /// Single voice: a new buffer cuts the previous one
    Music,
}

/// Host audio device
///
/// Submitting a buffer never blocks the simulation and gives no guarantee
/// about completion order.
pub trait AudioOutput {
    /// Queue a buffer for playback at `gain`
    fn play(&mut self, buffer: &SoundBuffer, channel: Channel, gain: f32) -> crate::Result<()>;
    /// Suspend everything currently playing
    fn pause_all(&mut self);
    /// Resume everything suspended by [`AudioOutput::pause_all`]
    fn resume_all(&mut self);
    /// True when this output discards everything
    fn is_null(&self) -> bool {
        false
    }
}

/// Output used when no audio device is available
#[derive(Debug, Default, Clone, Copy)]
pub struct NullOutput;

impl AudioOutput for NullOutput {
    fn play(&mut self, _buffer: &SoundBuffer, _channel: Channel, _gain: f32) -> crate::Result<()> {
        Ok(())
    }

    fn pause_all(&mut self) {}

    fn resume_all(&mut self) {}

    fn is_null(&self) -> bool {
        true
    }
}

/// Open the best available output, degrading to [`NullOutput`]
pub fn open_output(settings: &Settings) -> Box<dyn AudioOutput> {
    if settings.muted {
        log::info!("Audio muted - not opening a device");
        return Box::new(NullOutput);
    }

    #[cfg(feature = "playback")]
    {
        match rodio_output::RodioOutput::try_new() {
            Ok(output) => {
                log::info!("Audio output opened (rodio)");
                return Box::new(output);
            }
            Err(e) => log::warn!("{e} - audio disabled"),
        }
    }

    #[cfg(not(feature = "playback"))]
    log::info!("Built without the `playback` feature - audio disabled");

    Box::new(NullOutput)
}

/// Audio manager for the game
pub struct AudioManager {
    output: Box<dyn AudioOutput>,
    effects: HashMap<SoundEffect, SoundBuffer>,
    sfx_gain: f32,
    music_gain: f32,
    paused: bool,
}

impl AudioManager {
    /// Wrap an output, pre-synthesizing every effect if it can play
    pub fn new(output: Box<dyn AudioOutput>, settings: &Settings) -> Self {
        let effects = if output.is_null() {
            HashMap::new()
        } else {
            SoundEffect::ALL
                .iter()
                .map(|&effect| (effect, effect.generate()))
                .collect()
        };

        Self {
            output,
            effects,
            sfx_gain: settings.sfx_gain(),
            music_gain: settings.music_gain(),
            paused: false,
        }
    }

    /// Manager with no device attached
    pub fn disabled(settings: &Settings) -> Self {
        Self::new(Box::new(NullOutput), settings)
    }

    /// True when a real device is attached
    pub fn is_enabled(&self) -> bool {
        !self.output.is_null()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        if self.sfx_gain <= 0.0 {
            return;
        }
        let Some(buffer) = self.effects.get(&effect) else {
            return;
        };
        if let Err(e) = self.output.play(buffer, Channel::Effects, self.sfx_gain) {
            log::warn!("{effect:?}: {e}");
        }
    }

    /// Submit a music note, cutting the previous one
    pub fn play_music(&mut self, note: &SoundBuffer) {
        if self.music_gain <= 0.0 || self.output.is_null() {
            return;
        }
        if let Err(e) = self.output.play(note, Channel::Music, self.music_gain) {
            log::warn!("Music: {e}");
        }
    }

    /// React to a gameplay event
    ///
    /// Pausing suspends all playback before the pause cue sounds; resuming
    /// restores playback first.
    pub fn dispatch(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Paused => self.pause_all(),
            GameEvent::Resumed => self.resume_all(),
            _ => {}
        }
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }

    pub fn pause_all(&mut self) {
        if !self.paused {
            self.paused = true;
            self.output.pause_all();
        }
    }

    pub fn resume_all(&mut self) {
        if self.paused {
            self.paused = false;
            self.output.resume_all();
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{Call, RecordingOutput};
    use super::*;

    #[test]
    fn test_null_output_makes_everything_a_noop() {
        let mut audio = AudioManager::disabled(&Settings::default());
        assert!(!audio.is_enabled());
        audio.play(SoundEffect::Jump);
        audio.play_music(&synthesize(|_| 440.0, 0.1, 0.1, Waveform::Square));
        audio.dispatch(&GameEvent::Paused);
        audio.dispatch(&GameEvent::Resumed);
        assert!(!audio.is_paused());
    }

    #[test]
    fn test_effects_reach_the_output() {
        let out = RecordingOutput::default();
        let calls = out.calls.clone();
        let mut audio = AudioManager::new(Box::new(out), &Settings::default());
        assert!(audio.is_enabled());

        audio.dispatch(&GameEvent::Stomp);
        assert_eq!(
            calls.borrow().as_slice(),
            &[Call::Play {
                frames: 4410,
                channel: Channel::Effects
            }]
        );
    }

    #[test]
    fn test_pause_suspends_before_cue() {
        let out = RecordingOutput::default();
        let calls = out.calls.clone();
        let mut audio = AudioManager::new(Box::new(out), &Settings::default());

        audio.dispatch(&GameEvent::Paused);
        assert!(audio.is_paused());
        audio.dispatch(&GameEvent::Resumed);
        assert!(!audio.is_paused());

        let calls = calls.borrow();
        assert_eq!(calls[0], Call::PauseAll);
        assert!(matches!(calls[1], Call::Play { .. }));
        assert_eq!(calls[2], Call::ResumeAll);
        assert!(matches!(calls[3], Call::Play { .. }));
    }

    #[test]
    fn test_pause_is_idempotent() {
        let out = RecordingOutput::default();
        let calls = out.calls.clone();
        let mut audio = AudioManager::new(Box::new(out), &Settings::default());
        audio.pause_all();
        audio.pause_all();
        audio.resume_all();
        audio.resume_all();
        assert_eq!(calls.borrow().as_slice(), &[Call::PauseAll, Call::ResumeAll]);
    }

    #[test]
    fn test_open_output_muted_is_null() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        assert!(open_output(&settings).is_null());
        assert!(!AudioManager::new(open_output(&settings), &settings).is_enabled());
    }

    #[cfg(not(feature = "playback"))]
    #[test]
    fn test_open_output_without_backend_is_null() {
        let settings = Settings::default();
        let mut output = open_output(&settings);
        assert!(output.is_null());
        let tone = synthesize(|_| 440.0, 0.05, 0.1, Waveform::Square);
        assert!(output.play(&tone, Channel::Effects, 1.0).is_ok());
    }

    #[test]
    fn test_muted_plays_nothing() {
        let out = RecordingOutput::default();
        let calls = out.calls.clone();
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        let mut audio = AudioManager::new(Box::new(out), &settings);
        audio.play(SoundEffect::Coin);
        audio.play_music(&synthesize(|_| 440.0, 0.1, 0.1, Waveform::Square));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_every_event_cue_is_generated() {
        for effect in SoundEffect::ALL {
            assert!(!effect.generate().is_empty(), "{effect:?} is empty");
        }
    }
}
