//! rodio-backed output (feature `playback`)

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};

use super::{AudioOutput, Channel, SoundBuffer};
use crate::Error;
use crate::consts::{CHANNELS, SAMPLE_RATE};

/// Plays sound buffers on the default output device
pub struct RodioOutput {
    /// The stream must outlive every sink created from its handle
    _stream: OutputStream,
    handle: OutputStreamHandle,
    /// One sink per effect still playing
    effects: Vec<Sink>,
    /// Current music note; replacing it stops the previous note
    music: Option<Sink>,
    paused: bool,
}

impl RodioOutput {
    pub fn try_new() -> crate::Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| Error::AudioDevice(e.to_string()))?;
        Ok(Self {
            _stream: stream,
            handle,
            effects: Vec::new(),
            music: None,
            paused: false,
        })
    }
}

impl AudioOutput for RodioOutput {
    fn play(&mut self, buffer: &SoundBuffer, channel: Channel, gain: f32) -> crate::Result<()> {
        let sink = Sink::try_new(&self.handle).map_err(|e| Error::AudioPlayback(e.to_string()))?;
        sink.set_volume(gain);
        // Effects (the pause cue included) stay audible while paused
        if self.paused && channel == Channel::Music {
            sink.pause();
        }
        sink.append(SamplesBuffer::new(CHANNELS, SAMPLE_RATE, buffer.samples.clone()));

        match channel {
            Channel::Effects => {
                self.effects.retain(|s| !s.empty());
                self.effects.push(sink);
            }
            Channel::Music => self.music = Some(sink),
        }
        Ok(())
    }

    fn pause_all(&mut self) {
        self.paused = true;
        for sink in self.effects.iter().chain(self.music.iter()) {
            sink.pause();
        }
    }

    fn resume_all(&mut self) {
        self.paused = false;
        for sink in self.effects.iter().chain(self.music.iter()) {
            sink.play();
        }
    }
}
