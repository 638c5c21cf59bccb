//! Fixed-timestep runner
//!
//! Drives the simulation one tick per frame, forwards gameplay events to the
//! audio manager, renders into the frame buffer and hands it to a
//! [`Frontend`]. Stage transitions block on a fixed wait.

use std::time::Duration;

use crate::Settings;
use crate::audio::{AudioManager, MusicSequencer};
use crate::consts::{FPS, PAUSED_FPS, TRANSITION_MS};
use crate::renderer::{self, FrameBuffer, Hud};
use crate::sim::{GamePhase, GameState, TickInput, tick};

/// Everything the frontend reports for one frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub tick: TickInput,
    pub quit: bool,
}

/// Platform collaborator: input, presentation and the clock
pub trait Frontend {
    /// Poll the logical actions for this frame
    fn poll_input(&mut self, state: &GameState) -> FrameInput;
    /// Show a finished frame
    fn present(&mut self, frame: &FrameBuffer, hud: &Hud);
    /// Block for `duration`
    fn wait(&mut self, duration: Duration);
    /// Monotonic time since the frontend started
    fn now(&self) -> Duration;
}

/// Target frame interval for a phase; pause redraws at a reduced rate
pub fn frame_interval(phase: GamePhase) -> Duration {
    let fps = if phase == GamePhase::Paused { PAUSED_FPS } else { FPS };
    Duration::from_secs(1) / fps
}

/// Totals reported when the runner stops
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub stages_cleared: u32,
    pub deaths: u32,
    pub world: u32,
    pub stage: u32,
    pub score: u64,
}

pub struct Runner<F: Frontend> {
    frontend: F,
    state: GameState,
    audio: AudioManager,
    music: MusicSequencer,
    frame: FrameBuffer,
    summary: RunSummary,
}

impl<F: Frontend> Runner<F> {
    pub fn new(frontend: F, settings: &Settings, audio: AudioManager) -> Self {
        let mut music = MusicSequencer::default();
        music.playing = settings.music_enabled;
        Self {
            frontend,
            state: GameState::new(settings.seed, settings.starting_lives),
            audio,
            music,
            frame: FrameBuffer::default(),
            summary: RunSummary::default(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    /// Run one frame; returns false once the frontend asks to quit
    pub fn step(&mut self) -> bool {
        let started = self.frontend.now();

        let input = self.frontend.poll_input(&self.state);
        if input.quit {
            log::info!("Quit requested after {} frames", self.summary.frames);
            return false;
        }

        tick(&mut self.state, &input.tick);
        for event in self.state.drain_events() {
            self.audio.dispatch(&event);
        }

        if self.state.phase == GamePhase::Playing {
            if let Some(note) = self.music.update(started) {
                self.audio.play_music(&note);
            }
        }

        renderer::render(&self.state, &mut self.frame);
        self.frontend.present(&self.frame, &Hud::from_state(&self.state));
        self.summary.frames += 1;

        if self.state.in_transition() {
            self.finish_stage();
            return true;
        }

        let interval = frame_interval(self.state.phase);
        let elapsed = self.frontend.now().saturating_sub(started);
        if elapsed < interval {
            self.frontend.wait(interval - elapsed);
        }
        true
    }

    /// Run until the frontend quits
    pub fn run(mut self) -> RunSummary {
        log::info!(
            "Run started (seed {:#x}, {} lives, audio {})",
            self.state.seed,
            self.state.lives,
            if self.audio.is_enabled() { "on" } else { "off" }
        );
        while self.step() {}
        self.summary()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            world: self.state.world,
            stage: self.state.stage,
            score: self.state.score,
            ..self.summary.clone()
        }
    }

    fn finish_stage(&mut self) {
        self.frontend.wait(Duration::from_millis(TRANSITION_MS));
        match self.state.phase {
            GamePhase::StageClear => {
                self.summary.stages_cleared += 1;
                self.state.advance_stage();
            }
            GamePhase::Dead => {
                self.summary.deaths += 1;
                self.state.lose_life();
            }
            GamePhase::Playing | GamePhase::Paused => {}
        }
    }
}
