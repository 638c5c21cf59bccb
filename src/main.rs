//! Ultra Bros entry point
//!
//! Headless frontend: the autopilot plays the campaign on a virtual clock (or
//! in real time with `realtime` set) and the HUD is reported through the log.

use std::time::{Duration, Instant};

use ultra_bros::Settings;
use ultra_bros::app::{FrameInput, Frontend, Runner};
use ultra_bros::audio::{self, AudioManager};
use ultra_bros::renderer::{FrameBuffer, Hud};
use ultra_bros::sim::{GameState, TickInput};

/// Log the HUD every this many presented frames
const HUD_LOG_INTERVAL: u64 = 600;

struct HeadlessFrontend {
    frames: u64,
    frame_limit: u64,
    scale: u32,
    realtime: bool,
    started: Instant,
    clock: Duration,
}

impl HeadlessFrontend {
    fn new(settings: &Settings) -> Self {
        Self {
            frames: 0,
            frame_limit: settings.demo_frames,
            scale: settings.scale,
            realtime: settings.realtime,
            started: Instant::now(),
            clock: Duration::ZERO,
        }
    }
}

impl Frontend for HeadlessFrontend {
    fn poll_input(&mut self, _state: &GameState) -> FrameInput {
        FrameInput {
            tick: TickInput {
                autopilot: true,
                ..Default::default()
            },
            quit: self.frames >= self.frame_limit,
        }
    }

    fn present(&mut self, frame: &FrameBuffer, hud: &Hud) {
        self.frames += 1;
        if self.frames % HUD_LOG_INTERVAL == 0 {
            log::info!(
                "[frame {}] {} ({}x{})",
                self.frames,
                hud.status_line(),
                frame.width() * self.scale as i32,
                frame.height() * self.scale as i32
            );
        }
    }

    fn wait(&mut self, duration: Duration) {
        if self.realtime {
            std::thread::sleep(duration);
        }
        self.clock += duration;
    }

    fn now(&self) -> Duration {
        if self.realtime {
            self.started.elapsed()
        } else {
            self.clock
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Ultra Bros starting...");

    let settings = Settings::load();
    let audio = AudioManager::new(audio::open_output(&settings), &settings);
    let frontend = HeadlessFrontend::new(&settings);

    let summary = Runner::new(frontend, &settings, audio).run();
    log::info!(
        "Finished at {}-{}: {} frames, {} stages cleared, {} deaths, score {}",
        summary.world,
        summary.stage,
        summary.frames,
        summary.stages_cleared,
        summary.deaths,
        summary.score
    );
}
