//! Frame-driven loop driver
//!
//! A [`Session`] owns one run's [`GameState`] plus everything needed to
//! advance it: settings, RNG, tick counter, frame clock and tracked input.
//! The host calls [`Session::frame`] once per frame; within a frame input is
//! sampled first, then the simulation steps, then the renderer draws.

use rand_pcg::Pcg32;

use crate::consts::{MAX_FRAME_TIME, MAX_SUBSTEPS};
use crate::error::{Error, Result};
use crate::platform::{FrameClock, FrameInput, InputState};
use crate::render::{FrameStats, RenderFrame, RenderSnapshot, Renderer};
use crate::settings::{Settings, TimestepMode};
use crate::sim::{GameState, RunState, TickInput, TickReport, seeded_rng, tick};

/// Result of one [`Session::frame`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Simulation steps taken this frame
    pub steps: u32,
    /// Combined report of those steps
    pub report: TickReport,
    /// A fresh run replaced the previous one
    pub restarted: bool,
}

pub struct Session {
    settings: Settings,
    state: GameState,
    rng: Pcg32,
    seed: u64,
    /// Frames seen so far
    tick: u64,
    clock: FrameClock,
    input: InputState,
    /// Jump latched until a step consumes it
    pending_jump: bool,
    accumulator: f32,
    runs: u32,
    best_score: u32,
}

impl Session {
    /// New session; seeds from the settings or the system clock
    pub fn new(settings: Settings) -> Result<Self> {
        let seed = settings.seed.unwrap_or_else(clock_seed);
        Self::with_seed(settings, seed)
    }

    /// Settings built in code are validated here, not only when loaded
    pub fn with_seed(settings: Settings, seed: u64) -> Result<Self> {
        settings.validate()?;
        log::info!("creating Session with seed {}", seed);
        Ok(Self {
            state: GameState::new(&settings.tuning),
            rng: seeded_rng(seed),
            seed,
            tick: 0,
            clock: FrameClock::new(),
            input: InputState::default(),
            pending_jump: false,
            accumulator: 0.0,
            runs: 1,
            best_score: 0,
            settings,
        })
    }

    /// Run one host frame: timing, input, gated simulation, render
    pub fn frame<R: Renderer + ?Sized>(
        &mut self,
        frame_time: f32,
        input: &FrameInput,
        renderer: &mut R,
    ) -> FrameOutcome {
        self.clock.update(frame_time);

        self.input.update(input);
        self.pending_jump |= self.input.jump_pressed;
        if input.toggle_gui {
            self.settings.debug.gui_visible = !self.settings.debug.gui_visible;
        }

        let mut outcome = FrameOutcome::default();
        if self.should_update() {
            match self.settings.debug.timestep {
                TimestepMode::PerFrame => {
                    self.step(self.pending_jump, &mut outcome);
                    self.pending_jump = false;
                }
                TimestepMode::Accumulated => {
                    let dt = self.settings.tuning.sim_dt;
                    self.accumulator += self.clock.frame_time.min(MAX_FRAME_TIME);

                    while self.accumulator >= dt && outcome.steps < MAX_SUBSTEPS {
                        // One-shot input only applies to the first substep
                        self.step(self.pending_jump, &mut outcome);
                        self.pending_jump = false;
                        if outcome.restarted {
                            // The fresh run starts with an empty accumulator
                            break;
                        }
                        self.accumulator -= dt;
                    }
                    if outcome.steps == MAX_SUBSTEPS {
                        // Drop the backlog instead of spiralling
                        self.accumulator = self.accumulator.min(dt);
                    }
                }
            }
        } else {
            self.accumulator = 0.0;
            if !self.settings.debug.can_update {
                self.pending_jump = false;
            }
        }

        let frame = RenderFrame {
            snapshot: RenderSnapshot::capture(&self.state, &self.settings.tuning),
            stats: FrameStats {
                tick: self.tick,
                fps: self.clock.fps,
                average_fps: self.clock.average_fps(),
                can_update: self.settings.debug.can_update,
                ticks_per_update: self.settings.debug.ticks_per_update,
                gui_visible: self.settings.debug.gui_visible,
                stepped: outcome.steps > 0,
            },
        };
        renderer.render(&frame);

        self.tick += 1;
        outcome
    }

    /// Advance the simulation once, ignoring frame gating
    pub fn step_once(&mut self, jump: bool) -> TickReport {
        let mut outcome = FrameOutcome::default();
        self.step(jump, &mut outcome);
        outcome.report
    }

    /// Simulation is enabled and this frame is not throttled away
    pub fn should_update(&self) -> bool {
        let debug = &self.settings.debug;
        debug.can_update
            && (debug.ticks_per_update <= 1 || self.tick % u64::from(debug.ticks_per_update) == 0)
    }

    fn step(&mut self, jump: bool, outcome: &mut FrameOutcome) {
        let report = tick(
            &mut self.state,
            &TickInput { jump },
            &self.settings.tuning,
            &self.settings.rules,
            &mut self.rng,
        );
        outcome.steps += 1;
        outcome.report.merge(&report);

        if report.died {
            self.best_score = self.best_score.max(self.state.score);
        }
        if self.state.running == RunState::Restart {
            self.restart();
            outcome.restarted = true;
        }
    }

    /// Replace the current run with a fresh one
    pub fn restart(&mut self) {
        self.best_score = self.best_score.max(self.state.score);
        self.state = GameState::new(&self.settings.tuning);
        self.accumulator = 0.0;
        self.runs += 1;
        log::info!("starting run {} (best score {})", self.runs, self.best_score);
    }

    pub fn set_can_update(&mut self, can_update: bool) {
        self.settings.debug.can_update = can_update;
    }

    /// Step only every `ticks` frames
    pub fn set_ticks_per_update(&mut self, ticks: u32) -> Result<()> {
        if ticks == 0 {
            return Err(Error::InvalidSettings(
                "ticks_per_update must be at least 1".into(),
            ));
        }
        self.settings.debug.ticks_per_update = ticks;
        Ok(())
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Runs started in this session, including the current one
    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn best_score(&self) -> u32 {
        self.best_score.max(self.state.score)
    }
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
