//! Game state and core simulation types
//!
//! Everything the simulation step reads or writes lives here. Presentation
//! state (bird rotation, sprite frames) is derived elsewhere from snapshots.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunState {
    /// Simulation advances
    #[default]
    Running,
    /// Bird crashed; nothing moves until a restart is requested
    Dead,
    /// Owner should replace the state with a fresh one
    Restart,
}

/// A pipe pair: `x` is the world-space left edge, `y` the center of the gap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    pub x: f32,
    pub y: f32,
}

impl Pipe {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Left edge in screen space
    #[inline]
    pub fn screen_x(&self, x_offset: f32) -> f32 {
        self.x - x_offset
    }

    /// True once the right edge has scrolled past the left side of the screen
    #[inline]
    pub fn is_offscreen(&self, x_offset: f32, pipe_width: f32) -> bool {
        self.screen_x(x_offset) + pipe_width <= 0.0
    }

    /// Lower obstacle, from the bottom of the gap down to the floor
    pub fn bottom_rect(&self, x_offset: f32, tuning: &Tuning) -> Rect {
        Rect::new(
            Vec2::new(self.screen_x(x_offset), self.y + tuning.half_gap),
            Vec2::new(tuning.pipe_width, tuning.floor_y),
        )
    }

    /// Upper obstacle, from the ceiling down to the top of the gap
    pub fn top_rect(&self, x_offset: f32, tuning: &Tuning) -> Rect {
        Rect::new(
            Vec2::new(self.screen_x(x_offset), 0.0),
            Vec2::new(tuning.pipe_width, (self.y - tuning.half_gap).max(0.0)),
        )
    }
}

/// Uniform integer source used when recycling pipes
pub trait RandomSource {
    /// Uniform integer in `[low, high]` (inclusive)
    fn range_int(&mut self, low: i32, high: i32) -> i32;
}

impl RandomSource for Pcg32 {
    fn range_int(&mut self, low: i32, high: i32) -> i32 {
        self.random_range(low..=high)
    }
}

/// Build the deterministic RNG for a run
pub fn seeded_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Complete simulation state for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub running: RunState,
    /// Pipes passed this run
    pub score: u32,
    /// Bird center height (y grows downward)
    pub bird_y: f32,
    /// Bird vertical velocity
    pub bird_vy: f32,
    /// Distance the world has scrolled
    pub x_offset: f32,
    /// Fixed pool of obstacles, recycled in place by slot
    pub pipes: [Pipe; PIPE_COUNT],
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(&Tuning::default())
    }
}

impl GameState {
    /// Fresh run: bird at its start height, pipes staggered ahead of it
    pub fn new(tuning: &Tuning) -> Self {
        log::info!("creating GameState");
        Self {
            running: RunState::Running,
            score: 0,
            bird_y: tuning.bird_start_y,
            bird_vy: 0.0,
            x_offset: 0.0,
            pipes: std::array::from_fn(|i| {
                Pipe::new(PIPE_START_X + i as f32 * PIPE_SPACING, PIPE_START_Y)
            }),
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running == RunState::Running
    }

    /// Bird center in screen space
    #[inline]
    pub fn bird_pos(&self, tuning: &Tuning) -> Vec2 {
        Vec2::new(tuning.bird_x, self.bird_y)
    }

    /// Largest pipe `x`, never below zero
    pub fn max_pipe_x(&self) -> f32 {
        self.pipes.iter().fold(0.0, |max, pipe| max.max(pipe.x))
    }
}
