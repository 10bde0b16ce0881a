//! Data-driven physics tuning
//!
//! Every simulation constant lives here so a settings file can override it.
//! Defaults come from [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Physics and level-layout parameters consumed by the simulation step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Fixed timestep fed to every simulation step (seconds)
    pub sim_dt: f32,
    /// World scroll speed (pixels/s)
    pub speed: f32,
    /// Velocity set on jump (negative is up)
    pub jump_force: f32,
    pub gravity: f32,
    /// Bird radius
    pub bird_size: f32,
    pub bird_x: f32,
    pub bird_start_y: f32,
    pub pipe_width: f32,
    pub half_gap: f32,
    pub floor_y: f32,
    /// Distance kept between a recycled gap and the ceiling/floor
    pub pipe_margin: f32,
    pub recycle_offset_min: i32,
    pub recycle_offset_max: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            sim_dt: SIM_DT,
            speed: SPEED,
            jump_force: JUMP_FORCE,
            gravity: GRAVITY,
            bird_size: BIRD_SIZE,
            bird_x: BIRD_X,
            bird_start_y: DEFAULT_BIRD_Y,
            pipe_width: PIPE_WIDTH,
            half_gap: HALF_GAP,
            floor_y: FLOOR_Y,
            pipe_margin: PIPE_MARGIN,
            recycle_offset_min: RECYCLE_OFFSET_MIN,
            recycle_offset_max: RECYCLE_OFFSET_MAX,
        }
    }
}

impl Tuning {
    /// Lowest allowed bird center
    #[inline]
    pub fn bird_min_y(&self) -> f32 {
        self.bird_size
    }

    /// Highest allowed bird center (resting on the floor)
    #[inline]
    pub fn bird_max_y(&self) -> f32 {
        self.floor_y - self.bird_size
    }

    /// Inclusive range a recycled pipe's gap center is drawn from
    pub fn gap_center_range(&self) -> (i32, i32) {
        let low = self.pipe_margin + self.half_gap;
        let high = self.floor_y - self.pipe_margin - self.half_gap;
        (low.ceil() as i32, high.floor() as i32)
    }

    /// Horizontal distance the world scrolls in one step
    #[inline]
    pub fn scroll_per_step(&self) -> f32 {
        self.speed * self.sim_dt
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("sim_dt", self.sim_dt),
            ("speed", self.speed),
            ("gravity", self.gravity),
            ("bird_size", self.bird_size),
            ("pipe_width", self.pipe_width),
            ("half_gap", self.half_gap),
            ("floor_y", self.floor_y),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidSettings(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        for (name, value) in [
            ("jump_force", self.jump_force),
            ("bird_x", self.bird_x),
            ("bird_start_y", self.bird_start_y),
            ("pipe_margin", self.pipe_margin),
        ] {
            if !value.is_finite() {
                return Err(Error::InvalidSettings(format!("{name} must be finite")));
            }
        }

        if self.bird_min_y() > self.bird_max_y() {
            return Err(Error::InvalidSettings(format!(
                "bird_size {} does not fit above floor_y {}",
                self.bird_size, self.floor_y
            )));
        }

        let (low, high) = self.gap_center_range();
        if low > high {
            return Err(Error::InvalidSettings(format!(
                "half_gap {} and pipe_margin {} leave no room for a gap below floor_y {}",
                self.half_gap, self.pipe_margin, self.floor_y
            )));
        }

        if self.recycle_offset_min < 0 || self.recycle_offset_min > self.recycle_offset_max {
            return Err(Error::InvalidSettings(format!(
                "recycle offset range [{}, {}] is empty or negative",
                self.recycle_offset_min, self.recycle_offset_max
            )));
        }

        Ok(())
    }
}
