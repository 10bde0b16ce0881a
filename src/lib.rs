//! Flappy - a side-scrolling arcade game with a fixed-timestep core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bird physics, pipes, collisions, scoring)
//! - `session`: Frame-driven loop driver that owns the game state
//! - `render`: Read-only render data handed to an external renderer
//! - `platform`: Host-facing input and frame timing contracts
//! - `settings` / `tuning`: Data-driven configuration

pub mod error;
pub mod platform;
pub mod render;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use session::Session;
pub use settings::{DebugSettings, Settings, TimestepMode};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one step per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame when running the accumulator
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame time fed to the accumulator (seconds)
    pub const MAX_FRAME_TIME: f32 = 0.1;

    /// World scroll speed (pixels/s)
    pub const SPEED: f32 = 175.0;
    /// Upward velocity set on jump (pixels/s, negative is up)
    pub const JUMP_FORCE: f32 = -500.0;
    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 1400.0;

    /// Bird radius
    pub const BIRD_SIZE: f32 = 15.0;
    /// Fixed horizontal bird position in screen space
    pub const BIRD_X: f32 = 50.0;
    pub const DEFAULT_BIRD_Y: f32 = 50.0;

    /// Pipe geometry
    pub const PIPE_WIDTH: f32 = 50.0;
    /// Half the vertical opening between top and bottom pipe
    pub const HALF_GAP: f32 = 70.0;
    pub const FLOOR_Y: f32 = 500.0;

    /// Number of pipe slots recycled through the level
    pub const PIPE_COUNT: usize = 4;
    pub const PIPE_START_X: f32 = 500.0;
    pub const PIPE_SPACING: f32 = 200.0;
    pub const PIPE_START_Y: f32 = 150.0;

    /// Random horizontal distance added behind the furthest pipe on recycle
    pub const RECYCLE_OFFSET_MIN: i32 = 200;
    pub const RECYCLE_OFFSET_MAX: i32 = 300;
    /// Minimum distance between a gap and the ceiling/floor
    pub const PIPE_MARGIN: f32 = 50.0;

    /// Logical screen size
    pub const SCREEN_W: f32 = 288.0;
    pub const SCREEN_H: f32 = 512.0;
}

/// Linearly remap `value` from `[in_min, in_max]` to `[out_min, out_max]` (unclamped)
#[inline]
pub fn remap(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    out_min + (value - in_min) * (out_max - out_min) / (in_max - in_min)
}

/// Move `from` a fraction `t` of the way toward `to`
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}
