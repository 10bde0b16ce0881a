//! Render data handed to an external renderer
//!
//! The session exports a read-only [`RenderSnapshot`] each frame. Anything
//! purely visual (bird tilt, flap animation, parallax) is derived here and
//! owned by the presentation side, never written back into the simulation.

use glam::Vec2;

use crate::consts::PIPE_COUNT;
use crate::sim::{GameState, Pipe, Rect, RunState};
use crate::tuning::Tuning;
use crate::{lerp, remap};

/// Bird velocity range mapped onto the tilt range
const TILT_VELOCITY_RANGE: (f32, f32) = (-500.0, 1100.0);
/// Tilt range in degrees (nose up .. nose down)
const TILT_ANGLE_RANGE: (f32, f32) = (-70.0, 75.0);
/// Fraction of the way toward the target tilt covered each frame
const TILT_SMOOTHING: f32 = 0.3;
/// Scroll distance per flap animation frame
const FLAP_FRAME_DISTANCE: f32 = 20.0;

pub const BACKGROUND_PARALLAX: f32 = 0.5;
pub const FLOOR_PARALLAX: f32 = 1.0;

/// Read-only copy of the simulation for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSnapshot {
    pub running: RunState,
    pub score: u32,
    pub bird_pos: Vec2,
    pub bird_vy: f32,
    pub bird_radius: f32,
    pub x_offset: f32,
    pub pipes: [Pipe; PIPE_COUNT],
}

impl RenderSnapshot {
    pub fn capture(state: &GameState, tuning: &Tuning) -> Self {
        Self {
            running: state.running,
            score: state.score,
            bird_pos: state.bird_pos(tuning),
            bird_vy: state.bird_vy,
            bird_radius: tuning.bird_size,
            x_offset: state.x_offset,
            pipes: state.pipes,
        }
    }

    /// Screen-space (top, bottom) obstacle rectangles per pipe, for debug outlines
    pub fn pipe_rects(&self, tuning: &Tuning) -> [(Rect, Rect); PIPE_COUNT] {
        self.pipes.map(|pipe| {
            (
                pipe.top_rect(self.x_offset, tuning),
                pipe.bottom_rect(self.x_offset, tuning),
            )
        })
    }
}

/// Diagnostics shown by the debug overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub tick: u64,
    pub fps: u32,
    pub average_fps: u32,
    pub can_update: bool,
    pub ticks_per_update: u32,
    pub gui_visible: bool,
    /// Simulation advanced this frame
    pub stepped: bool,
}

/// Everything a renderer receives for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderFrame {
    pub snapshot: RenderSnapshot,
    pub stats: FrameStats,
}

/// External drawing backend, called once per frame
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame);
}

/// Smoothed bird tilt, owned by the renderer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BirdPose {
    /// Degrees, positive is nose down
    pub rotation: f32,
}

impl BirdPose {
    /// Tilt the velocity maps to (unclamped)
    pub fn target_rotation(bird_vy: f32) -> f32 {
        remap(
            bird_vy,
            TILT_VELOCITY_RANGE.0,
            TILT_VELOCITY_RANGE.1,
            TILT_ANGLE_RANGE.0,
            TILT_ANGLE_RANGE.1,
        )
    }

    /// Ease toward the target for this frame and return the new rotation
    pub fn update(&mut self, bird_vy: f32) -> f32 {
        self.rotation = lerp(self.rotation, Self::target_rotation(bird_vy), TILT_SMOOTHING);
        self.rotation
    }
}

/// Wing sprite for the flap animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirdFrame {
    Downflap,
    Midflap,
    Upflap,
}

/// Flap sprite for the current scroll distance (down, mid, up, mid)
pub fn bird_frame(x_offset: f32) -> BirdFrame {
    let frame = (x_offset / FLAP_FRAME_DISTANCE) as i64 % 4;
    match frame {
        0 => BirdFrame::Downflap,
        1 | 3 => BirdFrame::Midflap,
        2 => BirdFrame::Upflap,
        _ => {
            debug_assert!(false, "flap frame {frame} out of range");
            BirdFrame::Midflap
        }
    }
}

/// Left edge of the first visible tile of a repeating strip
pub fn scroll_origin(x_offset: f32, parallax: f32, tile_width: f32) -> f32 {
    if tile_width <= 0.0 {
        return 0.0;
    }
    -(x_offset * parallax) % tile_width
}

/// Tiles needed to cover the screen starting at `origin`
pub fn tile_count(origin: f32, tile_width: f32, screen_width: f32) -> usize {
    if tile_width <= 0.0 {
        return 0;
    }
    ((screen_width - origin) / tile_width).ceil().max(0.0) as usize
}
