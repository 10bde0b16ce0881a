//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Injected RNG only
//! - Stable iteration order (by pipe slot)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod geometry;
pub mod state;
pub mod tick;

pub use geometry::{Rect, circle_rect_collision};
pub use state::{GameState, Pipe, RandomSource, RunState, seeded_rng};
pub use tick::{Rules, TickInput, TickReport, tick};
