//! Demo autopilot
//!
//! Flaps whenever the falling bird sinks into the lower part of the next
//! gap, 60% of the way from its center to the bottom pipe. Used by
//! the headless binary to exercise long runs; the simulation never calls it.

use super::state::{GameState, Pipe};
use crate::tuning::Tuning;

/// Nearest pipe whose right edge is still ahead of the bird's back
pub fn next_pipe<'a>(state: &'a GameState, tuning: &Tuning) -> Option<&'a Pipe> {
    let bird_back = tuning.bird_x - tuning.bird_size;
    state
        .pipes
        .iter()
        .filter(|pipe| pipe.screen_x(state.x_offset) + tuning.pipe_width >= bird_back)
        .min_by(|a, b| a.x.total_cmp(&b.x))
}

/// Whether to jump this tick
pub fn wants_jump(state: &GameState, tuning: &Tuning) -> bool {
    if !state.is_running() {
        return false;
    }

    // A jump rises about 85 px, so flap from the lower part of the gap
    let target_y = next_pipe(state, tuning)
        .map(|pipe| pipe.y + tuning.half_gap * 0.6)
        .unwrap_or(tuning.floor_y * 0.5);

    state.bird_y > target_y && state.bird_vy >= 0.0
}
