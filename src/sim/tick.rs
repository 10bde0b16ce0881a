//! Fixed timestep simulation tick
//!
//! Advances one run by exactly one step: scroll, bird physics, pipe
//! recycling, collisions, scoring and run-state transitions.

use serde::{Deserialize, Serialize};

use super::geometry::circle_rect_collision;
use super::state::{GameState, RandomSource, RunState};
use crate::tuning::Tuning;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Jump pressed this tick (edge-triggered)
    pub jump: bool,
}

/// Which collisions end a run and how a dead run restarts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Touching a pipe moves the run to `Dead`
    pub pipe_collision_kills: bool,
    /// Resting on the floor moves the run to `Dead`
    pub floor_collision_kills: bool,
    /// Test the upper pipe as well as the lower one
    pub top_pipe_collision: bool,
    /// Jumping while dead requests a fresh run
    pub restart_on_jump: bool,
}

impl Default for Rules {
    /// Collisions are detected and reported but never end the run.
    fn default() -> Self {
        Self {
            pipe_collision_kills: false,
            floor_collision_kills: false,
            top_pipe_collision: false,
            restart_on_jump: true,
        }
    }
}

impl Rules {
    /// Every obstacle is lethal
    pub fn classic() -> Self {
        Self {
            pipe_collision_kills: true,
            floor_collision_kills: true,
            top_pipe_collision: true,
            restart_on_jump: true,
        }
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Pipes passed this tick
    pub scored: u32,
    /// Pipe slots moved ahead this tick
    pub recycled: usize,
    /// First pipe slot the bird touched, in slot order
    pub hit_pipe: Option<usize>,
    pub hit_floor: bool,
    /// Run entered `Dead` this tick
    pub died: bool,
    /// Run is waiting to be replaced by its owner
    pub restart_requested: bool,
}

impl TickReport {
    /// Fold a later step of the same frame into this report
    pub fn merge(&mut self, later: &TickReport) {
        self.scored += later.scored;
        self.recycled += later.recycled;
        self.hit_pipe = self.hit_pipe.or(later.hit_pipe);
        self.hit_floor |= later.hit_floor;
        self.died |= later.died;
        self.restart_requested |= later.restart_requested;
    }
}

/// Advance the game state by one fixed timestep
pub fn tick<R: RandomSource + ?Sized>(
    state: &mut GameState,
    input: &TickInput,
    tuning: &Tuning,
    rules: &Rules,
    rng: &mut R,
) -> TickReport {
    let mut report = TickReport::default();

    match state.running {
        RunState::Running => {
            let dt = tuning.sim_dt;

            state.x_offset += tuning.speed * dt;

            // Jump overrides velocity, then semi-implicit Euler
            if input.jump {
                state.bird_vy = tuning.jump_force;
            }
            state.bird_vy += tuning.gravity * dt;
            state.bird_y += state.bird_vy * dt;
            state.bird_y = state
                .bird_y
                .clamp(tuning.bird_min_y(), tuning.bird_max_y());

            report.recycled = recycle_pipes(state, tuning, rng);
            report.hit_pipe = pipe_collision(state, tuning, rules);
            report.hit_floor = floor_collision(state, tuning);

            report.scored = score_pipes(state, tuning);
            if report.scored > 0 {
                state.score += report.scored;
                log::info!("score: {}", state.score);
            }

            let lethal_pipe = report.hit_pipe.is_some() && rules.pipe_collision_kills;
            let lethal_floor = report.hit_floor && rules.floor_collision_kills;
            if lethal_pipe || lethal_floor {
                state.running = RunState::Dead;
                report.died = true;
                log::info!(
                    "bird died (pipe: {:?}, floor: {}) with score {}",
                    report.hit_pipe,
                    report.hit_floor,
                    state.score
                );
            }
        }

        RunState::Dead => {
            if input.jump && rules.restart_on_jump {
                state.running = RunState::Restart;
                report.restart_requested = true;
                log::info!("restart requested");
            }
        }

        RunState::Restart => {
            report.restart_requested = true;
        }
    }

    report
}

/// Move every pipe that left the screen behind the furthest one
///
/// The furthest pipe is searched again for each recycled slot, so a pipe
/// recycled earlier in the same pass can be the base for a later one.
pub fn recycle_pipes<R: RandomSource + ?Sized>(
    state: &mut GameState,
    tuning: &Tuning,
    rng: &mut R,
) -> usize {
    let (gap_low, gap_high) = tuning.gap_center_range();
    let mut recycled = 0;

    for slot in 0..state.pipes.len() {
        if !state.pipes[slot].is_offscreen(state.x_offset, tuning.pipe_width) {
            continue;
        }

        let max_x = state.max_pipe_x();
        let offset = rng.range_int(tuning.recycle_offset_min, tuning.recycle_offset_max);
        let gap_y = rng.range_int(gap_low, gap_high);

        let pipe = &mut state.pipes[slot];
        pipe.x = max_x + offset as f32;
        pipe.y = gap_y as f32;
        recycled += 1;

        log::debug!("recycled pipe {} to ({}, {})", slot, pipe.x, pipe.y);
    }

    recycled
}

/// First pipe slot the bird overlaps, if any
pub fn pipe_collision(state: &GameState, tuning: &Tuning, rules: &Rules) -> Option<usize> {
    let bird = state.bird_pos(tuning);
    let radius = tuning.bird_size;

    state.pipes.iter().position(|pipe| {
        let bottom = pipe.bottom_rect(state.x_offset, tuning);
        if circle_rect_collision(bird, radius, &bottom) {
            log::debug!("bird {:?} hit bottom pipe at {:?}", bird, bottom.pos);
            return true;
        }
        if rules.top_pipe_collision {
            let top = pipe.top_rect(state.x_offset, tuning);
            if circle_rect_collision(bird, radius, &top) {
                log::debug!("bird {:?} hit top pipe at {:?}", bird, top.pos);
                return true;
            }
        }
        false
    })
}

/// Bird is resting on the floor
#[inline]
pub fn floor_collision(state: &GameState, tuning: &Tuning) -> bool {
    state.bird_y >= tuning.bird_max_y()
}

/// The bird's front crosses `pipe_x` during the scroll window starting at `x_offset`
#[inline]
pub fn crosses_pipe(bird_x: f32, x_offset: f32, pipe_x: f32, step: f32) -> bool {
    let front = bird_x + x_offset;
    front <= pipe_x && front + step > pipe_x
}

/// Number of pipes whose left edge falls inside this tick's crossing window
pub fn score_pipes(state: &GameState, tuning: &Tuning) -> u32 {
    let step = tuning.scroll_per_step();
    state
        .pipes
        .iter()
        .filter(|pipe| crosses_pipe(tuning.bird_x, state.x_offset, pipe.x, step))
        .count() as u32
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use proptest::prelude::*;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::{Pipe, seeded_rng};

    /// Replays fixed values and records the requested ranges
    struct ScriptedRandom {
        values: VecDeque<i32>,
        calls: Vec<(i32, i32)>,
    }

    impl ScriptedRandom {
        fn new(values: &[i32]) -> Self {
            Self {
                values: values.iter().copied().collect(),
                calls: Vec::new(),
            }
        }
    }

    impl RandomSource for ScriptedRandom {
        fn range_int(&mut self, low: i32, high: i32) -> i32 {
            self.calls.push((low, high));
            let value = self.values.pop_front().unwrap_or(low);
            assert!((low..=high).contains(&value), "scripted value out of range");
            value
        }
    }

    fn run(state: &mut GameState, jump: bool, rules: &Rules, rng: &mut Pcg32) -> TickReport {
        tick(state, &TickInput { jump }, &Tuning::default(), rules, rng)
    }

    #[test]
    fn test_scroll_and_gravity() {
        let mut state = GameState::default();
        let mut rng = seeded_rng(1);
        run(&mut state, false, &Rules::default(), &mut rng);

        assert!((state.x_offset - 175.0 * SIM_DT).abs() < 1e-4);
        let vy = 1400.0 * SIM_DT;
        assert!((state.bird_vy - vy).abs() < 1e-3);
        assert!((state.bird_y - (50.0 + vy * SIM_DT)).abs() < 1e-3);
    }

    #[test]
    fn test_jump_replaces_velocity() {
        let mut state = GameState::default();
        state.bird_y = 300.0;
        state.bird_vy = 800.0;
        let mut rng = seeded_rng(1);
        run(&mut state, true, &Rules::default(), &mut rng);

        let expected_vy = -500.0 + 1400.0 * SIM_DT;
        assert!((state.bird_vy - expected_vy).abs() < 1e-3);
        assert!(state.bird_y < 300.0);
    }

    #[test]
    fn test_clamp_at_ceiling() {
        let mut state = GameState::default();
        state.bird_y = 16.0;
        let mut rng = seeded_rng(1);
        run(&mut state, true, &Rules::default(), &mut rng);
        assert_eq!(state.bird_y, 15.0);
    }

    #[test]
    fn test_recycle_single_pipe() {
        let tuning = Tuning::default();
        let mut state = GameState::default();
        // After this tick's scroll the first pipe's right edge is at -50
        state.x_offset = 600.0 - tuning.scroll_per_step();
        let max_before = state.max_pipe_x();

        let mut rng = ScriptedRandom::new(&[250, 200]);
        let report = tick(&mut state, &TickInput::default(), &tuning, &Rules::default(), &mut rng);

        assert_eq!(report.recycled, 1);
        assert_eq!(rng.calls, vec![(200, 300), (120, 380)]);
        assert_eq!(state.pipes[0], Pipe::new(max_before + 250.0, 200.0));
        // Other slots untouched
        assert_eq!(state.pipes[1].x, 700.0);
    }

    #[test]
    fn test_recycle_recomputes_max_per_slot() {
        let tuning = Tuning::default();
        let mut state = GameState::default();
        state.pipes = [
            Pipe::new(100.0, 150.0),
            Pipe::new(150.0, 150.0),
            Pipe::new(900.0, 150.0),
            Pipe::new(1100.0, 150.0),
        ];
        state.x_offset = 300.0;

        let mut rng = ScriptedRandom::new(&[250, 200, 210, 300]);
        let recycled = recycle_pipes(&mut state, &tuning, &mut rng);

        assert_eq!(recycled, 2);
        assert_eq!(state.pipes[0], Pipe::new(1350.0, 200.0));
        // Based on the pipe recycled just before it, not the pre-pass maximum
        assert_eq!(state.pipes[1], Pipe::new(1560.0, 300.0));
    }

    #[test]
    fn test_recycle_with_real_rng_stays_in_range() {
        let tuning = Tuning::default();
        let mut rng = seeded_rng(42);
        for _ in 0..200 {
            let mut state = GameState::default();
            state.x_offset = 560.0;
            let max_before = state.max_pipe_x();
            recycle_pipes(&mut state, &tuning, &mut rng);

            let offset = state.pipes[0].x - max_before;
            assert!((200.0..=300.0).contains(&offset));
            assert!((120.0..=380.0).contains(&state.pipes[0].y));
        }
    }

    #[test]
    fn test_crossing_window() {
        let step = 175.0 * SIM_DT;
        assert!(crosses_pipe(50.0, 0.0, 51.5, step));
        assert!(crosses_pipe(50.0, 0.0, 50.0, step));
        assert!(!crosses_pipe(50.0, 0.0, 200.0, step));
        assert!(!crosses_pipe(50.0, 0.0, 49.9, step));
    }

    #[test]
    fn test_score_once_per_pipe() {
        let tuning = Tuning::default();
        let step = tuning.scroll_per_step();
        let mut state = GameState::default();
        // Pipe sits one pixel past the bird's front after this tick's scroll
        state.pipes[0].x = tuning.bird_x + step + 1.0;

        let mut rng = seeded_rng(3);
        let report = tick(&mut state, &TickInput::default(), &tuning, &Rules::default(), &mut rng);
        assert_eq!(report.scored, 1);
        assert_eq!(state.score, 1);

        let report = tick(&mut state, &TickInput::default(), &tuning, &Rules::default(), &mut rng);
        assert_eq!(report.scored, 0);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_two_pipes_score_in_one_tick() {
        let tuning = Tuning::default();
        let mut state = GameState::default();
        // Both pipes inside the window that starts at bird_x + scroll
        let front = tuning.bird_x + tuning.scroll_per_step();
        state.pipes[0].x = front + 0.5;
        state.pipes[1].x = front + 1.0;
        state.x_offset = tuning.scroll_per_step();
        assert_eq!(score_pipes(&state, &tuning), 2);
    }

    #[test]
    fn test_bottom_pipe_collision_reported() {
        let tuning = Tuning::default();
        let mut state = GameState::default();
        state.bird_y = 300.0;
        state.pipes[0] = Pipe::new(40.0, 150.0);

        assert_eq!(pipe_collision(&state, &tuning, &Rules::default()), Some(0));
    }

    #[test]
    fn test_first_collision_wins() {
        let tuning = Tuning::default();
        let mut state = GameState::default();
        state.bird_y = 300.0;
        state.pipes[1] = Pipe::new(40.0, 150.0);
        state.pipes[3] = Pipe::new(45.0, 150.0);

        assert_eq!(pipe_collision(&state, &tuning, &Rules::default()), Some(1));
    }

    #[test]
    fn test_top_pipe_toggle() {
        let tuning = Tuning::default();
        let mut state = GameState::default();
        state.bird_y = 60.0;
        state.pipes[0] = Pipe::new(40.0, 200.0);

        assert_eq!(pipe_collision(&state, &tuning, &Rules::default()), None);
        let rules = Rules {
            top_pipe_collision: true,
            ..Default::default()
        };
        assert_eq!(pipe_collision(&state, &tuning, &rules), Some(0));
    }

    #[test]
    fn test_collision_not_lethal_by_default() {
        let mut state = GameState::default();
        state.bird_y = 300.0;
        state.pipes[0] = Pipe::new(40.0, 150.0);
        let mut rng = seeded_rng(1);

        let report = run(&mut state, false, &Rules::default(), &mut rng);
        assert_eq!(report.hit_pipe, Some(0));
        assert!(!report.died);
        assert_eq!(state.running, RunState::Running);
    }

    #[test]
    fn test_pipe_collision_kills() {
        let mut state = GameState::default();
        state.bird_y = 300.0;
        state.pipes[0] = Pipe::new(40.0, 150.0);
        let rules = Rules {
            pipe_collision_kills: true,
            ..Default::default()
        };
        let mut rng = seeded_rng(1);

        let report = run(&mut state, false, &rules, &mut rng);
        assert!(report.died);
        assert_eq!(state.running, RunState::Dead);
    }

    #[test]
    fn test_floor_death_freezes_run_until_restart() {
        let rules = Rules::classic();
        let mut state = GameState::default();
        let mut rng = seeded_rng(9);

        let mut ticks = 0;
        while state.is_running() {
            run(&mut state, false, &rules, &mut rng);
            ticks += 1;
            assert!(ticks < 200, "bird never reached the floor");
        }
        assert_eq!(state.running, RunState::Dead);
        assert_eq!(state.bird_y, 485.0);

        // Dead: nothing moves
        let frozen = state.clone();
        let report = run(&mut state, false, &rules, &mut rng);
        assert_eq!(state, frozen);
        assert_eq!(report, TickReport::default());

        // Jump asks for a new run
        let report = run(&mut state, true, &rules, &mut rng);
        assert!(report.restart_requested);
        assert_eq!(state.running, RunState::Restart);

        // Restart is inert until the owner replaces the state
        let report = run(&mut state, true, &rules, &mut rng);
        assert!(report.restart_requested);
        assert_eq!(state.x_offset, frozen.x_offset);
    }

    #[test]
    fn test_dead_without_restart_on_jump() {
        let rules = Rules {
            restart_on_jump: false,
            ..Rules::classic()
        };
        let mut state = GameState::default();
        state.running = RunState::Dead;
        let mut rng = seeded_rng(1);

        run(&mut state, true, &rules, &mut rng);
        assert_eq!(state.running, RunState::Dead);
    }

    #[test]
    fn test_merge_reports() {
        let mut report = TickReport {
            scored: 1,
            hit_floor: true,
            ..Default::default()
        };
        report.merge(&TickReport {
            scored: 1,
            recycled: 2,
            hit_pipe: Some(3),
            died: true,
            ..Default::default()
        });
        assert_eq!(report.scored, 2);
        assert_eq!(report.recycled, 2);
        assert_eq!(report.hit_pipe, Some(3));
        assert!(report.hit_floor && report.died);
        assert!(!report.restart_requested);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::default();
        let mut state2 = GameState::default();
        let mut rng1 = seeded_rng(99999);
        let mut rng2 = seeded_rng(99999);

        for i in 0..2000 {
            let jump = i % 23 == 0;
            run(&mut state1, jump, &Rules::default(), &mut rng1);
            run(&mut state2, jump, &Rules::default(), &mut rng2);
        }

        assert_eq!(state1, state2);
        assert!(state1.score > 0);
    }

    #[test]
    fn test_free_fall_reaches_floor() {
        let mut state = GameState::default();
        let mut rng = seeded_rng(5);

        // Continuous free fall from y=50 to the clamp at 485
        let fall_ticks = ((2.0 * 435.0 / 1400.0f32).sqrt() / SIM_DT).ceil() as usize;
        let mut reached = None;
        for i in 1..=1000 {
            run(&mut state, false, &Rules::default(), &mut rng);
            if reached.is_none() && state.bird_y >= 485.0 {
                reached = Some(i);
            }
        }

        assert!((state.x_offset - 1000.0 * SIM_DT * 175.0).abs() < 0.5);
        assert_eq!(state.bird_y, 485.0);
        let reached = reached.expect("bird never reached the floor clamp");
        assert!(reached <= fall_ticks, "reached at {reached}, bound {fall_ticks}");
    }

    proptest! {
        #[test]
        fn prop_bird_stays_in_bounds(jumps in prop::collection::vec(any::<bool>(), 1..400), seed in any::<u64>()) {
            let mut state = GameState::default();
            let mut rng = seeded_rng(seed);
            for jump in jumps {
                run(&mut state, jump, &Rules::default(), &mut rng);
                prop_assert!(state.bird_y >= 15.0 && state.bird_y <= 485.0);
            }
        }

        #[test]
        fn prop_score_never_decreases(jumps in prop::collection::vec(any::<bool>(), 1..400), seed in any::<u64>()) {
            let mut state = GameState::default();
            let mut rng = seeded_rng(seed);
            let mut last = state.score;
            for jump in jumps {
                let was_running = state.is_running();
                run(&mut state, jump, &Rules::classic(), &mut rng);
                if was_running {
                    prop_assert!(state.score >= last);
                } else {
                    prop_assert_eq!(state.score, last);
                }
                last = state.score;
            }
        }
    }
}
