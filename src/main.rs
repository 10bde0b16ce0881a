//! Flappy entry point
//!
//! Headless native host: drives a session with the autopilot and logs what a
//! renderer would draw. Usage: `flappy [settings.json] [frames]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use flappy::consts::{SCREEN_W, SIM_DT};
    use flappy::platform::FrameInput;
    use flappy::render::{
        BACKGROUND_PARALLAX, BirdPose, RenderFrame, Renderer, bird_frame, scroll_origin,
    };
    use flappy::sim::{Rules, RunState, autopilot};
    use flappy::{Session, Settings};

    /// Background tile width used for the parallax readout
    const BACKGROUND_TILE_W: f32 = 288.0;
    /// Frames between progress lines
    const REPORT_EVERY: u64 = 600;

    /// Stands in for a real renderer: owns presentation state and logs it
    #[derive(Default)]
    struct LogRenderer {
        pose: BirdPose,
        last_score: u32,
        last_running: Option<RunState>,
    }

    impl Renderer for LogRenderer {
        fn render(&mut self, frame: &RenderFrame) {
            let snapshot = &frame.snapshot;
            let rotation = self.pose.update(snapshot.bird_vy);

            if self.last_running != Some(snapshot.running) {
                log::info!("run state: {:?}", snapshot.running);
                self.last_running = Some(snapshot.running);
            }
            if snapshot.score != self.last_score {
                log::debug!("score {} -> {}", self.last_score, snapshot.score);
                self.last_score = snapshot.score;
            }

            if frame.stats.tick % REPORT_EVERY == 0 {
                log::info!(
                    "tick {} | fps {} | score {} | bird y {:.1} rot {:.1} {:?} | bg {:.1}",
                    frame.stats.tick,
                    frame.stats.average_fps,
                    snapshot.score,
                    snapshot.bird_pos.y,
                    rotation,
                    bird_frame(snapshot.x_offset),
                    scroll_origin(snapshot.x_offset, BACKGROUND_PARALLAX, BACKGROUND_TILE_W),
                );
            }
        }
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) => Settings::load_or_default(path),
            None => Settings {
                rules: Rules::classic(),
                ..Default::default()
            },
        };
        let frames: u64 = args.next().and_then(|n| n.parse().ok()).unwrap_or(3600);

        log::info!(
            "screen {}x{}, simulating {} frames",
            SCREEN_W,
            flappy::consts::SCREEN_H,
            frames
        );

        let mut session = match Session::new(settings) {
            Ok(session) => session,
            Err(e) => {
                log::error!("cannot start session: {e}");
                return;
            }
        };
        let mut renderer = LogRenderer::default();

        for _ in 0..frames {
            let state = session.state();
            let jump = match state.running {
                RunState::Running => autopilot::wants_jump(state, &session.settings().tuning),
                // Flap to start over
                RunState::Dead | RunState::Restart => true,
            };
            let input = FrameInput {
                jump_pressed: jump,
                ..Default::default()
            };
            session.frame(SIM_DT, &input, &mut renderer);
        }

        log::info!(
            "done after {} frames: {} runs, best score {}",
            session.tick(),
            session.runs(),
            session.best_score()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Flappy (native, headless) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive `Session::frame` from their animation-frame callback
}
