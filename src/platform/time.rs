//! Frame timing diagnostics

/// Number of frames averaged for the smoothed FPS readout
const FPS_WINDOW: usize = 60;

/// Tracks frame time and frames-per-second
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Duration of the last frame (seconds)
    pub frame_time: f32,
    /// Instantaneous FPS from the last frame
    pub fps: u32,
    /// Total wall time seen (seconds)
    pub total_time: f64,
    /// Ring of recent frame durations
    frame_times: [f32; FPS_WINDOW],
    frame_index: usize,
    samples: usize,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            frame_time: 0.0,
            fps: 0,
            total_time: 0.0,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            samples: 0,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame's duration. Call once per frame.
    pub fn update(&mut self, frame_time: f32) {
        let frame_time = if frame_time.is_finite() {
            frame_time.max(0.0)
        } else {
            0.0
        };

        self.frame_time = frame_time;
        self.total_time += frame_time as f64;
        self.fps = if frame_time > 0.0 {
            (1.0 / frame_time) as u32
        } else {
            0
        };

        self.frame_times[self.frame_index] = frame_time;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        self.samples = (self.samples + 1).min(FPS_WINDOW);
    }

    /// FPS averaged over the last `FPS_WINDOW` frames
    pub fn average_fps(&self) -> u32 {
        let elapsed: f32 = self.frame_times[..self.samples].iter().sum();
        if elapsed > 0.0 {
            (self.samples as f32 / elapsed).round() as u32
        } else {
            0
        }
    }
}
