//! Frame timing: FPS statistics and frame pacing.

use std::thread;
use std::time::{Duration, Instant};

use tracing::info;

/// Running FPS statistics over a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub min_fps: f64,
    pub max_fps: f64,
    fps_sum: f64,
    pub frames: u64,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            min_fps: f64::MAX,
            max_fps: 0.0,
            fps_sum: 0.0,
            frames: 0,
        }
    }
}

impl FrameStats {
    /// Record one frame that took `dt` seconds.
    pub fn record(&mut self, dt: f32) {
        self.frames += 1;
        if dt > 0.0 {
            let fps = 1.0 / f64::from(dt);
            self.min_fps = self.min_fps.min(fps);
            self.max_fps = self.max_fps.max(fps);
            self.fps_sum += fps;
        }
    }

    #[must_use]
    pub fn average_fps(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let frames = self.frames as f64;
        self.fps_sum / frames
    }

    /// Print FPS statistics.
    pub fn log_summary(&self) {
        if self.frames == 0 {
            return;
        }
        info!("FPS Statistics:");
        info!("  Min: {:.1}", self.min_fps);
        info!("  Max: {:.1}", self.max_fps);
        info!("  Avg: {:.1}", self.average_fps());
        info!("  Total frames: {}", self.frames);
    }
}

/// Measures frame delta time and sleeps to honor a target frame time.
#[derive(Debug)]
pub struct FrameClock {
    last_frame: Instant,
    target: Option<Duration>,
}

impl FrameClock {
    #[must_use]
    pub fn new(target: Option<Duration>) -> Self {
        Self {
            last_frame: Instant::now(),
            target,
        }
    }

    /// Seconds since the previous call.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        dt
    }

    /// Sleep out the rest of the frame budget of a frame begun at `start`.
    pub fn pace(&self, start: Instant) {
        if let Some(target) = self.target {
            let elapsed = start.elapsed();
            if elapsed < target {
                thread::sleep(target - elapsed);
            }
        }
    }
}
