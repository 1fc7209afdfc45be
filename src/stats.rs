// Frame timing, kept out of the render path.
// The host creates one observer, feeds it once per frame and drops it on exit.

use std::time::{Duration, Instant};

pub trait FrameObserver {
    /// Called once per presented frame.
    fn frame(&mut self, now: Instant);
    /// Short human-readable status for overlays.
    fn summary(&self) -> &str;
}

/// Counts frames and reports FPS once per `window` (one second by default).
pub struct FpsCounter {
    window: Duration,
    window_start: Option<Instant>,
    frames: u32,
    fps: f32,
    text: String,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::with_window(Duration::from_secs(1))
    }

    pub fn with_window(window: Duration) -> Self {
        Self { window, window_start: None, frames: 0, fps: 0.0, text: String::from("FPS: 0.0") }
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameObserver for FpsCounter {
    fn frame(&mut self, now: Instant) {
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;
        let elapsed = now.duration_since(start);
        if elapsed >= self.window {
            self.fps = self.frames as f32 / elapsed.as_secs_f32();
            self.text = format!("FPS: {:.1}", self.fps);
            log::info!("{}", self.text);
            self.frames = 0;
            self.window_start = Some(now);
        }
    }

    fn summary(&self) -> &str {
        &self.text
    }
}
