/// How often the FPS readout refreshes, in seconds
pub const FPS_UPDATE_INTERVAL: f32 = 1.0;

/// Frames-per-second counter behind the stats readout
///
/// Counts frames and republishes the average once per refresh interval so
/// the number stays readable.
#[derive(Debug, Clone, Copy)]
pub struct FpsCounter {
    interval: f32,
    frame_count: u32,
    timer: f32,
    fps: f32,
}

impl FpsCounter {
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(f32::EPSILON),
            frame_count: 0,
            timer: 0.0,
            fps: 0.0,
        }
    }

    /// Record one frame, returns true when the readout changed
    pub fn tick(&mut self, delta: f32) -> bool {
        self.frame_count += 1;
        self.timer += delta;

        if self.timer >= self.interval {
            self.fps = self.frame_count as f32 / self.timer;
            self.frame_count = 0;
            self.timer = 0.0;
            true
        } else {
            false
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Average frame time of the last interval in milliseconds
    pub fn frame_ms(&self) -> f32 {
        if self.fps > 0.0 {
            1000.0 / self.fps
        } else {
            0.0
        }
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(FPS_UPDATE_INTERVAL)
    }
}
