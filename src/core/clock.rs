use std::time::Instant;

/// Frame timing for the per-frame shader inputs
///
/// `tick` once per displayed frame; it reports the time since the previous
/// tick and the total time since the clock started.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last_tick: Instant,
    frame_number: u64,
}

/// Timing of one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    pub number: u64,
    /// Seconds since the clock started
    pub elapsed: f32,
    /// Seconds since the previous frame
    pub delta: f32,
}

impl FrameClock {
    /// Create new clock starting now
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            frame_number: 0,
        }
    }

    /// Advance to the next frame
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let time = FrameTime {
            number: self.frame_number,
            elapsed: now.duration_since(self.start).as_secs_f32(),
            delta: now.duration_since(self.last_tick).as_secs_f32(),
        };
        self.last_tick = now;
        self.frame_number += 1;
        time
    }

    /// Forget the time spent before the first real frame (loading)
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
