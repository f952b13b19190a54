//! Frame timing

/// Per-frame delta tracker fed from a monotonic clock sample in seconds
///
/// The clock source itself (GLFW's timer in the viewer) stays outside so the
/// delta computation can be driven with arbitrary sample sequences.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_frame: f64,
    delta_time: f32,
    total_time: f64,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a clock whose previous sample is time zero
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    /// Create a clock whose previous sample is `now`
    ///
    /// Lets the first frame after a slow startup report a small delta.
    pub fn starting_at(now: f64) -> Self {
        Self {
            last_frame: now,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Record a new sample and return the delta since the previous one
    ///
    /// A sample earlier than the previous one yields a zero delta; the new
    /// sample still becomes the reference for the next frame. Non-finite
    /// samples are ignored.
    pub fn tick(&mut self, now: f64) -> f32 {
        let elapsed = now - self.last_frame;
        self.delta_time = if elapsed.is_finite() && elapsed > 0.0 {
            elapsed as f32
        } else {
            if elapsed < 0.0 {
                log::warn!("Clock went backwards by {:.6}s, clamping frame delta to zero", -elapsed);
            }
            0.0
        };
        if now.is_finite() {
            self.last_frame = now;
        }
        self.total_time += f64::from(self.delta_time);
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the accumulated frame time in seconds
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Get the number of ticks recorded
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the current FPS (based on last frame time)
    pub fn current_fps(&self) -> f32 {
        if self.delta_time > 0.0 {
            1.0 / self.delta_time
        } else {
            0.0
        }
    }
}
