use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,

    /// Seconds since the clock was created or last reset. Drives animation.
    pub elapsed: f32,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// `FrameClock` is designed to be used per window (or per loop) so that multi-window
/// applications do not share delta-time state.
///
/// Delta time is clamped to avoid pathological values when the application is paused
/// by the debugger, minimized, or stalls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with dt clamped to 0.1 ms ..= 250 ms.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_min: Duration::from_micros(100),
            dt_max: Duration::from_millis(250),
        }
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the clock baseline and elapsed time.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.start = now;
        self.last = now;
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let mut dt = now.saturating_duration_since(self.last);

        // Clamp delta time to keep downstream systems stable.
        if dt < self.dt_min {
            dt = self.dt_min;
        } else if dt > self.dt_max {
            dt = self.dt_max;
        }

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dt_is_clamped_and_frames_count_up() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(5), Duration::from_millis(10));
        let a = clock.tick();
        let b = clock.tick();
        assert_eq!(a.frame_index, 0);
        assert_eq!(b.frame_index, 1);
        assert!(a.dt >= 0.005 && a.dt <= 0.010);
        assert!(b.elapsed >= a.elapsed);
    }

    #[test]
    fn reset_restarts_elapsed() {
        let mut clock = FrameClock::new();
        std::thread::sleep(Duration::from_millis(2));
        clock.reset();
        assert!(clock.tick().elapsed < 1.0);
    }
}
