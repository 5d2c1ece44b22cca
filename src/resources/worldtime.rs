//! Simulation clock advanced once per frame by the driver.

/// Frame timing as seen by game code.
#[derive(Debug, Clone, Copy)]
pub struct WorldTime {
    /// Total scaled seconds since `init`.
    pub elapsed: f32,
    /// Scaled delta of the current frame.
    pub delta: f32,
    /// Multiplier applied to every host delta.
    pub time_scale: f32,
    /// Frames advanced so far.
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Advance by a raw host delta and return the scaled delta.
    /// Negative deltas are treated as zero.
    pub fn advance(&mut self, raw_dt: f32) -> f32 {
        let dt = raw_dt.max(0.0) * self.time_scale.max(0.0);
        self.delta = dt;
        self.elapsed += dt;
        self.frame_count += 1;
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_scales_and_counts() {
        let mut t = WorldTime::default().with_time_scale(0.5);
        let dt = t.advance(0.2);
        assert!((dt - 0.1).abs() < 1e-6);
        assert!((t.elapsed - 0.1).abs() < 1e-6);
        assert_eq!(t.frame_count, 1);
    }

    #[test]
    fn test_negative_delta_is_zero() {
        let mut t = WorldTime::default();
        assert_eq!(t.advance(-1.0), 0.0);
        assert_eq!(t.elapsed, 0.0);
        assert_eq!(t.frame_count, 1);
    }
}
