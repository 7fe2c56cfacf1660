//! Animation frames.

/// One frame of an animation: its index and the time it spans.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// Frame number.
    pub index: u64,
    /// Seconds between consecutive frames.
    pub time_interval: f64,
}

impl Default for Frame {
    /// Frame 0 at 60 frames per second.
    fn default() -> Self {
        Self {
            index: 0,
            time_interval: 1.0 / 60.0,
        }
    }
}

impl Frame {
    /// Frame `index` spanning `time_interval` seconds.
    pub fn new(index: u64, time_interval: f64) -> Self {
        Self {
            index,
            time_interval,
        }
    }

    /// Elapsed time at the start of this frame.
    pub fn time_in_seconds(&self) -> f64 {
        self.index as f64 * self.time_interval
    }

    /// Move to the next frame. Saturates at `u64::MAX`.
    pub fn advance(&mut self) {
        self.advance_by(1);
    }

    /// Move forward `delta` frames. Saturates at `u64::MAX`.
    pub fn advance_by(&mut self, delta: u64) {
        self.index = self.index.saturating_add(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_increments_index() {
        let mut f = Frame::new(3, 0.5);
        f.advance();
        assert_eq!(f.index, 4);
        f.advance_by(2);
        assert_eq!(f.index, 6);
        assert_eq!(f.time_in_seconds(), 3.0);
    }

    #[test]
    fn advance_saturates_at_the_last_index() {
        let mut f = Frame::new(u64::MAX - 1, 0.1);
        f.advance();
        assert_eq!(f.index, u64::MAX);
        f.advance();
        assert_eq!(f.index, u64::MAX);
        f.advance_by(10);
        assert_eq!(f.index, u64::MAX);
    }

    #[test]
    fn default_runs_at_sixty_hz() {
        let f = Frame::default();
        assert_eq!(f.index, 0);
        assert!((f.time_interval - 1.0 / 60.0).abs() < 1e-15);
    }
}
