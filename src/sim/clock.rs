//! Session clock
//!
//! All behavior timers read elapsed time from here, so suspending the clock
//! freezes every timer in place.

#[derive(Debug, Clone)]
pub struct Clock {
    elapsed: f32,
    max_delta: f32,
    running: bool,
}

impl Clock {
    pub fn new(max_delta: f32) -> Self {
        Self {
            elapsed: 0.0,
            max_delta,
            running: true,
        }
    }

    /// Seconds of simulated time since the session started
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance by a host delta clamped to `[0, max_delta]`; returns the
    /// delta actually applied (0 while suspended)
    pub fn advance(&mut self, raw_delta: f32) -> f32 {
        if !self.running || !raw_delta.is_finite() {
            return 0.0;
        }
        let delta = raw_delta.clamp(0.0, self.max_delta);
        self.elapsed += delta;
        delta
    }

    pub fn suspend(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        self.running = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_is_bounded() {
        let mut clock = Clock::new(0.1);
        assert_eq!(clock.advance(0.05), 0.05);
        assert_eq!(clock.advance(2.0), 0.1);
        assert_eq!(clock.advance(-1.0), 0.0);
        assert!((clock.elapsed() - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_suspended_clock_stands_still() {
        let mut clock = Clock::new(0.1);
        clock.advance(0.1);
        clock.suspend();

        assert_eq!(clock.advance(0.1), 0.0);
        assert_eq!(clock.elapsed(), 0.1);

        clock.resume();
        clock.advance(0.05);
        assert!((clock.elapsed() - 0.15).abs() < 1e-6);
    }
}
