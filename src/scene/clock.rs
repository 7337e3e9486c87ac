//! Frame-count animation clock

use crate::consts::CLOCK_STEP;

/// Monotonic scene time, advanced by a fixed step once per rendered frame
///
/// Kept in f64: an f32 accumulator stalls once the step drops below half its
/// spacing (t = 65536, about 84 hours at 60 Hz).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationClock {
    time: f64,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one frame and return the new time
    pub fn tick(&mut self) -> f64 {
        self.time += CLOCK_STEP;
        self.time
    }

    /// Current time without advancing
    pub fn time(&self) -> f64 {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_advances_fixed_step() {
        let mut clock = AnimationClock::new();
        assert_eq!(clock.time(), 0.0);
        assert_eq!(clock.tick(), CLOCK_STEP);
        assert!((clock.tick() - 2.0 * CLOCK_STEP).abs() < 1e-15);
    }

    #[test]
    fn test_tick_is_monotonic() {
        let mut clock = AnimationClock::new();
        let mut last = clock.time();
        for _ in 0..10_000 {
            let t = clock.tick();
            assert!(t > last);
            last = t;
        }
        assert!((last - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_keeps_advancing_over_long_sessions() {
        // Past t = 65536, where an f32 clock stops moving
        let mut clock = AnimationClock::new();
        for _ in 0..20_000_000 {
            clock.tick();
        }
        let t = clock.time();
        assert!(t > 65_536.0);
        assert!((t - 60_000.0).abs() < 1e-3);
        let next = clock.tick();
        assert!(next > t);
        assert!((next - t - CLOCK_STEP).abs() < 1e-9);
    }
}
