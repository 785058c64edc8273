//! Fixed-duration value transitions
//!
//! A [`Tween`] interpolates a single `f32` between two values over a fixed
//! duration. It is advanced explicitly by the owner with the frame delta, so
//! pausing the owner freezes the tween mid-flight.

use std::time::Duration;

use crate::easing::Easing;

/// An eased transition between two values
#[derive(Clone, Copy, Debug)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing: Easing::default(),
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Normalized progress in `[0, 1]` before easing
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Current value
    pub fn value(&self) -> f32 {
        let t = self.easing.apply(self.progress());
        self.from + (self.to - self.from) * t
    }

    /// Advance by `dt` and return the new value
    pub fn step(&mut self, dt: Duration) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.value()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_tween_progresses() {
        let mut tween = Tween::new(0.0, -40.0, Duration::from_secs(1)).with_easing(Easing::Linear);
        assert_eq!(tween.value(), 0.0);

        let v = tween.step(Duration::from_millis(250));
        assert!((v + 10.0).abs() < 1e-4);
        assert!(!tween.is_finished());

        tween.step(Duration::from_secs(5));
        assert!(tween.is_finished());
        assert_eq!(tween.value(), -40.0);
    }

    #[test]
    fn test_zero_duration_is_finished_immediately() {
        let tween = Tween::new(0.0, 12.0, Duration::ZERO);
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 12.0);
    }
}
