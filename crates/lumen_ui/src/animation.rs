//! Easing curves and the per-node transition clock.
//!
//! Curve equations are fixed so that two runs with the same frame deltas
//! produce bit-identical interpolated values.

use std::f32::consts::PI;

use crate::property::property_enum;

property_enum! {
    /// Easing curve applied to normalized transition time.
    #[derive(Default)]
    pub enum Easing {
        /// `t`.
        #[default]
        Linear = 0,
        /// `t²`.
        EaseInQuad = 1,
        /// `1 - (1 - t)²`.
        EaseOutQuad = 2,
        /// Quadratic in, then out.
        EaseInOutQuad = 3,
        /// `t³`.
        EaseInCubic = 4,
        /// `1 - (1 - t)³`.
        EaseOutCubic = 5,
        /// Cubic in, then out.
        EaseInOutCubic = 6,
        /// `1 - cos(tπ/2)`.
        EaseInSine = 7,
        /// `sin(tπ/2)`.
        EaseOutSine = 8,
        /// `-(cos(πt) - 1) / 2`.
        EaseInOutSine = 9,
    }
}

impl Easing {
    /// Applies the easing function to a t value (0-1).
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match self {
            Self::Linear => t,
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseInCubic => t * t * t,
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Self::EaseOutSine => (t * PI / 2.0).sin(),
            Self::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}

property_enum! {
    /// Unit of a transition duration.
    pub enum TimeUnit {
        /// Milliseconds.
        Milliseconds = 0,
        /// Seconds.
        Seconds = 1,
    }
}

impl TimeUnit {
    /// Converts `duration` in this unit to milliseconds.
    ///
    /// NaN, infinite and negative durations collapse to zero, meaning
    /// "assign immediately".
    #[must_use]
    pub fn to_millis(self, duration: f32) -> f32 {
        let ms = match self {
            Self::Milliseconds => duration,
            Self::Seconds => duration * 1000.0,
        };
        if ms.is_finite() && ms > 0.0 {
            ms
        } else {
            0.0
        }
    }
}

/// Time base of one node's transition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransitionClock {
    clock_ms: f32,
    duration_ms: f32,
    easing: Easing,
    running: bool,
}

impl TransitionClock {
    /// Restarts at zero with a new duration and curve.
    ///
    /// A zero duration leaves the clock stopped: the caller assigns the
    /// target immediately.
    pub fn restart(&mut self, duration_ms: f32, easing: Easing) {
        self.clock_ms = 0.0;
        self.duration_ms = if duration_ms.is_finite() { duration_ms.max(0.0) } else { 0.0 };
        self.easing = easing;
        self.running = self.duration_ms > 0.0;
    }

    /// Advances by `dt_ms` and returns the raw progress.
    pub fn advance(&mut self, dt_ms: f32) -> f32 {
        if !self.running {
            return 1.0;
        }
        if dt_ms.is_finite() && dt_ms > 0.0 {
            self.clock_ms += dt_ms;
        }
        let t = self.progress();
        if t >= 1.0 {
            self.running = false;
        }
        t
    }

    /// Raw progress in `[0, 1]`; 1 when stopped.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (self.clock_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Stops the clock; progress reads 1.
    pub fn finish(&mut self) {
        self.clock_ms = self.duration_ms;
        self.running = false;
    }

    /// Returns true while a transition is in flight.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Elapsed milliseconds since the last restart.
    #[must_use]
    pub fn clock_ms(&self) -> f32 {
        self.clock_ms
    }

    /// Duration in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    /// Curve applied to the progress.
    #[must_use]
    pub fn easing(&self) -> Easing {
        self.easing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 10] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseInSine,
        Easing::EaseOutSine,
        Easing::EaseInOutSine,
    ];

    #[test]
    fn test_curves_pin_endpoints() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
            assert_eq!(easing.apply(-3.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(7.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn test_curve_midpoints() {
        assert!((Easing::EaseInQuad.apply(0.5) - 0.25).abs() < 1e-6);
        assert!((Easing::EaseOutQuad.apply(0.5) - 0.75).abs() < 1e-6);
        assert!((Easing::EaseInOutCubic.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((Easing::EaseInOutSine.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((Easing::EaseInCubic.apply(0.5) - 0.125).abs() < 1e-6);
    }

    #[test]
    fn test_raw_round_trip() {
        for easing in ALL {
            assert_eq!(Easing::from_raw(easing.to_raw()), Some(easing));
        }
        assert_eq!(Easing::from_raw(99), None);
    }

    #[test]
    fn test_time_unit_conversion() {
        assert_eq!(TimeUnit::Seconds.to_millis(0.2), 200.0);
        assert_eq!(TimeUnit::Milliseconds.to_millis(150.0), 150.0);
        assert_eq!(TimeUnit::Milliseconds.to_millis(-1.0), 0.0);
        assert_eq!(TimeUnit::Seconds.to_millis(f32::NAN), 0.0);
    }

    #[test]
    fn test_clock_reaches_end() {
        let mut clock = TransitionClock::default();
        clock.restart(200.0, Easing::Linear);
        assert!(clock.is_running());

        assert!((clock.advance(100.0) - 0.5).abs() < 1e-6);
        assert_eq!(clock.advance(150.0), 1.0);
        assert!(!clock.is_running());
    }

    #[test]
    fn test_zero_duration_is_immediate() {
        let mut clock = TransitionClock::default();
        clock.restart(0.0, Easing::EaseInQuad);
        assert!(!clock.is_running());
        assert_eq!(clock.advance(0.0), 1.0);
    }
}
