//! Easing curves for timed transitions
//!
//! Maps normalized progress (0.0 to 1.0) through a curve. Transitions use
//! these to shape the interpolation of visual parameters over a fixed
//! duration.

/// Easing function applied to normalized transition progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// Constant rate
    Linear,
    /// Cubic acceleration from rest
    EaseIn,
    /// Cubic deceleration into rest
    EaseOut,
    /// Cubic acceleration then deceleration
    #[default]
    EaseInOut,
}

impl Easing {
    /// Apply the curve to a progress value
    ///
    /// Input is clamped to 0.0..=1.0; output stays within the same range
    /// (no overshoot).
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [Easing; 4] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
    ];

    #[test]
    fn test_endpoints() {
        for curve in CURVES {
            assert_eq!(curve.apply(0.0), 0.0, "{curve:?} at 0");
            assert_eq!(curve.apply(1.0), 1.0, "{curve:?} at 1");
        }
    }

    #[test]
    fn test_monotonic() {
        for curve in CURVES {
            let mut prev = 0.0;
            for i in 1..=100 {
                let value = curve.apply(i as f32 / 100.0);
                assert!(value >= prev, "{curve:?} decreased at step {i}");
                prev = value;
            }
        }
    }

    #[test]
    fn test_clamps_out_of_range_input() {
        for curve in CURVES {
            assert_eq!(curve.apply(-1.0), 0.0);
            assert_eq!(curve.apply(2.0), 1.0);
        }
    }

    #[test]
    fn test_ease_in_out_midpoint() {
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }
}
