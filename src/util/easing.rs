//! Easing curves for time-driven camera animation.

use serde::{Deserialize, Serialize};

/// Easing curve mapping normalized time to normalized progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// No easing.
    Linear,
    /// Fast start, slow end.
    QuadraticOut,
    /// Slow start and end, symmetric around `t = 0.5`.
    #[default]
    CubicInOut,
}

impl EasingFunction {
    /// Evaluate the curve at `t`, clamped to `[0, 1]`.
    ///
    /// Every curve maps 0 to 0 and 1 to 1.
    #[inline]
    #[must_use]
    pub fn evaluate(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EasingFunction; 3] = [
        EasingFunction::Linear,
        EasingFunction::QuadraticOut,
        EasingFunction::CubicInOut,
    ];

    #[test]
    fn endpoints() {
        for f in ALL {
            assert_eq!(f.evaluate(0.0), 0.0);
            assert!((f.evaluate(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn input_is_clamped() {
        for f in ALL {
            assert_eq!(f.evaluate(-1.0), 0.0);
            assert!((f.evaluate(2.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn monotonic() {
        for f in ALL {
            let mut prev = f.evaluate(0.0);
            for i in 1..=100 {
                let v = f.evaluate(i as f32 / 100.0);
                assert!(v >= prev - 1e-6, "{f:?} not monotonic at {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn cubic_in_out_is_symmetric() {
        let f = EasingFunction::CubicInOut;
        assert!((f.evaluate(0.5) - 0.5).abs() < 1e-6);
        for t in [0.1, 0.25, 0.4] {
            assert!((f.evaluate(t) + f.evaluate(1.0 - t) - 1.0).abs() < 1e-5);
        }
        assert!(f.evaluate(0.1) < 0.1);
    }
}
