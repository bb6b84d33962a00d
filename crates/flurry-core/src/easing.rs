//! Easing curves shaping how a behavior's effect accumulates over its lifespan

use serde::{Deserialize, Serialize};
use std::fmt;

/// A monotonic curve from [0, 1] onto [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Every curve, in name-table order
    pub const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
    ];

    /// The name used in pattern source
    pub fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
        }
    }

    /// Apply the curve to a ratio already clamped to [0, 1]
    pub fn curve(&self, r: f64) -> f64 {
        match self {
            Easing::Linear => r,
            Easing::EaseIn => r * r,
            Easing::EaseOut => 1.0 - (1.0 - r) * (1.0 - r),
            Easing::EaseInOut => {
                if r < 0.5 {
                    2.0 * r * r
                } else {
                    1.0 - 2.0 * (1.0 - r) * (1.0 - r)
                }
            }
        }
    }

    /// Eased progress at local time `t` of a `lifespan`-long behavior
    ///
    /// A zero lifespan is an instantaneous step: no progress at `t <= 0`,
    /// full progress after.
    pub fn at(&self, t: f64, lifespan: f64) -> f64 {
        let ratio = if lifespan <= 0.0 {
            if t > 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            (t / lifespan).clamp(0.0, 1.0)
        };
        self.curve(ratio)
    }

    /// Progress made between local times `a` and `b`
    pub fn delta(&self, a: f64, b: f64, lifespan: f64) -> f64 {
        self.at(b, lifespan) - self.at(a, lifespan)
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_endpoints() {
        for easing in Easing::ALL {
            assert_eq!(easing.curve(0.0), 0.0, "{}", easing);
            assert_eq!(easing.curve(1.0), 1.0, "{}", easing);
        }
    }

    #[test]
    fn test_curves_are_monotonic() {
        for easing in Easing::ALL {
            let mut previous = 0.0;
            for step in 1..=100 {
                let value = easing.curve(step as f64 / 100.0);
                assert!(value >= previous, "{} not monotonic", easing);
                previous = value;
            }
        }
    }

    #[test]
    fn test_at_clamps() {
        assert_eq!(Easing::Linear.at(5.0, 10.0), 0.5);
        assert_eq!(Easing::Linear.at(20.0, 10.0), 1.0);
        assert_eq!(Easing::Linear.at(-1.0, 10.0), 0.0);
        assert_eq!(Easing::EaseIn.at(5.0, 10.0), 0.25);
        assert_eq!(Easing::EaseOut.at(5.0, 10.0), 0.75);
    }

    #[test]
    fn test_zero_lifespan_step() {
        assert_eq!(Easing::Linear.at(0.0, 0.0), 0.0);
        assert_eq!(Easing::Linear.at(0.1, 0.0), 1.0);
        assert_eq!(Easing::EaseInOut.delta(0.0, 1.0, 0.0), 1.0);
        assert_eq!(Easing::Linear.delta(1.0, 2.0, 0.0), 0.0);
    }

    #[test]
    fn test_delta_telescopes() {
        let easing = Easing::EaseInOut;
        let sliced = easing.delta(0.0, 3.0, 10.0)
            + easing.delta(3.0, 7.5, 10.0)
            + easing.delta(7.5, 12.0, 10.0);
        assert!((sliced - 1.0).abs() < 1e-12);
    }
}
