//! The time-window behavior protocol
//!
//! A behavior is driven by the field with consecutive windows `[start, end)`
//! of its own local time. The first window starts at 0, every later window
//! starts where the previous one ended. `update` applies the effect of one
//! window and returns a negative number while the behavior is still running,
//! or the non-negative leftover time (how much of the window it did not use)
//! once it has completed.
//!
//! Effects are expressed as differences of the eased progress between `start`
//! and `end`, so slicing a lifespan into many windows produces the same total
//! effect as one window covering it all.

mod continuous;
mod emit;
mod leaf;
mod parallel;

pub use continuous::{Continuous, Loop, LoopSteps, Repeat, RepeatSteps, SequenceSteps, Sequential, Steps};
pub use emit::Emit;
pub use leaf::{Modify, Nop, Rotate, Switch, SwitchAction, Translate};
pub use parallel::Parallel;

use crate::easing::Easing;
use crate::field::Field;
use crate::particle::Particle;
use std::fmt;

/// Upper bound on sub-behaviors a continuous combinator completes in one call
pub const MAX_STEPS_PER_UPDATE: usize = 100;

/// Tolerance when checking that windows are contiguous
const WINDOW_EPSILON: f64 = 1e-9;

/// Where a behavior is in its life
#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Uninitialized,
    Running { last_end: f64 },
}

/// Easing, lifespan and protocol state shared by every behavior
#[derive(Debug, Clone, PartialEq)]
pub struct Timing {
    easing: Easing,
    lifespan: f64,
    phase: Phase,
}

impl Timing {
    /// Timing of an instantaneous behavior
    pub fn new() -> Self {
        Self::with_lifespan(0.0)
    }

    /// Timing of a behavior that runs until its own completion criterion fires
    pub fn unbounded() -> Self {
        Self::with_lifespan(f64::INFINITY)
    }

    pub fn with_lifespan(lifespan: f64) -> Self {
        Self {
            easing: Easing::default(),
            lifespan,
            phase: Phase::Uninitialized,
        }
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn lifespan(&self) -> f64 {
        self.lifespan
    }

    pub fn set_easing(&mut self, easing: Easing) {
        debug_assert!(
            self.phase == Phase::Uninitialized,
            "easing changed after the first update"
        );
        self.easing = easing;
    }

    pub fn set_lifespan(&mut self, lifespan: f64) {
        debug_assert!(
            self.phase == Phase::Uninitialized,
            "lifespan changed after the first update"
        );
        debug_assert!(lifespan >= 0.0, "negative lifespan {}", lifespan);
        self.lifespan = lifespan;
    }

    /// Whether the first window has been seen
    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    /// Record the window `[start, end)`
    ///
    /// Returns true on the first window.
    pub fn begin(&mut self, start: f64, end: f64) -> bool {
        debug_assert!(end >= start, "window [{}, {}) runs backwards", start, end);
        let first = match self.phase {
            Phase::Uninitialized => {
                debug_assert!(start == 0.0, "first window starts at {}", start);
                true
            }
            Phase::Running { last_end } => {
                debug_assert!(
                    (start - last_end).abs() <= WINDOW_EPSILON * last_end.abs().max(1.0),
                    "window starts at {} after ending at {}",
                    start,
                    last_end
                );
                false
            }
        };
        self.phase = Phase::Running { last_end: end };
        first
    }

    /// Eased progress at local time `t`
    pub fn at(&self, t: f64) -> f64 {
        self.easing.at(t, self.lifespan)
    }

    /// Eased progress made over `[a, b)`
    pub fn delta(&self, a: f64, b: f64) -> f64 {
        self.easing.delta(a, b, self.lifespan)
    }

    /// Completion by lifespan: the leftover once `end` reaches it, else -1
    pub fn finish(&self, start: f64, end: f64) -> f64 {
        if end >= self.lifespan {
            end - self.lifespan.max(start)
        } else {
            -1.0
        }
    }
}

/// End of the window a combinator passes to its children
///
/// The window stops at the combinator's lifespan. A lifespan already reached
/// at `start` (only a zero lifespan on the first window) leaves the window
/// whole, so instantaneous children still see time pass and take effect.
pub(crate) fn clip(start: f64, end: f64, lifespan: f64) -> f64 {
    if lifespan > start {
        end.min(lifespan)
    } else {
        end
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new()
    }
}

/// A stateful, single-use animation step driven by time windows
pub trait Behavior: fmt::Debug {
    fn timing(&self) -> &Timing;

    fn timing_mut(&mut self) -> &mut Timing;

    /// Apply the effect of `[start, end)` to `particle`
    ///
    /// Returns a negative number while incomplete, or the unused leftover
    /// of the window once complete.
    fn update(&mut self, field: &mut Field, particle: &mut Particle, start: f64, end: f64) -> f64;

    fn easing(&self) -> Easing {
        self.timing().easing()
    }

    fn lifespan(&self) -> f64 {
        self.timing().lifespan()
    }

    fn set_easing(&mut self, easing: Easing) {
        self.timing_mut().set_easing(easing);
    }

    fn set_lifespan(&mut self, lifespan: f64) {
        self.timing_mut().set_lifespan(lifespan);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_finish() {
        let timing = Timing::with_lifespan(10.0);
        assert_eq!(timing.finish(0.0, 4.0), -1.0);
        assert_eq!(timing.finish(4.0, 10.0), 0.0);
        assert_eq!(timing.finish(8.0, 12.0), 2.0);

        // completion inside a window that started after the lifespan
        assert_eq!(timing.finish(11.0, 12.0), 1.0);
        assert!(Timing::unbounded().finish(0.0, 1e12) < 0.0);
    }

    #[test]
    fn test_timing_phases() {
        let mut timing = Timing::with_lifespan(5.0);
        assert!(!timing.is_running());
        assert!(timing.begin(0.0, 1.0));
        assert!(timing.is_running());
        assert!(!timing.begin(1.0, 2.5));
        assert!(!timing.begin(2.5, 2.5));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "first window")]
    fn test_first_window_must_start_at_zero() {
        Timing::new().begin(1.0, 2.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "after ending")]
    fn test_windows_must_be_contiguous() {
        let mut timing = Timing::new();
        timing.begin(0.0, 1.0);
        timing.begin(2.0, 3.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "lifespan changed")]
    fn test_lifespan_frozen_once_running() {
        let mut timing = Timing::new();
        timing.begin(0.0, 1.0);
        timing.set_lifespan(3.0);
    }
}
