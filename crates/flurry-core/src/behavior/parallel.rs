//! Running several behaviors over the same windows

use super::{clip, Behavior, Timing};
use crate::field::Field;
use crate::particle::Particle;

#[derive(Debug)]
struct Branch {
    behavior: Box<dyn Behavior>,
    /// Local time at which the branch completed
    finished_at: Option<f64>,
}

/// Drives every branch with the same window; completes with the last branch
///
/// A completed branch is frozen and not updated again. The leftover on
/// completion is measured from the moment the slowest branch finished, not
/// taken as the smallest leftover any branch reported.
#[derive(Debug)]
pub struct Parallel {
    timing: Timing,
    branches: Vec<Branch>,
}

impl Parallel {
    pub fn new(behaviors: Vec<Box<dyn Behavior>>) -> Self {
        Self {
            timing: Timing::unbounded(),
            branches: behaviors
                .into_iter()
                .map(|behavior| Branch {
                    behavior,
                    finished_at: None,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}

impl Behavior for Parallel {
    fn timing(&self) -> &Timing {
        &self.timing
    }

    fn timing_mut(&mut self) -> &mut Timing {
        &mut self.timing
    }

    fn update(&mut self, field: &mut Field, particle: &mut Particle, start: f64, end: f64) -> f64 {
        self.timing.begin(start, end);
        let window_end = clip(start, end, self.timing.lifespan());

        let mut latest = start;
        let mut all_done = true;
        for branch in &mut self.branches {
            let finished_at = match branch.finished_at {
                Some(at) => at,
                None => {
                    let leftover = branch.behavior.update(field, particle, start, window_end);
                    if leftover < 0.0 {
                        all_done = false;
                        continue;
                    }
                    let at = window_end - leftover;
                    branch.finished_at = Some(at);
                    at
                }
            };
            latest = latest.max(finished_at);
        }

        if all_done {
            end - latest
        } else {
            self.timing.finish(start, end)
        }
    }
}
