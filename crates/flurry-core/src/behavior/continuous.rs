//! Combinators running a chain of sub-behaviors back to back

use super::{clip, Behavior, Timing, MAX_STEPS_PER_UPDATE};
use crate::field::Field;
use crate::gen::{BehaviorGen, Sibling};
use crate::particle::Particle;
use std::fmt;

/// Supplies the sub-behaviors of a [`Continuous`] combinator in order
pub trait Steps: fmt::Debug {
    /// The next sub-behavior, or None once the chain is exhausted
    fn next(&mut self, field: &mut Field, first: bool) -> Option<Box<dyn Behavior>>;
}

/// Runs the behaviors supplied by `S` one after another
///
/// Each sub-behavior sees its own local clock starting at 0; the combinator
/// keeps the offset between its clock and the current child's. Within one
/// window it completes as many children as fit, up to
/// [`MAX_STEPS_PER_UPDATE`], and a child that does not fit is started in the
/// next window. Runs until the chain is exhausted or, when given a finite
/// lifespan, until that elapses.
#[derive(Debug)]
pub struct Continuous<S> {
    timing: Timing,
    steps: S,
    current: Option<Box<dyn Behavior>>,
    offset: f64,
    fresh: bool,
}

/// Runs its body forever
pub type Loop = Continuous<LoopSteps>;

/// Runs its body a fixed number of times
pub type Repeat = Continuous<RepeatSteps>;

/// Runs a list of behaviors in order, once each
pub type Sequential = Continuous<SequenceSteps>;

impl<S: Steps> Continuous<S> {
    pub fn with_steps(steps: S) -> Self {
        Self {
            timing: Timing::unbounded(),
            steps,
            current: None,
            offset: 0.0,
            fresh: true,
        }
    }
}

impl Loop {
    pub fn new(body: BehaviorGen, sibling: Sibling) -> Self {
        Self::with_steps(LoopSteps { body, sibling })
    }
}

impl Repeat {
    pub fn new(body: BehaviorGen, sibling: Sibling, limit: usize) -> Self {
        Self::with_steps(RepeatSteps {
            body,
            sibling,
            remaining: limit,
        })
    }
}

impl Sequential {
    pub fn new(behaviors: Vec<Box<dyn Behavior>>) -> Self {
        Self::with_steps(SequenceSteps {
            behaviors: behaviors.into_iter(),
        })
    }
}

impl<S: Steps> Behavior for Continuous<S> {
    fn timing(&self) -> &Timing {
        &self.timing
    }

    fn timing_mut(&mut self) -> &mut Timing {
        &mut self.timing
    }

    fn update(&mut self, field: &mut Field, particle: &mut Particle, start: f64, end: f64) -> f64 {
        if self.timing.begin(start, end) {
            self.current = self.steps.next(field, true);
            self.offset = 0.0;
            self.fresh = true;
        }

        let window_end = clip(start, end, self.timing.lifespan());
        let mut cursor = start;
        for _ in 0..MAX_STEPS_PER_UPDATE {
            let Some(child) = self.current.as_mut() else {
                return end - cursor;
            };
            // a child always begins at its local 0, even after a deferred start
            let local_start = if self.fresh { 0.0 } else { cursor - self.offset };
            let local_end = window_end - self.offset;
            self.fresh = false;

            let leftover = child.update(field, particle, local_start, local_end);
            if leftover < 0.0 {
                return self.timing.finish(start, end);
            }

            cursor = (window_end - leftover).max(cursor);
            self.offset = cursor;
            self.fresh = true;
            self.current = self.steps.next(field, false);
            if self.current.is_none() {
                return end - cursor;
            }
            if cursor >= window_end {
                return self.timing.finish(start, end);
            }
        }

        tracing::warn!(
            start,
            end,
            "continuous behavior hit {} sub-behaviors in one update",
            MAX_STEPS_PER_UPDATE
        );
        self.timing.finish(start, end)
    }
}

/// Instantiates the same body every time
#[derive(Debug)]
pub struct LoopSteps {
    body: BehaviorGen,
    sibling: Sibling,
}

impl Steps for LoopSteps {
    fn next(&mut self, field: &mut Field, _first: bool) -> Option<Box<dyn Behavior>> {
        Some(self.body.generate(self.sibling, field.rng_mut()))
    }
}

/// Instantiates the body until the limit is reached
#[derive(Debug)]
pub struct RepeatSteps {
    body: BehaviorGen,
    sibling: Sibling,
    remaining: usize,
}

impl Steps for RepeatSteps {
    fn next(&mut self, field: &mut Field, _first: bool) -> Option<Box<dyn Behavior>> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.body.generate(self.sibling, field.rng_mut()))
    }
}

/// Hands out pre-built behaviors in order
#[derive(Debug)]
pub struct SequenceSteps {
    behaviors: std::vec::IntoIter<Box<dyn Behavior>>,
}

impl Steps for SequenceSteps {
    fn next(&mut self, _field: &mut Field, _first: bool) -> Option<Box<dyn Behavior>> {
        self.behaviors.next()
    }
}
