//! Generators: compiled values parameterized by sibling position
//!
//! Every compiled pattern value is a [`Gen`]. When a batch of particles is
//! emitted together, each member asks the generator for its own value with
//! its [`Sibling`] position, which is how `[...]` variation spreads across a
//! batch.

use crate::behavior::Behavior;
use crate::rng::PatternRng;
use std::fmt;
use std::rc::Rc;

/// Position of one particle within a batch spawned together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sibling {
    /// Index within the batch
    pub index: usize,
    /// Size of the batch
    pub total: usize,
}

impl Sibling {
    /// The only member of a batch of one
    pub const SINGLE: Sibling = Sibling { index: 0, total: 1 };

    /// Create a sibling position
    pub fn new(index: usize, total: usize) -> Self {
        Self { index, total }
    }
}

/// A shared function from a sibling position to a value
pub struct Gen<T> {
    generate: Rc<dyn Fn(Sibling, &mut PatternRng) -> T>,
}

/// Generator of fresh behavior trees
pub type BehaviorGen = Gen<Box<dyn Behavior>>;

impl<T> Clone for Gen<T> {
    fn clone(&self) -> Self {
        Self {
            generate: Rc::clone(&self.generate),
        }
    }
}

impl<T> fmt::Debug for Gen<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Gen")
    }
}

impl<T: 'static> Gen<T> {
    /// Wrap a generating function
    pub fn new(generate: impl Fn(Sibling, &mut PatternRng) -> T + 'static) -> Self {
        Self {
            generate: Rc::new(generate),
        }
    }

    /// A generator ignoring its sibling position
    pub fn constant(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(move |_, _| value.clone())
    }

    /// Produce the value for one sibling
    pub fn generate(&self, sibling: Sibling, rng: &mut PatternRng) -> T {
        (self.generate)(sibling, rng)
    }

    /// Transform every generated value
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Gen<U> {
        Gen::new(move |sibling, rng| f(self.generate(sibling, rng)))
    }
}
