//! Flurry Core - the pattern runtime
//!
//! This crate executes compiled patterns:
//! - Generators of per-sibling values (`Gen`, `Sibling`)
//! - A deterministic RNG for `random-*` choices (`PatternRng`)
//! - Easing curves (`Easing`)
//! - Particles and the field that owns and drives them (`Particle`, `Field`)
//! - The time-window behavior protocol and its leaf and combinator behaviors
//!
//! ```
//! use flurry_core::behavior::{Behavior, Modify};
//! use flurry_core::{Field, Particle, Property};
//!
//! let mut speed_up = Modify::add(Property::Speed, 2.0);
//! speed_up.set_lifespan(1.0);
//!
//! let mut field = Field::default();
//! field.add(Particle::new(Box::new(speed_up)));
//! field.update(0.5);
//! assert_eq!(field.iter().next().map(|p| p.speed), Some(1.0));
//! ```

pub mod behavior;
pub mod easing;
mod error;
pub mod field;
pub mod gen;
pub mod particle;
mod rng;

pub use behavior::{Behavior, Timing};
pub use easing::Easing;
pub use error::{Error, Result};
pub use field::{Field, FieldConfig};
pub use gen::{BehaviorGen, Gen, Sibling};
pub use particle::{Model, ModifyOp, Particle, Property};
pub use rng::PatternRng;
