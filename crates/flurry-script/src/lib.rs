//! Flurry Script - the pattern compiler
//!
//! Turns parsed programs into generators of behavior trees:
//! - Built-in names: models, easing curves, property operators and combinators
//! - Polymorphic compile-time units answering model/number/easing/behavior queries
//! - `[...]` and `<...>` variation spread across siblings or drawn at random
//! - `Pattern` for parsing and compiling source in one call

mod compiler;
mod error;
mod names;
mod operator;
mod pattern;
mod unit;

pub use compiler::Compiler;
pub use error::{CompileError, CompileResult, Error, Result};
pub use pattern::Pattern;
