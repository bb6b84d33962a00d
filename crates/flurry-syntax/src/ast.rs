//! Abstract syntax for pattern programs
//!
//! The language has three kinds of term: numbers, symbols and lists. Sugar
//! forms (`[...]`, `<...>`, `{...}`) desugar to lists headed by one of the
//! sentinel symbols below.

use crate::error::{Error, Result};
use crate::grammar;
use crate::printer::{self, PrintOptions};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Head of `[a b c]`
pub const EACH_CHOICE: &str = "each-choice";
/// Head of `[a..b]`
pub const EACH_RANGE: &str = "each-range";
/// Bare symbol for `[]`
pub const EACH_ANGLE: &str = "each-angle";
/// Head of `<a b c>`
pub const RANDOM_CHOICE: &str = "random-choice";
/// Head of `<a..b>`
pub const RANDOM_RANGE: &str = "random-range";
/// Bare symbol for `<>`
pub const RANDOM_ANGLE: &str = "random-angle";
/// Head of `{ ... | ... }`
pub const BLOCK: &str = "block";

/// A single syntax term
///
/// Serializes untagged, so the plain-data form is a nested structure of
/// numbers, strings and arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Term {
    /// Numeric literal
    Number(f64),
    /// Identifier
    Symbol(String),
    /// Parenthesized sequence
    List(Vec<Term>),
}

impl Term {
    /// Create a number term
    pub fn number(value: f64) -> Self {
        Term::Number(value)
    }

    /// Create a symbol term
    pub fn symbol(name: impl Into<String>) -> Self {
        Term::Symbol(name.into())
    }

    /// Create a list term
    pub fn list(elements: impl Into<Vec<Term>>) -> Self {
        Term::List(elements.into())
    }

    /// Try to get this term as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Term::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get this term as a symbol name
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Term::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this term's list elements
    pub fn as_list(&self) -> Option<&[Term]> {
        match self {
            Term::List(elements) => Some(elements),
            _ => None,
        }
    }

    /// The symbol at the head of a list, if any
    pub fn head_symbol(&self) -> Option<&str> {
        self.as_list()
            .and_then(|elements| elements.first())
            .and_then(Term::as_symbol)
    }

    /// Get the kind name of this term
    pub fn type_name(&self) -> &'static str {
        match self {
            Term::Number(_) => "number",
            Term::Symbol(_) => "symbol",
            Term::List(_) => "list",
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Term::Number(n) if !n.is_finite() => {
                Err(Error::Load(format!("non-finite number {}", n)))
            }
            Term::Number(_) => Ok(()),
            Term::Symbol(name) if !grammar::is_symbol(name) => {
                Err(Error::Load(format!("invalid symbol {:?}", name)))
            }
            Term::Symbol(_) => Ok(()),
            Term::List(elements) => elements.iter().try_for_each(Term::validate),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = PrintOptions {
            indent: false,
            sugar: true,
        };
        f.write_str(&printer::print_term(self, options))
    }
}

impl From<f64> for Term {
    fn from(n: f64) -> Self {
        Term::Number(n)
    }
}

impl From<&str> for Term {
    fn from(s: &str) -> Self {
        Term::Symbol(s.to_string())
    }
}

impl From<String> for Term {
    fn from(s: String) -> Self {
        Term::Symbol(s)
    }
}

impl From<Vec<Term>> for Term {
    fn from(elements: Vec<Term>) -> Self {
        Term::List(elements)
    }
}

/// An ordered sequence of top-level statements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Program(pub Vec<Term>);

impl Program {
    /// Create a program from its statements
    pub fn new(statements: Vec<Term>) -> Self {
        Self(statements)
    }

    /// The top-level statements
    pub fn statements(&self) -> &[Term] {
        &self.0
    }

    /// Number of statements
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the program has no statements
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the statements
    pub fn iter(&self) -> impl Iterator<Item = &Term> {
        self.0.iter()
    }
}

impl From<Vec<Term>> for Program {
    fn from(statements: Vec<Term>) -> Self {
        Self(statements)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&printer::print(self, PrintOptions::default()))
    }
}

/// Convert a program to plain data for persistence
pub fn dump(program: &Program) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(program)?)
}

/// Rebuild a program from plain data produced by [`dump`]
///
/// Symbols must be valid identifiers and numbers finite, so that anything
/// loaded can be printed back to parseable source.
pub fn load(value: &serde_json::Value) -> Result<Program> {
    let program: Program = serde_json::from_value(value.clone())?;
    program.iter().try_for_each(Term::validate)?;
    Ok(program)
}
