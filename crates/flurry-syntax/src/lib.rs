//! Flurry Syntax - the pattern language front end
//!
//! This crate turns pattern source text into syntax trees and back:
//! - Backtracking parser combinators with line/column tracking (`combinator`)
//! - The three-node term AST and its plain-data form (`Term`, `Program`)
//! - The concrete grammar, including `[...]`, `<...>` and `{...|...}` sugar
//! - A printer whose output always parses back to the same tree
//!
//! ```
//! use flurry_syntax::{parse_program, print, PrintOptions};
//!
//! let program = parse_program("60 nop\n[arrow claw] speed 2").unwrap();
//! let text = print(&program, PrintOptions::default());
//! assert_eq!(parse_program(&text).unwrap(), program);
//! ```

pub mod ast;
pub mod combinator;
mod error;
pub mod grammar;
pub mod printer;

pub use ast::{dump, load, Program, Term};
pub use error::{Error, ParseError, Result};
pub use grammar::{parse_program, parse_term};
pub use printer::{print, print_term, PrintOptions};
