//! Error types for flurry-script

use flurry_syntax::ParseError;
use thiserror::Error;

/// A well-formed program that does not make sense
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("unknown identifier `{0}`")]
    UnknownIdentifier(String),

    #[error("`{operator}` takes {expected} argument(s), got {got}")]
    Arity {
        operator: String,
        expected: String,
        got: usize,
    },

    #[error("expected {expected}, found {got}")]
    Kind { expected: &'static str, got: String },

    #[error("an empty list cannot be evaluated")]
    EmptyList,

    #[error("block branches must be programs, found `{0}`")]
    MalformedBlock(String),
}

/// Pattern loading error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Result of compilation steps
pub type CompileResult<T> = std::result::Result<T, CompileError>;
