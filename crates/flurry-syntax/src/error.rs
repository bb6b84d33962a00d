//! Error types for flurry-syntax

use thiserror::Error;

/// A parse failure with the location it was detected at
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}, column {col}: expected {expected}")]
pub struct ParseError {
    /// 1-based line of the failure
    pub line: usize,
    /// 1-based column of the failure
    pub col: usize,
    /// Byte offset into the source
    pub offset: usize,
    /// What the parser was looking for
    pub expected: String,
}

impl ParseError {
    /// Combine two failures reported at the same position
    pub fn merge(self, other: ParseError) -> Self {
        if self.offset != other.offset || self.expected == other.expected {
            return self;
        }
        Self {
            expected: format!("{} or {}", self.expected, other.expected),
            ..self
        }
    }
}

/// Syntax layer error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Malformed term data: {0}")]
    Load(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
