//! Backtracking parser combinators
//!
//! A [`Parser`] is a shared function from a [`Cursor`] to a value. On success
//! the cursor is left after the consumed input; on failure a [`ParseError`]
//! describes what was expected where.
//!
//! Alternation and repetition only backtrack over failures that did not
//! consume input. A failure after consuming input is committed and propagates
//! unchanged, which keeps error locations precise and rules out exponential
//! backtracking.

use crate::error::ParseError;
use regex::Regex;
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

/// Position in a source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    source: &'a str,
    offset: usize,
    line: usize,
    col: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `source`
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            col: 1,
        }
    }

    /// Unconsumed text
    pub fn rest(&self) -> &'a str {
        &self.source[self.offset..]
    }

    /// Byte offset from the start of the source
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 1-based line number
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column number (in characters)
    pub fn col(&self) -> usize {
        self.col
    }

    /// Check if all input has been consumed
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.source.len()
    }

    /// Consume `len` bytes, keeping line and column in step
    ///
    /// `len` must fall on a character boundary.
    pub fn advance(&mut self, len: usize) {
        let consumed = &self.rest()[..len];
        for ch in consumed.chars() {
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        self.offset += len;
    }

    /// Build a failure located at this cursor
    pub fn expected(&self, what: impl Into<String>) -> ParseError {
        ParseError {
            line: self.line,
            col: self.col,
            offset: self.offset,
            expected: what.into(),
        }
    }
}

/// Result of running a parser
pub type ParseResult<T> = Result<T, ParseError>;

/// A reusable, cheaply clonable parser producing `T`
pub struct Parser<T> {
    run: Rc<dyn for<'a> Fn(&mut Cursor<'a>) -> ParseResult<T>>,
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Self {
            run: Rc::clone(&self.run),
        }
    }
}

impl<T> fmt::Debug for Parser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Parser")
    }
}

impl<T: 'static> Parser<T> {
    /// Wrap a parsing function
    pub fn new<F>(run: F) -> Self
    where
        F: for<'a> Fn(&mut Cursor<'a>) -> ParseResult<T> + 'static,
    {
        Self { run: Rc::new(run) }
    }

    /// Run the parser at the cursor
    pub fn parse(&self, cursor: &mut Cursor<'_>) -> ParseResult<T> {
        (self.run)(cursor)
    }

    /// Run the parser over a whole string, without requiring end of input
    pub fn parse_str(&self, source: &str) -> ParseResult<T> {
        let mut cursor = Cursor::new(source);
        self.parse(&mut cursor)
    }

    /// Transform the parsed value
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Parser<U> {
        Parser::new(move |cursor: &mut Cursor<'_>| self.parse(cursor).map(&f))
    }

    /// Choose the next parser based on the parsed value
    pub fn bind<U: 'static>(self, f: impl Fn(T) -> Parser<U> + 'static) -> Parser<U> {
        Parser::new(move |cursor: &mut Cursor<'_>| {
            let value = self.parse(cursor)?;
            f(value).parse(cursor)
        })
    }

    /// Run `next` after this parser and keep this parser's value
    pub fn skip<U: 'static>(self, next: Parser<U>) -> Parser<T> {
        Parser::new(move |cursor: &mut Cursor<'_>| {
            let value = self.parse(cursor)?;
            next.parse(cursor)?;
            Ok(value)
        })
    }

    /// Run `next` after this parser and keep `next`'s value
    pub fn then<U: 'static>(self, next: Parser<U>) -> Parser<U> {
        Parser::new(move |cursor: &mut Cursor<'_>| {
            self.parse(cursor)?;
            next.parse(cursor)
        })
    }

    /// Replace the expectation of a failure that consumed nothing
    pub fn label(self, expected: &str) -> Parser<T> {
        let expected = expected.to_string();
        Parser::new(move |cursor: &mut Cursor<'_>| {
            let start = cursor.offset();
            match self.parse(cursor) {
                Err(err) if cursor.offset() == start => Err(ParseError {
                    expected: expected.clone(),
                    ..err
                }),
                result => result,
            }
        })
    }
}

/// Succeed with `value` without consuming input
pub fn pure<T: Clone + 'static>(value: T) -> Parser<T> {
    Parser::new(move |_: &mut Cursor<'_>| Ok(value.clone()))
}

/// Fail with the given expectation without consuming input
pub fn fail<T: 'static>(expected: &str) -> Parser<T> {
    let expected = expected.to_string();
    Parser::new(move |cursor: &mut Cursor<'_>| Err(cursor.expected(expected.clone())))
}

/// Defer building a parser until it is first run
///
/// Needed for recursive grammars. The built parser is cached.
pub fn lazy<T: 'static>(build: impl Fn() -> Parser<T> + 'static) -> Parser<T> {
    let cell: OnceCell<Parser<T>> = OnceCell::new();
    Parser::new(move |cursor: &mut Cursor<'_>| cell.get_or_init(&build).parse(cursor))
}

/// Match a literal string
pub fn string(literal: &str) -> Parser<String> {
    let literal = literal.to_string();
    Parser::new(move |cursor: &mut Cursor<'_>| {
        if cursor.rest().starts_with(literal.as_str()) {
            cursor.advance(literal.len());
            Ok(literal.clone())
        } else {
            Err(cursor.expected(format!("\"{}\"", literal)))
        }
    })
}

/// Match a regular expression anchored at the cursor
///
/// The pattern is wrapped as `^(?:...)`. `expected` names the token in error
/// messages.
pub fn pattern(regex: &str, expected: &str) -> Result<Parser<String>, regex::Error> {
    let regex = Regex::new(&format!("^(?:{})", regex))?;
    let expected = expected.to_string();
    Ok(Parser::new(move |cursor: &mut Cursor<'_>| {
        match regex.find(cursor.rest()) {
            Some(found) => {
                let text = found.as_str().to_string();
                cursor.advance(found.end());
                Ok(text)
            }
            None => Err(cursor.expected(expected.clone())),
        }
    }))
}

/// Run parsers in order, collecting every value
pub fn sequence<T: 'static>(parsers: Vec<Parser<T>>) -> Parser<Vec<T>> {
    Parser::new(move |cursor: &mut Cursor<'_>| {
        let mut values = Vec::with_capacity(parsers.len());
        for parser in &parsers {
            values.push(parser.parse(cursor)?);
        }
        Ok(values)
    })
}

/// Ordered alternation
///
/// An alternative that fails after consuming input commits the whole choice
/// to its failure.
pub fn choice<T: 'static>(parsers: Vec<Parser<T>>) -> Parser<T> {
    Parser::new(move |cursor: &mut Cursor<'_>| {
        let start = *cursor;
        let mut failure: Option<ParseError> = None;
        for parser in &parsers {
            match parser.parse(cursor) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if cursor.offset() != start.offset() {
                        return Err(err);
                    }
                    *cursor = start;
                    failure = Some(match failure {
                        Some(previous) => previous.merge(err),
                        None => err,
                    });
                }
            }
        }
        Err(failure.unwrap_or_else(|| start.expected("an alternative")))
    })
}

/// Zero or more repetitions
///
/// Stops at the first failure that consumed nothing. An item that succeeds
/// without consuming input is kept and ends the repetition, since repeating
/// it could never make progress.
pub fn many<T: 'static>(parser: Parser<T>) -> Parser<Vec<T>> {
    Parser::new(move |cursor: &mut Cursor<'_>| repeat(&parser, cursor, Vec::new()))
}

/// One or more repetitions
pub fn some<T: 'static>(parser: Parser<T>) -> Parser<Vec<T>> {
    Parser::new(move |cursor: &mut Cursor<'_>| {
        let first = parser.parse(cursor)?;
        repeat(&parser, cursor, vec![first])
    })
}

fn repeat<T: 'static>(
    parser: &Parser<T>,
    cursor: &mut Cursor<'_>,
    mut values: Vec<T>,
) -> ParseResult<Vec<T>> {
    loop {
        let before = *cursor;
        match parser.parse(cursor) {
            Ok(value) => {
                values.push(value);
                if cursor.offset() == before.offset() {
                    return Ok(values);
                }
            }
            Err(err) => {
                if cursor.offset() != before.offset() {
                    return Err(err);
                }
                *cursor = before;
                return Ok(values);
            }
        }
    }
}

/// Zero or one occurrence
pub fn optional<T: 'static>(parser: Parser<T>) -> Parser<Option<T>> {
    Parser::new(move |cursor: &mut Cursor<'_>| {
        let before = *cursor;
        match parser.parse(cursor) {
            Ok(value) => Ok(Some(value)),
            Err(err) if cursor.offset() != before.offset() => Err(err),
            Err(_) => {
                *cursor = before;
                Ok(None)
            }
        }
    })
}

/// Succeed only at the end of input
pub fn eof() -> Parser<()> {
    Parser::new(|cursor: &mut Cursor<'_>| {
        if cursor.is_at_end() {
            Ok(())
        } else {
            Err(cursor.expected("end of input"))
        }
    })
}
