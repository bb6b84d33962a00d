//! Concrete grammar of the pattern language
//!
//! ```text
//! amb       = (space | tab | newline | /* ... */ | // ...)*
//! amb1      = amb without newlines
//! number    = [+-]? digits ('.' digits)? ([eE] [+-]? digits)?
//! symbol    = [!?$@a-zA-Z_] [!?$@a-zA-Z_\-+*/%^0-9]*
//! list      = '(' amb (term amb)* ')'
//! each      = '[' amb ( ']' | term amb ( '..' amb term amb ']' | (term amb)* ']' ) )
//! random    = same as each with '<' and '>'
//! block     = '{' program ('|' program)* '}'
//! term      = number | symbol | list | each | random | block
//! statement = (term amb1)+ (';' amb1)*
//! program   = amb (statement amb)*
//! ```

use crate::ast::{
    Program, Term, BLOCK, EACH_ANGLE, EACH_CHOICE, EACH_RANGE, RANDOM_ANGLE, RANDOM_CHOICE,
    RANDOM_RANGE,
};
use crate::combinator::{choice, eof, lazy, many, pattern, some, string, Cursor, Parser};
use crate::error::ParseError;
use regex::Regex;
use std::sync::OnceLock;

const AMB: &str = r"(?:[ \t\r\n]+|/\*[\s\S]*?\*/|//[^\n]*)*";
const AMB1: &str = r"(?:[ \t]+|/\*[^\n]*?\*/|//[^\n]*)*";
const NUMBER: &str = r"[+-]?[0-9]+(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?";
const SYMBOL: &str = r"[!?$@a-zA-Z_][!?$@a-zA-Z_\-+*/%^0-9]*";

/// The sugar shapes sharing the bracket grammar
struct Bracket {
    open: &'static str,
    close: &'static str,
    choice: &'static str,
    range: &'static str,
    angle: &'static str,
}

const EACH: Bracket = Bracket {
    open: "[",
    close: "]",
    choice: EACH_CHOICE,
    range: EACH_RANGE,
    angle: EACH_ANGLE,
};

const RANDOM: Bracket = Bracket {
    open: "<",
    close: ">",
    choice: RANDOM_CHOICE,
    range: RANDOM_RANGE,
    angle: RANDOM_ANGLE,
};

fn token(regex: &str, expected: &str) -> Parser<String> {
    pattern(regex, expected).expect("grammar patterns are valid regular expressions")
}

/// Ambient filler, newlines included
pub fn amb() -> Parser<String> {
    token(AMB, "whitespace")
}

/// Ambient filler on a single line
pub fn amb1() -> Parser<String> {
    token(AMB1, "whitespace")
}

/// Numeric literal
///
/// Literals that overflow to infinity are rejected, so every parsed number
/// prints back as a literal.
pub fn number() -> Parser<Term> {
    let literal = token(NUMBER, "number");
    Parser::new(move |cursor: &mut Cursor<'_>| {
        let at = *cursor;
        let text = literal.parse(cursor)?;
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Term::Number(value)),
            _ => Err(at.expected("finite number")),
        }
    })
}

/// Identifier
pub fn symbol() -> Parser<Term> {
    token(SYMBOL, "symbol").map(Term::Symbol)
}

/// Parenthesized list
pub fn list() -> Parser<Term> {
    string("(")
        .then(amb())
        .then(many(lazy(term).skip(amb())))
        .skip(string(")"))
        .map(Term::List)
}

fn bracket(shape: &'static Bracket) -> Parser<Term> {
    let empty = string(shape.close).map(|_| Term::symbol(shape.angle));
    let filled = lazy(term).skip(amb()).bind(move |first| {
        let range_first = first.clone();
        let range = string("..")
            .then(amb())
            .then(lazy(term))
            .skip(amb())
            .skip(string(shape.close))
            .map(move |last| {
                Term::List(vec![
                    Term::symbol(shape.range),
                    range_first.clone(),
                    last,
                ])
            });
        let choice_first = first.clone();
        let alternatives = many(lazy(term).skip(amb()))
            .skip(string(shape.close))
            .map(move |rest| {
                let mut elements = Vec::with_capacity(rest.len() + 2);
                elements.push(Term::symbol(shape.choice));
                elements.push(choice_first.clone());
                elements.extend(rest);
                Term::List(elements)
            });
        choice(vec![range, alternatives])
    });
    string(shape.open).then(amb()).then(choice(vec![empty, filled]))
}

/// `[ ... ]` variation sugar
pub fn each() -> Parser<Term> {
    bracket(&EACH)
}

/// `< ... >` variation sugar
pub fn random() -> Parser<Term> {
    bracket(&RANDOM)
}

/// `{ program | program ... }` parallel tracks
pub fn block() -> Parser<Term> {
    let track = || lazy(program).map(Term::List);
    string("{")
        .then(track())
        .bind(move |first| {
            many(string("|").then(track())).map(move |rest| {
                let mut elements = Vec::with_capacity(rest.len() + 2);
                elements.push(Term::symbol(BLOCK));
                elements.push(first.clone());
                elements.extend(rest);
                Term::List(elements)
            })
        })
        .skip(string("}"))
}

/// Any single term
pub fn term() -> Parser<Term> {
    choice(vec![number(), symbol(), list(), each(), random(), block()]).label("term")
}

/// Terms on one line, optionally closed by `;`
pub fn statement() -> Parser<Term> {
    some(term().skip(amb1()))
        .skip(many(string(";").skip(amb1())))
        .map(|mut terms| {
            if terms.len() == 1 {
                terms.remove(0)
            } else {
                Term::List(terms)
            }
        })
}

/// Statements separated by ambient filler
pub fn program() -> Parser<Vec<Term>> {
    amb().then(many(statement().skip(amb())))
}

/// Check whether `name` is a valid identifier on its own
pub fn is_symbol(name: &str) -> bool {
    static WHOLE: OnceLock<Regex> = OnceLock::new();
    WHOLE
        .get_or_init(|| {
            Regex::new(&format!("^(?:{})$", SYMBOL))
                .expect("grammar patterns are valid regular expressions")
        })
        .is_match(name)
}

thread_local! {
    static PROGRAM: Parser<Vec<Term>> = program().skip(eof());
    static SINGLE_TERM: Parser<Term> = amb().then(term()).skip(amb()).skip(eof());
}

/// Parse a whole program
pub fn parse_program(source: &str) -> Result<Program, ParseError> {
    let result = PROGRAM.with(|parser| parser.parse_str(source));
    match result {
        Ok(statements) => Ok(Program::new(statements)),
        Err(err) => {
            tracing::debug!(line = err.line, col = err.col, expected = %err.expected, "parse failed");
            Err(err)
        }
    }
}

/// Parse exactly one term, surrounded by optional filler
pub fn parse_term(source: &str) -> Result<Term, ParseError> {
    SINGLE_TERM.with(|parser| parser.parse_str(source))
}
