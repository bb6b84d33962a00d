//! Render terms back to source text
//!
//! Output always parses back to the term it was printed from, in every
//! combination of [`PrintOptions`].

use crate::ast::{
    Program, Term, BLOCK, EACH_ANGLE, EACH_CHOICE, EACH_RANGE, RANDOM_ANGLE, RANDOM_CHOICE,
    RANDOM_RANGE,
};
use serde::{Deserialize, Serialize};

/// Printer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintOptions {
    /// One statement per line, blocks spread over several lines
    pub indent: bool,
    /// Use `[...]`, `<...>` and `{...}` instead of explicit lists
    pub sugar: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            indent: true,
            sugar: true,
        }
    }
}

const INDENT: &str = "  ";

/// Print a whole program
pub fn print(program: &Program, options: PrintOptions) -> String {
    let printer = Printer { options };
    let mut out = String::new();
    printer.statements(&mut out, program.statements(), 0);
    out
}

/// Print a single term
pub fn print_term(term: &Term, options: PrintOptions) -> String {
    let printer = Printer { options };
    let mut out = String::new();
    printer.term(&mut out, term, 0);
    out
}

struct Printer {
    options: PrintOptions,
}

impl Printer {
    fn term(&self, out: &mut String, term: &Term, depth: usize) {
        match term {
            Term::Number(n) => out.push_str(&n.to_string()),
            Term::Symbol(name) => {
                if self.options.sugar && name == EACH_ANGLE {
                    out.push_str("[]");
                } else if self.options.sugar && name == RANDOM_ANGLE {
                    out.push_str("<>");
                } else {
                    out.push_str(name);
                }
            }
            Term::List(elements) => {
                if !(self.options.sugar && self.sugared(out, elements, depth)) {
                    self.wrapped(out, "(", elements, ")", depth);
                }
            }
        }
    }

    /// Print the sugar form of a list if it has one
    fn sugared(&self, out: &mut String, elements: &[Term], depth: usize) -> bool {
        let Some((head, args)) = elements.split_first() else {
            return false;
        };
        let Some(head) = head.as_symbol() else {
            return false;
        };
        match head {
            EACH_CHOICE if !args.is_empty() => self.wrapped(out, "[", args, "]", depth),
            RANDOM_CHOICE if !args.is_empty() => self.wrapped(out, "<", args, ">", depth),
            EACH_RANGE if args.len() == 2 => self.range(out, "[", args, "]", depth),
            RANDOM_RANGE if args.len() == 2 => self.range(out, "<", args, ">", depth),
            BLOCK if !args.is_empty() && args.iter().all(|a| a.as_list().is_some()) => {
                self.block(out, args, depth)
            }
            _ => return false,
        }
        true
    }

    fn wrapped(&self, out: &mut String, open: &str, elements: &[Term], close: &str, depth: usize) {
        out.push_str(open);
        self.inline(out, elements, depth);
        out.push_str(close);
    }

    fn range(&self, out: &mut String, open: &str, bounds: &[Term], close: &str, depth: usize) {
        out.push_str(open);
        self.term(out, &bounds[0], depth);
        out.push_str("..");
        self.term(out, &bounds[1], depth);
        out.push_str(close);
    }

    fn inline(&self, out: &mut String, elements: &[Term], depth: usize) {
        for (i, element) in elements.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            self.term(out, element, depth);
        }
    }

    fn block(&self, out: &mut String, tracks: &[Term], depth: usize) {
        out.push('{');
        for (i, track) in tracks.iter().enumerate() {
            let statements = track.as_list().unwrap_or_default();
            if self.options.indent {
                if i > 0 {
                    newline(out, depth);
                    out.push('|');
                }
                for statement in statements {
                    newline(out, depth + 1);
                    self.statement(out, statement, depth + 1);
                }
            } else {
                if i > 0 {
                    out.push_str(" |");
                }
                if !statements.is_empty() {
                    out.push(' ');
                    self.statements(out, statements, depth + 1);
                }
            }
        }
        if self.options.indent {
            newline(out, depth);
        } else {
            out.push(' ');
        }
        out.push('}');
    }

    /// Print statements separated by newlines or `; `
    fn statements(&self, out: &mut String, statements: &[Term], depth: usize) {
        for (i, statement) in statements.iter().enumerate() {
            if i > 0 {
                if self.options.indent {
                    newline(out, depth);
                } else {
                    out.push_str("; ");
                }
            }
            self.statement(out, statement, depth);
        }
    }

    /// Multi-term statements print without their parentheses in sugar mode
    fn statement(&self, out: &mut String, statement: &Term, depth: usize) {
        match statement {
            Term::List(elements) if self.options.sugar && elements.len() > 1 => {
                if !self.sugared(out, elements, depth) {
                    self.inline(out, elements, depth);
                }
            }
            _ => self.term(out, statement, depth),
        }
    }
}

fn newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{parse_program, parse_term};

    const ALL_MODES: [PrintOptions; 4] = [
        PrintOptions { indent: true, sugar: true },
        PrintOptions { indent: true, sugar: false },
        PrintOptions { indent: false, sugar: true },
        PrintOptions { indent: false, sugar: false },
    ];

    const COMPACT: PrintOptions = PrintOptions { indent: false, sugar: true };

    fn sample_terms() -> Vec<Term> {
        [
            "42",
            "-0.125",
            "1e-7",
            "nop",
            "()",
            "(nop)",
            "[]",
            "<>",
            "[arrow]",
            "[arrow claw orb]",
            "<1..10>",
            "[(speed 1)..[2 3]]",
            "(each-range 1)",
            "(each-choice)",
            "(block)",
            "(block 1 2)",
            "{}",
            "{ | }",
            "{ speed 1\n nop | { hue 2 | 60 nop } }",
            "(loop { repeat 3 (emit 5 1 1 { [] rotate 0 [0..90] 0 }) })",
            "(60 (ease-in speed* 2) [arrow claw] <> <a b>)",
        ]
        .iter()
        .map(|src| parse_term(src).unwrap())
        .collect()
    }

    #[test]
    fn test_term_round_trip_all_modes() {
        for term in sample_terms() {
            for options in ALL_MODES {
                let text = print_term(&term, options);
                let reparsed = parse_term(&text)
                    .unwrap_or_else(|e| panic!("{:?} failed to reparse {:?}: {}", options, text, e));
                assert_eq!(reparsed, term, "{:?} printed {:?}", options, text);
            }
        }
    }

    #[test]
    fn test_program_round_trip_all_modes() {
        let source = "60 nop\nspeed 1; (hue 2)\n{ a b\n c | d }\n[x y] 5 nop\n(single)";
        let program = parse_program(source).unwrap();
        for options in ALL_MODES {
            let text = print(&program, options);
            assert_eq!(parse_program(&text).unwrap(), program, "printed {:?}", text);
        }
    }

    #[test]
    fn test_sugar_output() {
        let term = parse_term("(each-choice a (random-range 0 1) random-angle)").unwrap();
        assert_eq!(print_term(&term, COMPACT), "[a <0..1> <>]");

        let block = parse_term("{ speed 1\n nop | hue 3 }").unwrap();
        assert_eq!(print_term(&block, COMPACT), "{ speed 1; nop | hue 3 }");
        assert_eq!(
            print_term(&block, PrintOptions::default()),
            "{\n  speed 1\n  nop\n|\n  hue 3\n}"
        );
    }

    #[test]
    fn test_explicit_output() {
        let options = PrintOptions { indent: false, sugar: false };
        let term = parse_term("{ [a b] | <> }").unwrap();
        assert_eq!(
            print_term(&term, options),
            "(block ((each-choice a b)) (random-angle))"
        );
    }
}
