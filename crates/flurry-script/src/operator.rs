//! Built-in operators: units that take arguments

use crate::compiler::Compiler;
use crate::error::{CompileError, CompileResult};
use crate::unit::{self, ChoiceMode, Unit};
use flurry_core::behavior::{Behavior, Emit, Loop, Modify, Parallel, Repeat, Rotate, Sequential, Switch, Translate};
use flurry_core::{BehaviorGen, Gen, ModifyOp, Property};
use flurry_syntax::Term;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
    /// `speed 2`, `hue+ 30`, `opacity* 0.5`
    Modify {
        name: &'static str,
        property: Property,
        op: ModifyOp,
    },
    Model,
    Close,
    Translate,
    Rotate,
    Loop,
    Repeat,
    Emit,
    Block,
    Choice(ChoiceMode),
    Range(ChoiceMode),
}

impl Operator {
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Modify { name, .. } => *name,
            Operator::Model => "model",
            Operator::Close => "close",
            Operator::Translate => "translate",
            Operator::Rotate => "rotate",
            Operator::Loop => "loop",
            Operator::Repeat => "repeat",
            Operator::Emit => "emit",
            Operator::Block => flurry_syntax::ast::BLOCK,
            Operator::Choice(ChoiceMode::Each) => flurry_syntax::ast::EACH_CHOICE,
            Operator::Choice(ChoiceMode::Random) => flurry_syntax::ast::RANDOM_CHOICE,
            Operator::Range(ChoiceMode::Each) => flurry_syntax::ast::EACH_RANGE,
            Operator::Range(ChoiceMode::Random) => flurry_syntax::ast::RANDOM_RANGE,
        }
    }

    fn exactly(&self, args: &[Term], count: usize) -> CompileResult<()> {
        if args.len() == count {
            Ok(())
        } else {
            Err(self.arity(count.to_string(), args))
        }
    }

    fn at_least(&self, args: &[Term], count: usize) -> CompileResult<()> {
        if args.len() >= count {
            Ok(())
        } else {
            Err(self.arity(format!("at least {}", count), args))
        }
    }

    fn arity(&self, expected: String, args: &[Term]) -> CompileError {
        CompileError::Arity {
            operator: self.name().to_string(),
            expected,
            got: args.len(),
        }
    }

    /// Build the unit this operator denotes for the given arguments
    pub fn apply(&self, compiler: &Compiler, args: &[Term]) -> CompileResult<Unit> {
        let gen: BehaviorGen = match *self {
            Operator::Modify { property, op, .. } => {
                self.exactly(args, 1)?;
                let operand = compiler.number(&args[0])?;
                Gen::new(move |sibling, rng| {
                    let operand = operand.generate(sibling, rng);
                    Box::new(Modify::new(property, op, operand)) as Box<dyn Behavior>
                })
            }
            Operator::Model => {
                self.exactly(args, 1)?;
                let model = compiler.resolve(&args[0])?.as_model(compiler)?;
                model.map(|model| Box::new(Switch::model(model)) as Box<dyn Behavior>)
            }
            Operator::Close => {
                self.exactly(args, 0)?;
                Gen::new(|_, _| Box::new(Switch::close()) as Box<dyn Behavior>)
            }
            Operator::Translate | Operator::Rotate => {
                self.exactly(args, 3)?;
                let x = compiler.number(&args[0])?;
                let y = compiler.number(&args[1])?;
                let z = compiler.number(&args[2])?;
                let translate = *self == Operator::Translate;
                Gen::new(move |sibling, rng| {
                    let x = x.generate(sibling, rng);
                    let y = y.generate(sibling, rng);
                    let z = z.generate(sibling, rng);
                    if translate {
                        Box::new(Translate::new(x, y, z)) as Box<dyn Behavior>
                    } else {
                        Box::new(Rotate::new(x, y, z)) as Box<dyn Behavior>
                    }
                })
            }
            Operator::Loop => {
                self.at_least(args, 1)?;
                let body = compiler.rest(args)?;
                Gen::new(move |sibling, _| Box::new(Loop::new(body.clone(), sibling)) as Box<dyn Behavior>)
            }
            Operator::Repeat => {
                self.at_least(args, 2)?;
                let limit = compiler.number(&args[0])?;
                let body = compiler.rest(&args[1..])?;
                Gen::new(move |sibling, rng| {
                    let limit = count(limit.generate(sibling, rng));
                    Box::new(Repeat::new(body.clone(), sibling, limit)) as Box<dyn Behavior>
                })
            }
            Operator::Emit => {
                self.at_least(args, 4)?;
                let per_slot = compiler.number(&args[0])?;
                let times = compiler.number(&args[1])?;
                let parallel = compiler.number(&args[2])?;
                let body = compiler.rest(&args[3..])?;
                Gen::new(move |sibling, rng| {
                    let per_slot = count(per_slot.generate(sibling, rng));
                    let times = count(times.generate(sibling, rng));
                    let parallel = count(parallel.generate(sibling, rng));
                    Box::new(Emit::new(per_slot, times, parallel, body.clone())) as Box<dyn Behavior>
                })
            }
            Operator::Block => {
                self.at_least(args, 1)?;
                let tracks = args
                    .iter()
                    .map(|program| match program.as_list() {
                        Some(statements) => statements
                            .iter()
                            .map(|statement| compiler.behavior(statement))
                            .collect::<CompileResult<Vec<_>>>(),
                        None => Err(CompileError::MalformedBlock(program.to_string())),
                    })
                    .collect::<CompileResult<Vec<_>>>()?;
                Gen::new(move |sibling, rng| {
                    let branches = tracks
                        .iter()
                        .map(|track| {
                            let steps = track.iter().map(|gen| gen.generate(sibling, rng)).collect();
                            Box::new(Sequential::new(steps)) as Box<dyn Behavior>
                        })
                        .collect();
                    Box::new(Parallel::new(branches)) as Box<dyn Behavior>
                })
            }
            Operator::Choice(mode) => {
                self.at_least(args, 1)?;
                let alternatives = args
                    .iter()
                    .map(|arg| compiler.resolve(arg))
                    .collect::<CompileResult<Vec<_>>>()?;
                return Ok(Unit::Choice { mode, alternatives });
            }
            Operator::Range(mode) => {
                self.exactly(args, 2)?;
                let from = compiler.number(&args[0])?;
                let to = compiler.number(&args[1])?;
                return Ok(Unit::Number(unit::range(mode, from, to)));
            }
        };
        Ok(Unit::Behavior(gen))
    }
}

/// Round a generated count to a non-negative integer
fn count(value: f64) -> usize {
    if value.is_finite() && value > 0.0 {
        value.round() as usize
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_rounds_and_clamps() {
        assert_eq!(count(3.0), 3);
        assert_eq!(count(2.6), 3);
        assert_eq!(count(-4.0), 0);
        assert_eq!(count(f64::NAN), 0);
    }

    #[test]
    fn test_arity_errors_name_the_operator() {
        let compiler = Compiler::new();
        let err = Operator::Translate
            .apply(&compiler, &[Term::number(1.0)])
            .unwrap_err();
        assert_eq!(
            err,
            CompileError::Arity {
                operator: "translate".to_string(),
                expected: "3".to_string(),
                got: 1,
            }
        );

        let err = Operator::Emit.apply(&compiler, &[]).unwrap_err();
        assert_eq!(err.to_string(), "`emit` takes at least 4 argument(s), got 0");
    }
}
