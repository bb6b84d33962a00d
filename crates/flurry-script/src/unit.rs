//! Compile-time values
//!
//! Every term resolves to a [`Unit`]. A unit is not yet a model, number,
//! easing or behavior: it is asked for one of those kinds by whoever uses it,
//! and either produces a generator of that kind or reports a kind error.

use crate::compiler::Compiler;
use crate::error::{CompileError, CompileResult};
use crate::operator::Operator;
use flurry_core::behavior::{Behavior, Sequential, Switch};
use flurry_core::{BehaviorGen, Easing, Gen, Model};
use flurry_syntax::Term;

/// How a choice picks one of its alternatives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChoiceMode {
    /// Spread across siblings by index
    Each,
    /// Drawn from the field RNG on every instantiation
    Random,
}

#[derive(Debug, Clone)]
pub(crate) enum Unit {
    Number(Gen<f64>),
    Easing(Easing),
    Model(Model),
    Behavior(BehaviorGen),
    /// Needs arguments before it means anything
    Operator(Operator),
    Choice {
        mode: ChoiceMode,
        alternatives: Vec<Unit>,
    },
}

impl Unit {
    /// A short description used in kind errors
    pub fn describe(&self) -> String {
        match self {
            Unit::Number(_) => "a number".to_string(),
            Unit::Easing(easing) => format!("easing `{}`", easing),
            Unit::Model(model) => format!("model `{}`", model),
            Unit::Behavior(_) => "a behavior".to_string(),
            Unit::Operator(op) => format!("operator `{}`", op.name()),
            Unit::Choice { .. } => "a choice".to_string(),
        }
    }

    pub fn as_number(&self, compiler: &Compiler) -> CompileResult<Gen<f64>> {
        self.query(compiler, "a number", &|unit| match unit {
            Unit::Number(gen) => Some(gen.clone()),
            _ => None,
        })
    }

    pub fn as_easing(&self, compiler: &Compiler) -> CompileResult<Gen<Easing>> {
        self.query(compiler, "an easing", &|unit| match unit {
            Unit::Easing(easing) => Some(Gen::constant(*easing)),
            _ => None,
        })
    }

    pub fn as_model(&self, compiler: &Compiler) -> CompileResult<Gen<Model>> {
        self.query(compiler, "a model", &|unit| match unit {
            Unit::Model(model) => Some(Gen::constant(*model)),
            _ => None,
        })
    }

    pub fn as_behavior(&self, compiler: &Compiler) -> CompileResult<BehaviorGen> {
        self.query(compiler, "a behavior", &|unit| match unit {
            Unit::Behavior(gen) => Some(gen.clone()),
            _ => None,
        })
    }

    fn query<T: 'static>(
        &self,
        compiler: &Compiler,
        expected: &'static str,
        extract: &dyn Fn(&Unit) -> Option<Gen<T>>,
    ) -> CompileResult<Gen<T>> {
        match self {
            // a bare operator is applied to no arguments
            Unit::Operator(op) => op.apply(compiler, &[])?.query(compiler, expected, extract),
            Unit::Choice { mode, alternatives } => {
                let gens = alternatives
                    .iter()
                    .map(|alternative| alternative.query(compiler, expected, extract))
                    .collect::<CompileResult<Vec<_>>>()?;
                Ok(select(*mode, gens))
            }
            unit => extract(unit).ok_or_else(|| CompileError::Kind {
                expected,
                got: unit.describe(),
            }),
        }
    }

    /// Specialize this unit with the argument terms that followed it
    pub fn with_arguments(&self, compiler: &Compiler, args: &[Term]) -> CompileResult<Unit> {
        if let Unit::Operator(op) = self {
            return op.apply(compiler, args);
        }
        if args.is_empty() {
            return Ok(self.clone());
        }

        match self {
            Unit::Number(lifespan) => {
                let lifespan = lifespan.clone();
                let body = compiler.rest(args)?;
                Ok(Unit::Behavior(Gen::new(move |sibling, rng| {
                    let lifespan = lifespan.generate(sibling, rng).max(0.0);
                    let mut behavior = body.generate(sibling, rng);
                    behavior.set_lifespan(lifespan);
                    behavior
                })))
            }
            Unit::Easing(easing) => {
                let easing = *easing;
                let body = compiler.rest(args)?;
                Ok(Unit::Behavior(body.map(move |mut behavior| {
                    behavior.set_easing(easing);
                    behavior
                })))
            }
            Unit::Model(model) => {
                let model = *model;
                let body = compiler.rest(args)?;
                Ok(Unit::Behavior(Gen::new(move |sibling, rng| {
                    Box::new(Sequential::new(vec![
                        Box::new(Switch::model(model)) as Box<dyn Behavior>,
                        body.generate(sibling, rng),
                    ])) as Box<dyn Behavior>
                })))
            }
            Unit::Choice { mode, alternatives } => Ok(Unit::Choice {
                mode: *mode,
                alternatives: alternatives
                    .iter()
                    .map(|alternative| alternative.with_arguments(compiler, args))
                    .collect::<CompileResult<_>>()?,
            }),
            unit => Err(CompileError::Arity {
                operator: unit.describe(),
                expected: "no".to_string(),
                got: args.len(),
            }),
        }
    }
}

/// Combine per-alternative generators into one that picks per sibling
fn select<T: 'static>(mode: ChoiceMode, gens: Vec<Gen<T>>) -> Gen<T> {
    match mode {
        ChoiceMode::Each => Gen::new(move |sibling, rng| {
            let gen = &gens[sibling.index % gens.len()];
            gen.generate(sibling, rng)
        }),
        ChoiceMode::Random => Gen::new(move |sibling, rng| {
            let index = rng.index(gens.len()).unwrap_or(0);
            gens[index].generate(sibling, rng)
        }),
    }
}

/// Interpolate between two generated numbers
pub(crate) fn range(mode: ChoiceMode, from: Gen<f64>, to: Gen<f64>) -> Gen<f64> {
    Gen::new(move |sibling, rng| {
        let a = from.generate(sibling, rng);
        let b = to.generate(sibling, rng);
        let r = match mode {
            ChoiceMode::Each if sibling.total <= 1 => 0.5,
            ChoiceMode::Each => sibling.index as f64 / (sibling.total - 1) as f64,
            ChoiceMode::Random => rng.next_f64(),
        };
        a * (1.0 - r) + b * r
    })
}

/// Degrees spread around the circle, or drawn at random
pub(crate) fn angle(mode: ChoiceMode) -> Gen<f64> {
    Gen::new(move |sibling, rng| match mode {
        ChoiceMode::Each if sibling.total == 0 => 0.0,
        ChoiceMode::Each => {
            let turn = 360.0 * sibling.index as f64 / sibling.total as f64;
            // a pair straddles the forward axis instead of pointing along it
            if sibling.total == 2 {
                turn + 90.0
            } else {
                turn
            }
        }
        ChoiceMode::Random => rng.range_f64(0.0, 360.0),
    })
}
