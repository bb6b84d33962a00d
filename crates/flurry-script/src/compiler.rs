//! Program → behavior generator

use crate::error::{CompileError, CompileResult};
use crate::names;
use crate::unit::Unit;
use flurry_core::behavior::{Behavior, Sequential};
use flurry_core::{BehaviorGen, Gen};
use flurry_syntax::{Program, Term};
use std::collections::HashMap;

/// Compiles programs against the built-in name table
///
/// The table is built once; a compiler can be reused for any number of
/// programs.
///
/// ```
/// use flurry_core::Field;
/// use flurry_script::Compiler;
/// use flurry_syntax::parse_program;
///
/// let program = parse_program("speed 1\n10 translate 0 5 0").unwrap();
/// let gen = Compiler::new().compile(&program).unwrap();
///
/// let mut field = Field::default();
/// field.spawn(&gen);
/// field.update(1.0);
/// assert_eq!(field.len(), 1);
/// ```
pub struct Compiler {
    names: HashMap<&'static str, Unit>,
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            names: names::builtins(),
        }
    }

    /// Every name the compiler knows, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.names.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Compile a program into a generator of root behaviors
    ///
    /// A single statement compiles to itself; several run one after another.
    pub fn compile(&self, program: &Program) -> CompileResult<BehaviorGen> {
        tracing::debug!(statements = program.len(), "compiling program");
        let result = match program.statements() {
            [statement] => self.behavior(statement),
            statements => self.sequence(statements),
        };
        match &result {
            Ok(_) => tracing::debug!("compiled program"),
            Err(err) => tracing::debug!(%err, "compile failed"),
        }
        result
    }

    fn sequence(&self, statements: &[Term]) -> CompileResult<BehaviorGen> {
        let steps = statements
            .iter()
            .map(|statement| self.behavior(statement))
            .collect::<CompileResult<Vec<_>>>()?;
        Ok(Gen::new(move |sibling, rng| {
            let behaviors = steps.iter().map(|step| step.generate(sibling, rng)).collect();
            Box::new(Sequential::new(behaviors)) as Box<dyn Behavior>
        }))
    }

    pub(crate) fn resolve(&self, term: &Term) -> CompileResult<Unit> {
        match term {
            Term::Number(value) => Ok(Unit::Number(Gen::constant(*value))),
            Term::Symbol(name) => self
                .names
                .get(name.as_str())
                .cloned()
                .ok_or_else(|| CompileError::UnknownIdentifier(name.clone())),
            Term::List(elements) => match elements.split_first() {
                Some((head, args)) => self.resolve(head)?.with_arguments(self, args),
                None => Err(CompileError::EmptyList),
            },
        }
    }

    pub(crate) fn number(&self, term: &Term) -> CompileResult<Gen<f64>> {
        self.resolve(term)?.as_number(self)
    }

    pub(crate) fn behavior(&self, term: &Term) -> CompileResult<BehaviorGen> {
        self.resolve(term)?.as_behavior(self)
    }

    /// Compile trailing arguments as one behavior
    ///
    /// A single term stands for itself; several form a list.
    pub(crate) fn rest(&self, args: &[Term]) -> CompileResult<BehaviorGen> {
        match args {
            [term] => self.behavior(term),
            terms => self.behavior(&Term::List(terms.to_vec())),
        }
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flurry_core::{Field, Model, PatternRng, Sibling};
    use flurry_syntax::parse_program;

    fn compile(source: &str) -> CompileResult<BehaviorGen> {
        let program = parse_program(source).unwrap();
        Compiler::new().compile(&program)
    }

    fn lifespan_of(source: &str, sibling: Sibling) -> f64 {
        let gen = compile(source).unwrap();
        gen.generate(sibling, &mut PatternRng::default()).lifespan()
    }

    #[test]
    fn test_number_sets_lifespan() {
        assert_eq!(lifespan_of("60 nop", Sibling::SINGLE), 60.0);
        assert_eq!(lifespan_of("nop", Sibling::SINGLE), 0.0);
        assert_eq!(lifespan_of("[1..3] nop", Sibling::new(2, 3)), 3.0);
        assert_eq!(lifespan_of("-5 nop", Sibling::SINGLE), 0.0);
    }

    #[test]
    fn test_easing_sets_easing() {
        let gen = compile("ease-out 60 speed 0.1").unwrap();
        let behavior = gen.generate(Sibling::SINGLE, &mut PatternRng::default());
        assert_eq!(behavior.easing(), flurry_core::Easing::EaseOut);
        assert_eq!(behavior.lifespan(), 60.0);
    }

    #[test]
    fn test_each_choice_curries_models() {
        let gen = compile("[claw orb] 5 nop").unwrap();
        let mut field = Field::default();
        field.spawn(&gen);
        field.update(1.0);
        assert_eq!(field.iter().next().map(|p| p.model), Some(Model::Claw));
    }

    #[test]
    fn test_unknown_identifier() {
        assert_eq!(
            compile("speed 1\nwobble 3").unwrap_err(),
            CompileError::UnknownIdentifier("wobble".to_string())
        );
    }

    #[test]
    fn test_kind_errors() {
        let err = compile("speed arrow").unwrap_err();
        assert_eq!(
            err,
            CompileError::Kind {
                expected: "a number",
                got: "model `arrow`".to_string(),
            }
        );
        assert!(matches!(compile("model 3"), Err(CompileError::Kind { .. })));
        assert!(matches!(compile("ease-in"), Err(CompileError::Kind { .. })));
    }

    #[test]
    fn test_arity_errors() {
        assert!(matches!(compile("speed"), Err(CompileError::Arity { .. })));
        assert!(matches!(compile("nop 3"), Err(CompileError::Arity { .. })));
        assert!(matches!(compile("(each-range 1)"), Err(CompileError::Arity { .. })));
    }

    #[test]
    fn test_empty_list_and_malformed_block() {
        assert_eq!(compile("()").unwrap_err(), CompileError::EmptyList);
        assert_eq!(
            compile("(block nop)").unwrap_err(),
            CompileError::MalformedBlock("nop".to_string())
        );
    }

    #[test]
    fn test_names_are_sorted() {
        let names = Compiler::new().names();
        assert!(names.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(names.contains(&"emit"));
    }
}
