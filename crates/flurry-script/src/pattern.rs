//! Source text to runnable pattern in one step

use crate::compiler::Compiler;
use crate::error::Result;
use flurry_core::{BehaviorGen, Field};
use flurry_syntax::{parse_program, Program};
use std::fs;
use std::path::Path;

/// A parsed and compiled pattern
#[derive(Debug, Clone)]
pub struct Pattern {
    program: Program,
    gen: BehaviorGen,
}

impl Pattern {
    /// Parse and compile pattern source
    pub fn compile_source(source: &str) -> Result<Self> {
        Self::compile_with(&Compiler::new(), source)
    }

    /// Parse and compile pattern source with an existing compiler
    pub fn compile_with(compiler: &Compiler, source: &str) -> Result<Self> {
        let program = parse_program(source)?;
        let gen = compiler.compile(&program)?;
        Ok(Self { program, gen })
    }

    /// Read, parse and compile a pattern file
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading pattern");
        Self::compile_source(&source)
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn gen(&self) -> &BehaviorGen {
        &self.gen
    }

    /// Add one root particle running this pattern
    pub fn spawn_into(&self, field: &mut Field) {
        field.spawn(&self.gen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CompileError, Error};

    #[test]
    fn test_compile_source() {
        let pattern = Pattern::compile_source("speed 2; 10 nop").unwrap();
        assert_eq!(pattern.program().len(), 2);

        let mut field = Field::default();
        pattern.spawn_into(&mut field);
        field.update(1.0);
        let position = field.iter().next().map(|p| p.position.z);
        assert_eq!(position, Some(2.0));
    }

    #[test]
    fn test_errors_are_unified() {
        match Pattern::compile_source("speed (") {
            Err(Error::Parse(err)) => assert_eq!(err.line, 1),
            other => panic!("expected parse error, got {:?}", other.map(|_| ())),
        }
        assert!(matches!(
            Pattern::compile_source("fizz"),
            Err(Error::Compile(CompileError::UnknownIdentifier(_)))
        ));
        assert!(matches!(
            Pattern::load_file("/nonexistent/pattern.flurry"),
            Err(Error::Io(_))
        ));
    }
}
