//! Main code generator.

use crate::c::CEmitter;
use crate::compiler::CompiledSet;
use crate::error::CodegenError;
use crate::rust::RustEmitter;

/// Target languages supported by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// A Rust module built on `cangen-core`.
    Rust,
    /// A self-contained C header.
    C,
}

/// Code generator over one compiled message set.
pub struct Generator<'a> {
    set: &'a CompiledSet,
}

impl<'a> Generator<'a> {
    /// Creates a new generator.
    #[must_use]
    pub fn new(set: &'a CompiledSet) -> Self {
        Self { set }
    }

    /// Generates code for the given target.
    ///
    /// # Errors
    /// Returns [`CodegenError::Generation`] if the set cannot be expressed
    /// in the target language.
    pub fn generate(&self, target: Target) -> Result<String, CodegenError> {
        let code = match target {
            Target::Rust => RustEmitter::new(self.set).emit()?,
            Target::C => CEmitter::new(self.set).emit()?,
        };
        tracing::debug!(
            "generated {} byte(s) of {target:?} for {} message(s)",
            code.len(),
            self.set.codecs.len()
        );
        Ok(code)
    }

    /// Generates the Rust module.
    ///
    /// # Errors
    /// See [`Generator::generate`].
    pub fn generate_rust(&self) -> Result<String, CodegenError> {
        self.generate(Target::Rust)
    }

    /// Generates the C header.
    ///
    /// # Errors
    /// See [`Generator::generate`].
    pub fn generate_c(&self) -> Result<String, CodegenError> {
        self.generate(Target::C)
    }
}
