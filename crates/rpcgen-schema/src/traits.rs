//! Traits for code generation backends.

use crate::context::Context;
use crate::def::GenDef;
use crate::error::Result;
use crate::options::Options;

/// A code generation backend.
///
/// Backends receive definitions that already passed validation, together
/// with the resolved [`Context`], and produce the complete text of the
/// output file.
pub trait Generator: Send + Sync {
    /// Unique backend identifier (e.g., "go-fiber").
    fn name(&self) -> &'static str;

    /// File extension for generated code (e.g., "go").
    fn extension(&self) -> &'static str;

    /// Generate the output file from every definition.
    fn generate_all(&self, opts: &Options, defs: &[GenDef], ctx: &Context) -> Result<String>;
}
