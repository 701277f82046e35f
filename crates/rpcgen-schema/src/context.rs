//! Resolver context: the model names type expressions may refer to.

use crate::def::GenDef;
use crate::error::{Error, Result};
use std::collections::HashSet;

/// Set of declared model names.
///
/// Filled once, after naming validation and before emission; emitters only
/// read from it.
#[derive(Debug, Clone, Default)]
pub struct Context {
    available_models: HashSet<String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is a declared model.
    pub fn is_model(&self, name: &str) -> bool {
        self.available_models.contains(name)
    }

    /// Record a model name. Fails if it was already declared.
    pub fn insert_model(&mut self, name: &str) -> Result<()> {
        if !self.available_models.insert(name.to_string()) {
            return Err(Error::DuplicateModel(name.to_string()));
        }
        Ok(())
    }

    /// Record every model declared in `def`.
    pub fn collect_models(&mut self, def: &GenDef) -> Result<()> {
        for name in def.models.keys() {
            self.insert_model(name)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.available_models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.available_models.is_empty()
    }
}
