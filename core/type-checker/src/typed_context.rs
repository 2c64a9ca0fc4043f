//! Result of type checking one program.
//!
//! Holds the type of every declared variable and the errors found. The
//! errors are also attached to the nodes that caused them, so this is the
//! summary view used by later pipeline stages.

use rustc_hash::FxHashMap;

use crate::{errors::TypeCheckError, type_info::TypeInfoKind};

#[derive(Debug, Default, Clone)]
pub struct TypedContext {
    pub(crate) variables: FxHashMap<String, TypeInfoKind>,
    pub(crate) errors: Vec<TypeCheckError>,
}

impl TypedContext {
    #[must_use]
    pub fn variable_type(&self, name: &str) -> Option<TypeInfoKind> {
        self.variables.get(name).copied()
    }

    /// Declared variables and their types, in no particular order.
    pub fn variables(&self) -> impl Iterator<Item = (&str, TypeInfoKind)> {
        self.variables.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    #[must_use]
    pub fn errors(&self) -> &[TypeCheckError] {
        &self.errors
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
