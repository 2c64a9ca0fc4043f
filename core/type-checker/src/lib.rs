//! Type Checker for NEPO block programs
//!
//! Computes the type of every expression in a [`ProgramAst`] and attaches a
//! diagnostic to each node whose operands or arguments have the wrong type.
//!
//! ## Rules
//!
//! - Literals have their obvious type. `VAR` has its declared type.
//! - Key sensors read `BOOLEAN`, every other sensor reads `NUMBER`.
//! - Arithmetic and ordering operators need `NUMBER` operands; `AND`/`OR`
//!   need `BOOLEAN`; `EQ`/`NEQ` need two operands of the same type.
//! - `NEG` needs a `NUMBER`, `NOT` a `BOOLEAN`.
//! - Conditions are `BOOLEAN`. Repeat counts, wait times, tone arguments and
//!   motor power are `NUMBER`. Text output accepts any value.
//!
//! ## Quick Start
//!
//! ```ignore
//! use nepo_type_checker::TypeCheckerBuilder;
//!
//! let typed_context = TypeCheckerBuilder::build_typed_context(&program).typed_context();
//! if typed_context.has_errors() {
//!     // diagnostics are already attached to the offending nodes
//! }
//! ```

use std::marker::PhantomData;

use nepo_ast::{nodes::ProgramAst, visitor::walk_program};

use crate::{type_checker::TypeChecker, typed_context::TypedContext};

pub mod errors;
mod type_checker;
pub mod type_info;
pub mod typed_context;

/// Marker state indicating no program has been checked yet.
pub struct TypeCheckerInitState;

/// Marker state indicating type checking is complete and context is ready.
pub struct TypeCheckerCompleteState;

/// Type alias for a completed type checker builder ready to yield its context.
pub type CompletedTypeCheckerBuilder = TypeCheckerBuilder<TypeCheckerCompleteState>;

/// Builder for running the type checker over a program.
///
/// Uses the typestate pattern to ensure type checking completes before
/// accessing the typed context.
pub struct TypeCheckerBuilder<S> {
    typed_context: TypedContext,
    _state: PhantomData<S>,
}

impl Default for TypeCheckerBuilder<TypeCheckerInitState> {
    fn default() -> Self {
        TypeCheckerBuilder::new()
    }
}

impl TypeCheckerBuilder<TypeCheckerInitState> {
    #[must_use]
    pub fn new() -> Self {
        TypeCheckerBuilder {
            typed_context: TypedContext::default(),
            _state: PhantomData,
        }
    }

    /// Type check `program`, attaching diagnostics to its nodes.
    ///
    /// Type errors never abort the pass; they are collected in the returned
    /// context.
    #[must_use = "returns builder with typed context, extract with .typed_context()"]
    pub fn build_typed_context(program: &ProgramAst) -> CompletedTypeCheckerBuilder {
        let mut type_checker = TypeChecker::default();
        walk_program(program, &mut type_checker);
        TypeCheckerBuilder {
            typed_context: type_checker.into_context(),
            _state: PhantomData,
        }
    }
}

impl TypeCheckerBuilder<TypeCheckerCompleteState> {
    /// Consume the builder and return the typed context.
    #[must_use = "consumes builder and returns the typed context"]
    pub fn typed_context(self) -> TypedContext {
        self.typed_context
    }
}
