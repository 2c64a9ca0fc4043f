//! Error types for the AST crate.
//!
//! Every variant describes input the upstream block parser must never
//! produce. These are contract breaches, not user diagnostics, so they abort
//! the construction of the node or tree that triggered them.

use thiserror::Error;

use crate::nodes::{Category, PhraseKind};

/// Errors raised by node factories and the tree builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum AstError {
    /// A child slot received a phrase of a category it cannot hold.
    #[error("{parent} expects {expected} in `{slot}`, found {found} ({found_category})")]
    InvalidChild {
        parent: PhraseKind,
        slot: &'static str,
        expected: &'static str,
        found: PhraseKind,
        found_category: Category,
    },

    /// Numeric literal text that is not a finite number.
    #[error("invalid numeric literal `{value}`")]
    InvalidNumber { value: String },

    /// Identifier that is empty or contains characters outside `[A-Za-z0-9_]`.
    #[error("invalid identifier `{name}` in {kind}")]
    InvalidIdentifier { kind: PhraseKind, name: String },

    /// Required payload field absent from the input.
    #[error("missing required field `{field}` in {kind}")]
    MissingField { kind: &'static str, field: &'static str },

    /// Enum payload with a value outside its closed set.
    #[error("unknown {enum_name} value `{value}`")]
    UnknownEnumValue { enum_name: &'static str, value: String },

    /// Structural arity violation inside one node.
    #[error("malformed {kind}: {reason}")]
    Malformed { kind: PhraseKind, reason: String },

    /// Component name that cannot be used as an identifier.
    #[error("invalid configuration component name `{name}`")]
    InvalidComponentName { name: String },

    /// Two components of one configuration share a name.
    #[error("duplicate configuration component `{name}`")]
    DuplicateComponentName { name: String },

    /// One component maps the same port role twice.
    #[error("component `{component}` declares port role `{role}` twice")]
    DuplicatePortRole { component: String, role: String },

    /// Pin identifier that is empty or contains characters outside `[A-Za-z0-9_]`.
    #[error("component `{component}` assigns invalid pin `{pin}` to port role `{role}`")]
    InvalidPin {
        component: String,
        role: String,
        pin: String,
    },
}
