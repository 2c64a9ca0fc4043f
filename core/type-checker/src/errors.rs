use std::fmt::{self, Display, Formatter};

use nepo_ast::{
    info::{MessageKey, NepoInfo},
    nodes::{BinaryOp, UnaryOp},
};
use thiserror::Error;

use crate::type_info::TypeInfoKind;

/// Block that caused an error, identified by its editor block id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location(Option<String>);

impl Location {
    #[must_use]
    pub fn new(block_id: Option<&str>) -> Self {
        Location(block_id.map(str::to_string))
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(id) => write!(f, "block {id}"),
            None => write!(f, "unplaced block"),
        }
    }
}

/// Where a value of the wrong type was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeMismatchContext {
    Assignment { name: String },
    VariableDefinition { name: String },
    VariableUse { name: String },
    Condition,
    RepeatTimes,
    WaitTime,
    ToneFrequency,
    ToneDuration,
    MotorPower,
}

impl Display for TypeMismatchContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeMismatchContext::Assignment { name } => write!(f, "in assignment to `{name}`"),
            TypeMismatchContext::VariableDefinition { name } => {
                write!(f, "in definition of `{name}`")
            }
            TypeMismatchContext::VariableUse { name } => write!(f, "in use of `{name}`"),
            TypeMismatchContext::Condition => write!(f, "in condition"),
            TypeMismatchContext::RepeatTimes => write!(f, "in repeat count"),
            TypeMismatchContext::WaitTime => write!(f, "in wait time"),
            TypeMismatchContext::ToneFrequency => write!(f, "in tone frequency"),
            TypeMismatchContext::ToneDuration => write!(f, "in tone duration"),
            TypeMismatchContext::MotorPower => write!(f, "in motor power"),
        }
    }
}

/// A type error found in a block program.
///
/// The checker attaches each error to the offending node as a [`NepoInfo`]
/// and keeps going; the error values themselves are returned for callers that
/// want the full picture.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum TypeCheckError {
    #[error("{location}: type mismatch {context}: expected `{expected}`, found `{found}`")]
    TypeMismatch {
        expected: TypeInfoKind,
        found: TypeInfoKind,
        context: TypeMismatchContext,
        location: Location,
    },

    #[error("{location}: operator `{operator}` cannot be applied to `{left}` and `{right}`")]
    InvalidBinaryOperands {
        operator: BinaryOp,
        left: TypeInfoKind,
        right: TypeInfoKind,
        location: Location,
    },

    #[error("{location}: unary operator `{operator}` cannot be applied to `{found}`")]
    InvalidUnaryOperand {
        operator: UnaryOp,
        found: TypeInfoKind,
        location: Location,
    },
}

impl TypeCheckError {
    /// The diagnostic attached to the node for this error.
    pub fn to_info(&self) -> NepoInfo {
        match self {
            TypeCheckError::TypeMismatch {
                expected,
                found,
                context,
                ..
            } => NepoInfo::error(MessageKey::TypeErrorMismatch)
                .with_param("expected", expected.to_string())
                .with_param("found", found.to_string())
                .with_param("context", context.to_string()),
            TypeCheckError::InvalidBinaryOperands {
                operator,
                left,
                right,
                ..
            } => NepoInfo::error(MessageKey::TypeErrorBinaryOperands)
                .with_param("operator", operator.as_str())
                .with_param("left", left.to_string())
                .with_param("right", right.to_string()),
            TypeCheckError::InvalidUnaryOperand {
                operator, found, ..
            } => NepoInfo::error(MessageKey::TypeErrorUnaryOperand)
                .with_param("operator", operator.as_str())
                .with_param("found", found.to_string()),
        }
    }
}
