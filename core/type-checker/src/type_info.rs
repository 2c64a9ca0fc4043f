//! Type Information
//!
//! Block programs only know four value types. The checker adds
//! [`TypeInfoKind::Unknown`] for expressions whose type could not be computed
//! because of an earlier error; anything built on an unknown operand stays
//! unknown without a second diagnostic.

use core::fmt;
use std::fmt::{Display, Formatter};

use nepo_ast::nodes::BlocklyType;

#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash)]
pub enum TypeInfoKind {
    Number,
    Boolean,
    String,
    Void,
    Unknown,
}

impl TypeInfoKind {
    #[must_use]
    pub fn is_unknown(self) -> bool {
        self == TypeInfoKind::Unknown
    }

    /// The declared type this kind corresponds to, if any.
    #[must_use]
    pub fn as_blockly_type(self) -> Option<BlocklyType> {
        match self {
            TypeInfoKind::Number => Some(BlocklyType::Number),
            TypeInfoKind::Boolean => Some(BlocklyType::Boolean),
            TypeInfoKind::String => Some(BlocklyType::String),
            TypeInfoKind::Void => Some(BlocklyType::Void),
            TypeInfoKind::Unknown => None,
        }
    }
}

impl From<BlocklyType> for TypeInfoKind {
    fn from(ty: BlocklyType) -> Self {
        match ty {
            BlocklyType::Number => TypeInfoKind::Number,
            BlocklyType::Boolean => TypeInfoKind::Boolean,
            BlocklyType::String => TypeInfoKind::String,
            BlocklyType::Void => TypeInfoKind::Void,
        }
    }
}

impl Display for TypeInfoKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            TypeInfoKind::Number => write!(f, "NUMBER"),
            TypeInfoKind::Boolean => write!(f, "BOOLEAN"),
            TypeInfoKind::String => write!(f, "STRING"),
            TypeInfoKind::Void => write!(f, "VOID"),
            TypeInfoKind::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_types_round_trip() {
        for ty in BlocklyType::ALL {
            assert_eq!(TypeInfoKind::from(*ty).as_blockly_type(), Some(*ty));
        }
        assert_eq!(TypeInfoKind::Unknown.as_blockly_type(), None);
    }

    #[test]
    fn display_matches_blockly_names() {
        assert_eq!(TypeInfoKind::Boolean.to_string(), "BOOLEAN");
        assert_eq!(TypeInfoKind::Unknown.to_string(), "UNKNOWN");
    }
}
