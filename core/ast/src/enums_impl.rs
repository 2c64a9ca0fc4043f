//! Queries on operator enums shared by the type checker and the code
//! generator.

use crate::nodes::{BinaryOp, BlocklyType, UnaryOp};

impl BinaryOp {
    /// `ADD`, `MINUS`, `MULTIPLY`, `DIVIDE` and `MOD`.
    #[must_use]
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Minus | BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Mod
        )
    }

    #[must_use]
    pub fn is_ordering(self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::Lte | BinaryOp::Gt | BinaryOp::Gte)
    }

    #[must_use]
    pub fn is_equality(self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::Neq)
    }

    #[must_use]
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    /// Operator as written in C-like target languages.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Gte => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    /// Binding strength, higher binds tighter.
    #[must_use]
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq | BinaryOp::Neq => 3,
            BinaryOp::Lt | BinaryOp::Lte | BinaryOp::Gt | BinaryOp::Gte => 4,
            BinaryOp::Add | BinaryOp::Minus => 5,
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Mod => 6,
        }
    }
}

impl UnaryOp {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

impl BlocklyType {
    /// Whether a value of this type can be stored in a variable.
    #[must_use]
    pub fn is_value_type(self) -> bool {
        !matches!(self, BlocklyType::Void)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_operator_has_one_class() {
        for op in BinaryOp::ALL {
            let classes = [
                op.is_arithmetic(),
                op.is_ordering(),
                op.is_equality(),
                op.is_logical(),
            ];
            assert_eq!(classes.iter().filter(|c| **c).count(), 1, "{op}");
        }
    }

    #[test]
    fn precedence_orders_multiplication_over_addition() {
        assert!(BinaryOp::Multiply.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::And.precedence() > BinaryOp::Or.precedence());
        assert_eq!(BinaryOp::Mod.symbol(), "%");
    }
}
