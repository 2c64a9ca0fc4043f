//! Type Checker Implementation
//!
//! A single visitor pass over the program. Every expression visit returns
//! the expression's type, every statement visit returns
//! [`TypeInfoKind::Void`]. Declarations are processed before the body, so
//! assignments in the body see the declared type of their target.
//!
//! The checker never stops at an error. It attaches a diagnostic to the
//! offending node, records the error and carries on with
//! [`TypeInfoKind::Unknown`] so one mistake is reported exactly once.

use nepo_ast::{
    nodes::{
        AssignStmt, Binary, BinaryOp, BoolConst, IfStmt, KeySensor, LightAction, LightSensor,
        LightStatusAction, MainTask, MotorOnAction, MotorStopAction, Node, NumConst, Phrase,
        RepeatMode, RepeatStmt, SerialWriteAction, ShowTextAction, StmtFlowCon, StmtList,
        StringConst, TemperatureSensor, TimerSensor, ToneAction, UltrasonicSensor, Unary, UnaryOp,
        Var, VarDeclaration, WaitTimeStmt,
    },
    visitor::PhraseVisitor,
};
use rustc_hash::FxHashMap;

use crate::{
    errors::{Location, TypeCheckError, TypeMismatchContext},
    type_info::TypeInfoKind,
    typed_context::TypedContext,
};

#[derive(Default)]
pub(crate) struct TypeChecker {
    variables: FxHashMap<String, TypeInfoKind>,
    errors: Vec<TypeCheckError>,
}

impl TypeChecker {
    pub(crate) fn into_context(self) -> TypedContext {
        TypedContext {
            variables: self.variables,
            errors: self.errors,
        }
    }

    fn report_on_phrase(&mut self, phrase: &Phrase, error: TypeCheckError) {
        phrase.add_info(error.to_info());
        self.errors.push(error);
    }

    fn report_on_node(&mut self, node: &dyn Node, error: TypeCheckError) {
        node.add_info(error.to_info());
        self.errors.push(error);
    }

    /// Visits `phrase` and reports a mismatch on it unless it has the
    /// expected type.
    fn expect(&mut self, phrase: &Phrase, expected: TypeInfoKind, context: TypeMismatchContext) {
        let found = phrase.accept(self);
        if found != expected && !found.is_unknown() {
            self.report_on_phrase(
                phrase,
                TypeCheckError::TypeMismatch {
                    expected,
                    found,
                    context,
                    location: Location::new(phrase.block_id()),
                },
            );
        }
    }

    fn binary_result(op: BinaryOp, left: TypeInfoKind, right: TypeInfoKind) -> Option<TypeInfoKind> {
        use TypeInfoKind::{Boolean, Number};
        match (left, right) {
            (Number, Number) if op.is_arithmetic() => Some(Number),
            (Number, Number) if op.is_ordering() => Some(Boolean),
            (Boolean, Boolean) if op.is_logical() => Some(Boolean),
            (l, r) if op.is_equality() && l == r && l != TypeInfoKind::Void => Some(Boolean),
            _ => None,
        }
    }

    fn visit_list(&mut self, list: &StmtList) {
        for statement in list.statements() {
            statement.accept(self);
        }
    }
}

impl PhraseVisitor for TypeChecker {
    type Output = TypeInfoKind;

    fn visit_num_const(&mut self, _node: &NumConst) -> TypeInfoKind {
        TypeInfoKind::Number
    }

    fn visit_bool_const(&mut self, _node: &BoolConst) -> TypeInfoKind {
        TypeInfoKind::Boolean
    }

    fn visit_string_const(&mut self, _node: &StringConst) -> TypeInfoKind {
        TypeInfoKind::String
    }

    fn visit_var(&mut self, node: &Var) -> TypeInfoKind {
        let tagged = TypeInfoKind::from(node.type_());
        // Undeclared names are the program validator's concern.
        let Some(declared) = self.variables.get(node.name()).copied() else {
            return tagged;
        };
        if declared == tagged {
            return declared;
        }
        self.report_on_node(
            node,
            TypeCheckError::TypeMismatch {
                expected: declared,
                found: tagged,
                context: TypeMismatchContext::VariableUse {
                    name: node.name().to_string(),
                },
                location: Location::new(node.block_id()),
            },
        );
        TypeInfoKind::Unknown
    }

    fn visit_binary(&mut self, node: &Binary) -> TypeInfoKind {
        let left = node.left().accept(self);
        let right = node.right().accept(self);
        if left.is_unknown() || right.is_unknown() {
            return TypeInfoKind::Unknown;
        }
        if let Some(result) = Self::binary_result(node.op(), left, right) {
            result
        } else {
            self.report_on_node(
                node,
                TypeCheckError::InvalidBinaryOperands {
                    operator: node.op(),
                    left,
                    right,
                    location: Location::new(node.block_id()),
                },
            );
            TypeInfoKind::Unknown
        }
    }

    fn visit_unary(&mut self, node: &Unary) -> TypeInfoKind {
        let found = node.expression().accept(self);
        let expected = match node.op() {
            UnaryOp::Neg => TypeInfoKind::Number,
            UnaryOp::Not => TypeInfoKind::Boolean,
        };
        if found.is_unknown() {
            TypeInfoKind::Unknown
        } else if found == expected {
            expected
        } else {
            self.report_on_node(
                node,
                TypeCheckError::InvalidUnaryOperand {
                    operator: node.op(),
                    found,
                    location: Location::new(node.block_id()),
                },
            );
            TypeInfoKind::Unknown
        }
    }

    fn visit_key_sensor(&mut self, _node: &KeySensor) -> TypeInfoKind {
        TypeInfoKind::Boolean
    }

    fn visit_ultrasonic_sensor(&mut self, _node: &UltrasonicSensor) -> TypeInfoKind {
        TypeInfoKind::Number
    }

    fn visit_light_sensor(&mut self, _node: &LightSensor) -> TypeInfoKind {
        TypeInfoKind::Number
    }

    fn visit_temperature_sensor(&mut self, _node: &TemperatureSensor) -> TypeInfoKind {
        TypeInfoKind::Number
    }

    fn visit_timer_sensor(&mut self, _node: &TimerSensor) -> TypeInfoKind {
        TypeInfoKind::Number
    }

    fn visit_light_action(&mut self, _node: &LightAction) -> TypeInfoKind {
        TypeInfoKind::Void
    }

    fn visit_light_status_action(&mut self, _node: &LightStatusAction) -> TypeInfoKind {
        TypeInfoKind::Void
    }

    fn visit_tone_action(&mut self, node: &ToneAction) -> TypeInfoKind {
        self.expect(
            node.frequency(),
            TypeInfoKind::Number,
            TypeMismatchContext::ToneFrequency,
        );
        self.expect(
            node.duration(),
            TypeInfoKind::Number,
            TypeMismatchContext::ToneDuration,
        );
        TypeInfoKind::Void
    }

    fn visit_motor_on_action(&mut self, node: &MotorOnAction) -> TypeInfoKind {
        self.expect(
            node.power(),
            TypeInfoKind::Number,
            TypeMismatchContext::MotorPower,
        );
        TypeInfoKind::Void
    }

    fn visit_motor_stop_action(&mut self, _node: &MotorStopAction) -> TypeInfoKind {
        TypeInfoKind::Void
    }

    // Text output converts any value.
    fn visit_show_text_action(&mut self, node: &ShowTextAction) -> TypeInfoKind {
        node.text().accept(self);
        TypeInfoKind::Void
    }

    fn visit_serial_write_action(&mut self, node: &SerialWriteAction) -> TypeInfoKind {
        node.value().accept(self);
        TypeInfoKind::Void
    }

    fn visit_stmt_list(&mut self, node: &StmtList) -> TypeInfoKind {
        self.visit_list(node);
        TypeInfoKind::Void
    }

    fn visit_assign_stmt(&mut self, node: &AssignStmt) -> TypeInfoKind {
        match self.variables.get(node.name()).copied() {
            Some(expected) => self.expect(
                node.value(),
                expected,
                TypeMismatchContext::Assignment {
                    name: node.name().to_string(),
                },
            ),
            // Undeclared targets are the program validator's concern.
            None => {
                node.value().accept(self);
            }
        }
        TypeInfoKind::Void
    }

    fn visit_if_stmt(&mut self, node: &IfStmt) -> TypeInfoKind {
        for (condition, then_list) in node.arms() {
            self.expect(
                condition,
                TypeInfoKind::Boolean,
                TypeMismatchContext::Condition,
            );
            self.visit_list(then_list);
        }
        if let Some(else_list) = node.else_list() {
            self.visit_list(else_list);
        }
        TypeInfoKind::Void
    }

    fn visit_repeat_stmt(&mut self, node: &RepeatStmt) -> TypeInfoKind {
        if let Some(expression) = node.expression() {
            match node.mode() {
                RepeatMode::Times => self.expect(
                    expression,
                    TypeInfoKind::Number,
                    TypeMismatchContext::RepeatTimes,
                ),
                RepeatMode::While | RepeatMode::Until => self.expect(
                    expression,
                    TypeInfoKind::Boolean,
                    TypeMismatchContext::Condition,
                ),
                RepeatMode::Forever => {
                    expression.accept(self);
                }
            }
        }
        self.visit_list(node.body());
        TypeInfoKind::Void
    }

    fn visit_stmt_flow_con(&mut self, _node: &StmtFlowCon) -> TypeInfoKind {
        TypeInfoKind::Void
    }

    fn visit_wait_time_stmt(&mut self, node: &WaitTimeStmt) -> TypeInfoKind {
        self.expect(
            node.time(),
            TypeInfoKind::Number,
            TypeMismatchContext::WaitTime,
        );
        TypeInfoKind::Void
    }

    fn visit_var_declaration(&mut self, node: &VarDeclaration) -> TypeInfoKind {
        let declared = TypeInfoKind::from(node.type_());
        let found = node.value().accept(self);
        if found != declared && !found.is_unknown() {
            self.report_on_node(
                node,
                TypeCheckError::TypeMismatch {
                    expected: declared,
                    found,
                    context: TypeMismatchContext::VariableDefinition {
                        name: node.name().to_string(),
                    },
                    location: Location::new(node.block_id()),
                },
            );
        }
        self.variables
            .entry(node.name().to_string())
            .or_insert(declared);
        TypeInfoKind::Void
    }

    fn visit_main_task(&mut self, node: &MainTask) -> TypeInfoKind {
        for variable in node.variables() {
            self.visit_var_declaration(variable);
        }
        TypeInfoKind::Void
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use nepo_ast::{
        info::MessageKey,
        nodes::{BlockProperties, BlocklyType, ProgramAst},
        visitor::walk_program,
    };

    use super::*;

    fn num(value: &str) -> Phrase {
        NumConst::make(value, None, None).unwrap().into()
    }

    fn text(value: &str) -> Phrase {
        StringConst::make(value, None, None).into()
    }

    fn program(variables: Vec<VarDeclaration>, body: Vec<Phrase>) -> ProgramAst {
        let variables = variables.into_iter().map(Rc::new).collect();
        ProgramAst::new(
            Rc::new(MainTask::make(variables, None, None)),
            Rc::new(StmtList::make(body, None, None).unwrap()),
        )
    }

    fn check(program: &ProgramAst) -> TypedContext {
        let mut checker = TypeChecker::default();
        walk_program(program, &mut checker);
        checker.into_context()
    }

    #[test]
    fn well_typed_program_has_no_errors() {
        let declaration = VarDeclaration::make("n", BlocklyType::Number, num("0"), None, None).unwrap();
        let sum: Phrase = Binary::make(
            BinaryOp::Add,
            Var::make("n", BlocklyType::Number, None, None).unwrap().into(),
            UltrasonicSensor::make("U", None, None).unwrap().into(),
            None,
            None,
        )
        .unwrap()
        .into();
        let assign: Phrase = AssignStmt::make("n", sum, None, None).unwrap().into();
        let ctx = check(&program(vec![declaration], vec![assign]));
        assert!(!ctx.has_errors());
        assert_eq!(ctx.variable_type("n"), Some(TypeInfoKind::Number));
    }

    #[test]
    fn declaration_mismatch_is_attached_to_declaration() {
        let properties = BlockProperties::new("robGlobalVariables_declare", "d1");
        let declaration =
            VarDeclaration::make("flag", BlocklyType::Boolean, num("1"), Some(properties), None).unwrap();
        let program = program(vec![declaration], vec![]);
        let ctx = check(&program);
        assert_eq!(ctx.error_count(), 1);
        let infos = program.main_task().variables()[0].infos().to_vec();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].message(), MessageKey::TypeErrorMismatch);
        assert_eq!(infos[0].param("expected"), Some("BOOLEAN"));
        assert_eq!(infos[0].param("found"), Some("NUMBER"));
    }

    #[test]
    fn non_boolean_condition_is_reported_on_condition() {
        let condition = num("1");
        let if_stmt: Phrase = IfStmt::make(
            vec![condition.clone()],
            vec![Rc::new(StmtList::empty())],
            None,
            None,
            None,
        )
        .unwrap()
        .into();
        let ctx = check(&program(vec![], vec![if_stmt]));
        assert_eq!(ctx.error_count(), 1);
        assert_eq!(condition.infos().to_vec()[0].param("context"), Some("in condition"));
    }

    #[test]
    fn bad_operands_are_reported_once() {
        // ("a" + 1) * 2 yields one error on the inner binary only.
        let inner: Phrase = Binary::make(BinaryOp::Add, text("a"), num("1"), None, None)
            .unwrap()
            .into();
        let outer: Phrase = Binary::make(BinaryOp::Multiply, inner.clone(), num("2"), None, None)
            .unwrap()
            .into();
        let wait: Phrase = WaitTimeStmt::make(outer.clone(), None, None).unwrap().into();
        let ctx = check(&program(vec![], vec![wait]));
        assert_eq!(ctx.error_count(), 1);
        assert_eq!(inner.infos().len(), 1);
        assert!(outer.infos().is_empty());
        assert_eq!(
            inner.infos().to_vec()[0].message(),
            MessageKey::TypeErrorBinaryOperands
        );
    }

    #[test]
    fn equality_needs_equal_types() {
        let eq = Binary::make(BinaryOp::Eq, text("a"), text("b"), None, None).unwrap();
        let mut checker = TypeChecker::default();
        assert_eq!(checker.visit_binary(&eq), TypeInfoKind::Boolean);
        let neq = Binary::make(BinaryOp::Neq, text("a"), num("1"), None, None).unwrap();
        assert_eq!(checker.visit_binary(&neq), TypeInfoKind::Unknown);
        assert_eq!(checker.into_context().error_count(), 1);
    }

    #[test]
    fn unary_operands() {
        let mut checker = TypeChecker::default();
        let not_key = Unary::make(
            UnaryOp::Not,
            KeySensor::make("K", None, None).unwrap().into(),
            None,
            None,
        )
        .unwrap();
        assert_eq!(checker.visit_unary(&not_key), TypeInfoKind::Boolean);
        let neg_text = Unary::make(UnaryOp::Neg, text("x"), None, None).unwrap();
        assert_eq!(checker.visit_unary(&neg_text), TypeInfoKind::Unknown);
        assert_eq!(neg_text.infos().len(), 1);
    }

    #[test]
    fn repeat_times_needs_number() {
        let repeat: Phrase = RepeatStmt::make(
            RepeatMode::Times,
            Some(BoolConst::make(true, None, None).into()),
            Rc::new(StmtList::empty()),
            None,
            None,
        )
        .unwrap()
        .into();
        let ctx = check(&program(vec![], vec![repeat]));
        assert!(matches!(
            ctx.errors()[0],
            TypeCheckError::TypeMismatch {
                context: TypeMismatchContext::RepeatTimes,
                ..
            }
        ));
    }

    #[test]
    fn variable_use_must_match_declaration() {
        let declaration = VarDeclaration::make("s", BlocklyType::String, text("hi"), None, None).unwrap();
        let properties = BlockProperties::new("robGlobalVariables_get", "g1");
        let var: Phrase = Var::make("s", BlocklyType::Number, Some(properties), None)
            .unwrap()
            .into();
        let wait: Phrase = WaitTimeStmt::make(var.clone(), None, None).unwrap().into();
        let ctx = check(&program(vec![declaration], vec![wait.clone()]));

        assert_eq!(ctx.error_count(), 1);
        assert!(matches!(
            &ctx.errors()[0],
            TypeCheckError::TypeMismatch {
                expected: TypeInfoKind::String,
                found: TypeInfoKind::Number,
                context: TypeMismatchContext::VariableUse { name },
                ..
            } if name == "s"
        ));
        let infos = var.infos().to_vec();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].param("context"), Some("in use of `s`"));
        assert!(wait.infos().is_empty());
    }

    #[test]
    fn undeclared_variable_keeps_its_tag() {
        let mut checker = TypeChecker::default();
        let var = Var::make("ghost", BlocklyType::Boolean, None, None).unwrap();
        assert_eq!(checker.visit_var(&var), TypeInfoKind::Boolean);
        assert!(!checker.into_context().has_errors());
    }

    #[test]
    fn show_text_accepts_numbers() {
        let show: Phrase = ShowTextAction::make("L", num("3"), None, None).unwrap().into();
        let serial: Phrase = SerialWriteAction::make(BoolConst::make(true, None, None).into(), None, None)
            .unwrap()
            .into();
        assert!(!check(&program(vec![], vec![show, serial])).has_errors());
    }
}
