//! Semantic checks on a program that the node factories cannot make on their
//! own: variable scoping, loop nesting, value ranges and, when bound to a
//! configuration, whether every sensor and actor refers to a component of the
//! right type.
//!
//! The validator also records which hardware the program touches. Code
//! generation only emits setup code for that hardware.

use nepo_ast::{
    configuration::{ComponentType, ConfigurationAst},
    hardware::UsedHardware,
    info::{MessageKey, NepoInfo},
    nodes::{
        AssignStmt, Binary, BoolConst, IfStmt, KeySensor, LightAction, LightSensor,
        LightStatusAction, MainTask, MotorOnAction, MotorStopAction, Node, NumConst, Phrase,
        RepeatStmt, SerialWriteAction, ShowTextAction, StmtFlowCon, StmtList, StringConst,
        TemperatureSensor, TimerSensor, ToneAction, UltrasonicSensor, Unary, Var, VarDeclaration,
        WaitTimeStmt,
    },
    visitor::PhraseVisitor,
};
use rustc_hash::FxHashSet;

const MOTOR_POWER_RANGE: std::ops::RangeInclusive<f64> = -100.0..=100.0;

#[derive(Clone, Copy)]
enum Hardware {
    Sensor,
    Actor,
}

impl Hardware {
    fn missing(self) -> MessageKey {
        match self {
            Hardware::Sensor => MessageKey::ConfigurationErrorSensorMissing,
            Hardware::Actor => MessageKey::ConfigurationErrorActorMissing,
        }
    }

    fn wrong(self) -> MessageKey {
        match self {
            Hardware::Sensor => MessageKey::ConfigurationErrorSensorWrong,
            Hardware::Actor => MessageKey::ConfigurationErrorActorWrong,
        }
    }
}

pub struct ProgramValidator<'a> {
    configuration: Option<&'a ConfigurationAst>,
    declared: FxHashSet<String>,
    loop_depth: usize,
    error_count: usize,
    used: UsedHardware,
}

impl<'a> ProgramValidator<'a> {
    /// A validator without hardware checks.
    #[must_use]
    pub fn new() -> Self {
        Self::with_configuration(None)
    }

    /// A validator that also checks component references against
    /// `configuration` when one is given.
    #[must_use]
    pub fn with_configuration(configuration: Option<&'a ConfigurationAst>) -> Self {
        Self {
            configuration,
            declared: FxHashSet::default(),
            loop_depth: 0,
            error_count: 0,
            used: UsedHardware::default(),
        }
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    #[must_use]
    pub fn into_used_hardware(self) -> UsedHardware {
        self.used
    }

    fn error(&mut self, node: &dyn Node, info: NepoInfo) {
        node.add_info(info);
        self.error_count += 1;
    }

    fn check_variable(&mut self, node: &dyn Node, name: &str) {
        if !self.declared.contains(name) {
            self.error(
                node,
                NepoInfo::error(MessageKey::VariableUsedBeforeDeclaration).with_param("name", name),
            );
        }
    }

    /// Checks that `port` names a configured component of `expected` type and
    /// records it as used.
    fn check_component(
        &mut self,
        node: &dyn Node,
        port: &str,
        expected: &ComponentType,
        hardware: Hardware,
    ) {
        let Some(configuration) = self.configuration else {
            self.used.add_component(port);
            return;
        };
        match configuration.component(port) {
            None => self.error(
                node,
                NepoInfo::error(hardware.missing()).with_param("name", port),
            ),
            Some(component) if component.component_type() != expected => self.error(
                node,
                NepoInfo::error(hardware.wrong())
                    .with_param("name", port)
                    .with_param("expected", expected.as_str())
                    .with_param("found", component.component_type().as_str()),
            ),
            Some(_) => self.used.add_component(port),
        }
    }

    fn visit_list(&mut self, list: &StmtList) {
        for statement in list.statements() {
            statement.accept(self);
        }
    }
}

impl Default for ProgramValidator<'_> {
    fn default() -> Self {
        Self::new()
    }
}

fn constant_value(phrase: &Phrase) -> Option<f64> {
    match phrase {
        Phrase::NumConst(n) => Some(n.as_f64()),
        Phrase::Unary(unary) if unary.op() == nepo_ast::nodes::UnaryOp::Neg => {
            constant_value(unary.expression()).map(|v| -v)
        }
        _ => None,
    }
}

impl PhraseVisitor for ProgramValidator<'_> {
    type Output = ();

    fn visit_num_const(&mut self, _node: &NumConst) {}

    fn visit_bool_const(&mut self, _node: &BoolConst) {}

    fn visit_string_const(&mut self, _node: &StringConst) {}

    fn visit_var(&mut self, node: &Var) {
        self.check_variable(node, node.name());
    }

    fn visit_binary(&mut self, node: &Binary) {
        node.left().accept(self);
        node.right().accept(self);
    }

    fn visit_unary(&mut self, node: &Unary) {
        node.expression().accept(self);
    }

    fn visit_key_sensor(&mut self, node: &KeySensor) {
        self.check_component(node, node.port(), &ComponentType::Key, Hardware::Sensor);
    }

    fn visit_ultrasonic_sensor(&mut self, node: &UltrasonicSensor) {
        self.check_component(
            node,
            node.port(),
            &ComponentType::Ultrasonic,
            Hardware::Sensor,
        );
    }

    fn visit_light_sensor(&mut self, node: &LightSensor) {
        self.check_component(node, node.port(), &ComponentType::Light, Hardware::Sensor);
    }

    fn visit_temperature_sensor(&mut self, node: &TemperatureSensor) {
        self.check_component(
            node,
            node.port(),
            &ComponentType::Temperature,
            Hardware::Sensor,
        );
    }

    fn visit_timer_sensor(&mut self, node: &TimerSensor) {
        self.used.add_timer(node.timer());
    }

    fn visit_light_action(&mut self, _node: &LightAction) {
        self.used.set_brick_light_used();
    }

    fn visit_light_status_action(&mut self, _node: &LightStatusAction) {
        self.used.set_brick_light_used();
    }

    fn visit_tone_action(&mut self, node: &ToneAction) {
        self.check_component(node, node.port(), &ComponentType::Buzzer, Hardware::Actor);
        node.frequency().accept(self);
        node.duration().accept(self);
    }

    fn visit_motor_on_action(&mut self, node: &MotorOnAction) {
        self.check_component(node, node.port(), &ComponentType::Motor, Hardware::Actor);
        node.power().accept(self);
        if let Some(power) = constant_value(node.power())
            && !MOTOR_POWER_RANGE.contains(&power)
        {
            // Warnings are not counted as errors.
            node.add_info(
                NepoInfo::warning(MessageKey::MotorPowerOutOfRange)
                    .with_param("power", power.to_string()),
            );
        }
    }

    fn visit_motor_stop_action(&mut self, node: &MotorStopAction) {
        self.check_component(node, node.port(), &ComponentType::Motor, Hardware::Actor);
    }

    fn visit_show_text_action(&mut self, node: &ShowTextAction) {
        self.check_component(node, node.port(), &ComponentType::Lcd, Hardware::Actor);
        node.text().accept(self);
    }

    fn visit_serial_write_action(&mut self, node: &SerialWriteAction) {
        self.used.set_serial_used();
        node.value().accept(self);
    }

    fn visit_stmt_list(&mut self, node: &StmtList) {
        self.visit_list(node);
    }

    fn visit_assign_stmt(&mut self, node: &AssignStmt) {
        self.check_variable(node, node.name());
        node.value().accept(self);
    }

    fn visit_if_stmt(&mut self, node: &IfStmt) {
        for (condition, then_list) in node.arms() {
            condition.accept(self);
            self.visit_list(then_list);
        }
        if let Some(else_list) = node.else_list() {
            self.visit_list(else_list);
        }
    }

    fn visit_repeat_stmt(&mut self, node: &RepeatStmt) {
        if let Some(expression) = node.expression() {
            expression.accept(self);
        }
        self.loop_depth += 1;
        self.visit_list(node.body());
        self.loop_depth -= 1;
    }

    fn visit_stmt_flow_con(&mut self, node: &StmtFlowCon) {
        if self.loop_depth == 0 {
            self.error(
                node,
                NepoInfo::error(MessageKey::FlowControlOutsideLoop)
                    .with_param("flow", node.flow().as_str()),
            );
        }
    }

    fn visit_wait_time_stmt(&mut self, node: &WaitTimeStmt) {
        node.time().accept(self);
    }

    // The initial value may only use variables declared before this one.
    fn visit_var_declaration(&mut self, node: &VarDeclaration) {
        node.value().accept(self);
        if !self.declared.insert(node.name().to_string()) {
            self.error(
                node,
                NepoInfo::error(MessageKey::VariableDeclaredTwice).with_param("name", node.name()),
            );
        }
    }

    fn visit_main_task(&mut self, node: &MainTask) {
        for declaration in node.variables() {
            self.visit_var_declaration(declaration);
        }
    }
}
