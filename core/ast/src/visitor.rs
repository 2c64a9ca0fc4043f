//! Double dispatch over the closed set of program node kinds.
//!
//! A visitor declares one method per [`PhraseKind`](crate::nodes::PhraseKind)
//! and no defaults, so adding a node kind breaks every visitor until it
//! handles the new kind. [`Phrase::accept`](crate::nodes::Phrase::accept)
//! makes exactly one call into the visitor and hands back its result.
//!
//! Traversal order is each visitor's business. Most visitors compute at the
//! current node and then recurse with `child.accept(self)`.

use crate::{
    configuration::{ConfigurationAst, ConfigurationComponent},
    nodes::{
        AssignStmt, Binary, BoolConst, IfStmt, KeySensor, LightAction, LightSensor,
        LightStatusAction, MainTask, MotorOnAction, MotorStopAction, NumConst, ProgramAst,
        RepeatStmt, SerialWriteAction, ShowTextAction, StmtFlowCon, StmtList, StringConst,
        TemperatureSensor, TimerSensor, ToneAction, UltrasonicSensor, Unary, Var, VarDeclaration,
        WaitTimeStmt,
    },
};

pub trait PhraseVisitor {
    type Output;

    fn visit_num_const(&mut self, node: &NumConst) -> Self::Output;
    fn visit_bool_const(&mut self, node: &BoolConst) -> Self::Output;
    fn visit_string_const(&mut self, node: &StringConst) -> Self::Output;
    fn visit_var(&mut self, node: &Var) -> Self::Output;
    fn visit_binary(&mut self, node: &Binary) -> Self::Output;
    fn visit_unary(&mut self, node: &Unary) -> Self::Output;

    fn visit_key_sensor(&mut self, node: &KeySensor) -> Self::Output;
    fn visit_ultrasonic_sensor(&mut self, node: &UltrasonicSensor) -> Self::Output;
    fn visit_light_sensor(&mut self, node: &LightSensor) -> Self::Output;
    fn visit_temperature_sensor(&mut self, node: &TemperatureSensor) -> Self::Output;
    fn visit_timer_sensor(&mut self, node: &TimerSensor) -> Self::Output;

    fn visit_light_action(&mut self, node: &LightAction) -> Self::Output;
    fn visit_light_status_action(&mut self, node: &LightStatusAction) -> Self::Output;
    fn visit_tone_action(&mut self, node: &ToneAction) -> Self::Output;
    fn visit_motor_on_action(&mut self, node: &MotorOnAction) -> Self::Output;
    fn visit_motor_stop_action(&mut self, node: &MotorStopAction) -> Self::Output;
    fn visit_show_text_action(&mut self, node: &ShowTextAction) -> Self::Output;
    fn visit_serial_write_action(&mut self, node: &SerialWriteAction) -> Self::Output;

    fn visit_stmt_list(&mut self, node: &StmtList) -> Self::Output;
    fn visit_assign_stmt(&mut self, node: &AssignStmt) -> Self::Output;
    fn visit_if_stmt(&mut self, node: &IfStmt) -> Self::Output;
    fn visit_repeat_stmt(&mut self, node: &RepeatStmt) -> Self::Output;
    fn visit_stmt_flow_con(&mut self, node: &StmtFlowCon) -> Self::Output;
    fn visit_wait_time_stmt(&mut self, node: &WaitTimeStmt) -> Self::Output;

    fn visit_var_declaration(&mut self, node: &VarDeclaration) -> Self::Output;
    fn visit_main_task(&mut self, node: &MainTask) -> Self::Output;
}

/// Visits the main task, then the body, returning both results.
pub fn walk_program<V: PhraseVisitor + ?Sized>(
    program: &ProgramAst,
    visitor: &mut V,
) -> (V::Output, V::Output) {
    let main_task = visitor.visit_main_task(program.main_task());
    let body = visitor.visit_stmt_list(program.body());
    (main_task, body)
}

/// Double dispatch over configuration components, one method per
/// [`ComponentType`](crate::configuration::ComponentType).
///
/// [`ConfigurationComponent::accept`] makes exactly one call. Platforms put
/// their component checks behind this trait.
pub trait ComponentVisitor {
    type Output;

    fn visit_key(&mut self, component: &ConfigurationComponent) -> Self::Output;
    fn visit_ultrasonic(&mut self, component: &ConfigurationComponent) -> Self::Output;
    fn visit_light(&mut self, component: &ConfigurationComponent) -> Self::Output;
    fn visit_temperature(&mut self, component: &ConfigurationComponent) -> Self::Output;
    fn visit_buzzer(&mut self, component: &ConfigurationComponent) -> Self::Output;
    fn visit_motor(&mut self, component: &ConfigurationComponent) -> Self::Output;
    fn visit_lcd(&mut self, component: &ConfigurationComponent) -> Self::Output;
    fn visit_led(&mut self, component: &ConfigurationComponent) -> Self::Output;
    fn visit_other(&mut self, component: &ConfigurationComponent, tag: &str) -> Self::Output;
}

/// Visits every component in definition order.
pub fn walk_configuration<V: ComponentVisitor + ?Sized>(
    configuration: &ConfigurationAst,
    visitor: &mut V,
) -> Vec<V::Output> {
    configuration
        .components()
        .iter()
        .map(|component| component.accept(visitor))
        .collect()
}
