//! The outcome of one compilation request.

use std::fmt::{self, Display, Formatter};

use nepo_ast::{
    configuration::ConfigurationAst,
    info::NepoInfo,
    nodes::{
        AssignStmt, Binary, BoolConst, IfStmt, KeySensor, LightAction, LightSensor,
        LightStatusAction, MainTask, MotorOnAction, MotorStopAction, Node, NumConst, PhraseKind,
        ProgramAst, RepeatStmt, SerialWriteAction, ShowTextAction, StmtFlowCon, StmtList,
        StringConst, TemperatureSensor, TimerSensor, ToneAction, UltrasonicSensor, Unary, Var,
        VarDeclaration, WaitTimeStmt,
    },
    visitor::{PhraseVisitor, walk_program},
};
use serde::Serialize;

use crate::{project::Project, result::ProjectResult};

/// Where a diagnostic was attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum Origin {
    Block {
        kind: PhraseKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        block_id: Option<String>,
    },
    Component {
        name: String,
    },
}

impl Display for Origin {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Block {
                kind,
                block_id: Some(id),
            } => write!(f, "{kind} block {id}"),
            Origin::Block {
                kind,
                block_id: None,
            } => write!(f, "{kind} block"),
            Origin::Component { name } => write!(f, "component {name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    #[serde(flatten)]
    pub origin: Origin,
    #[serde(flatten)]
    pub info: NepoInfo,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.origin, self.info)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilationReport {
    pub result: ProjectResult,
    pub error_count: usize,
    pub diagnostics: Vec<Diagnostic>,
    /// Generated sketch, present only after a successful code generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Message of the worker error that aborted the workflow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_error: Option<String>,
}

impl CompilationReport {
    /// Collects every diagnostic attached during the run: configuration
    /// components first in definition order, then program nodes in tree
    /// order.
    #[must_use]
    pub fn from_project(project: &Project, workflow_error: Option<String>) -> Self {
        let mut diagnostics = component_diagnostics(project.configuration());
        let mut collector = DiagnosticCollector::default();
        walk_program(project.program(), &mut collector);
        diagnostics.extend(collector.diagnostics);
        Self {
            result: project.result(),
            error_count: project.error_count(),
            diagnostics,
            source: project.source().map(str::to_string),
            workflow_error,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }
}

impl Display for CompilationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.diagnostics {
            writeln!(f, "{diagnostic}")?;
        }
        if let Some(err) = &self.workflow_error {
            writeln!(f, "workflow error: {err}")?;
        }
        write!(f, "{} ({} errors)", self.result, self.error_count)
    }
}

fn component_diagnostics(configuration: &ConfigurationAst) -> Vec<Diagnostic> {
    configuration
        .components()
        .iter()
        .flat_map(|component| {
            component.infos().to_vec().into_iter().map(|info| Diagnostic {
                origin: Origin::Component {
                    name: component.name().to_string(),
                },
                info,
            })
        })
        .collect()
}

#[derive(Default)]
struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    fn record(&mut self, node: &dyn Node) {
        for info in node.infos().to_vec() {
            self.diagnostics.push(Diagnostic {
                origin: Origin::Block {
                    kind: node.kind(),
                    block_id: node.block_id().map(str::to_string),
                },
                info,
            });
        }
    }

    fn record_list(&mut self, list: &StmtList) {
        self.record(list);
        for statement in list.statements() {
            statement.accept(self);
        }
    }
}

impl PhraseVisitor for DiagnosticCollector {
    type Output = ();

    fn visit_num_const(&mut self, node: &NumConst) {
        self.record(node);
    }

    fn visit_bool_const(&mut self, node: &BoolConst) {
        self.record(node);
    }

    fn visit_string_const(&mut self, node: &StringConst) {
        self.record(node);
    }

    fn visit_var(&mut self, node: &Var) {
        self.record(node);
    }

    fn visit_binary(&mut self, node: &Binary) {
        self.record(node);
        node.left().accept(self);
        node.right().accept(self);
    }

    fn visit_unary(&mut self, node: &Unary) {
        self.record(node);
        node.expression().accept(self);
    }

    fn visit_key_sensor(&mut self, node: &KeySensor) {
        self.record(node);
    }

    fn visit_ultrasonic_sensor(&mut self, node: &UltrasonicSensor) {
        self.record(node);
    }

    fn visit_light_sensor(&mut self, node: &LightSensor) {
        self.record(node);
    }

    fn visit_temperature_sensor(&mut self, node: &TemperatureSensor) {
        self.record(node);
    }

    fn visit_timer_sensor(&mut self, node: &TimerSensor) {
        self.record(node);
    }

    fn visit_light_action(&mut self, node: &LightAction) {
        self.record(node);
    }

    fn visit_light_status_action(&mut self, node: &LightStatusAction) {
        self.record(node);
    }

    fn visit_tone_action(&mut self, node: &ToneAction) {
        self.record(node);
        node.frequency().accept(self);
        node.duration().accept(self);
    }

    fn visit_motor_on_action(&mut self, node: &MotorOnAction) {
        self.record(node);
        node.power().accept(self);
    }

    fn visit_motor_stop_action(&mut self, node: &MotorStopAction) {
        self.record(node);
    }

    fn visit_show_text_action(&mut self, node: &ShowTextAction) {
        self.record(node);
        node.text().accept(self);
    }

    fn visit_serial_write_action(&mut self, node: &SerialWriteAction) {
        self.record(node);
        node.value().accept(self);
    }

    fn visit_stmt_list(&mut self, node: &StmtList) {
        self.record_list(node);
    }

    fn visit_assign_stmt(&mut self, node: &AssignStmt) {
        self.record(node);
        node.value().accept(self);
    }

    fn visit_if_stmt(&mut self, node: &IfStmt) {
        self.record(node);
        for (condition, then_list) in node.arms() {
            condition.accept(self);
            self.record_list(then_list);
        }
        if let Some(else_list) = node.else_list() {
            self.record_list(else_list);
        }
    }

    fn visit_repeat_stmt(&mut self, node: &RepeatStmt) {
        self.record(node);
        if let Some(expression) = node.expression() {
            expression.accept(self);
        }
        self.record_list(node.body());
    }

    fn visit_stmt_flow_con(&mut self, node: &StmtFlowCon) {
        self.record(node);
    }

    fn visit_wait_time_stmt(&mut self, node: &WaitTimeStmt) {
        self.record(node);
        node.time().accept(self);
    }

    fn visit_var_declaration(&mut self, node: &VarDeclaration) {
        self.record(node);
        node.value().accept(self);
    }

    fn visit_main_task(&mut self, node: &MainTask) {
        self.record(node);
        for declaration in node.variables() {
            self.visit_var_declaration(declaration);
        }
    }
}

/// Collects the diagnostics of a program tree alone.
#[must_use]
pub fn program_diagnostics(program: &ProgramAst) -> Vec<Diagnostic> {
    let mut collector = DiagnosticCollector::default();
    walk_program(program, &mut collector);
    collector.diagnostics
}
