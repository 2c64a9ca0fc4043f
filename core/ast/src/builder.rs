//! Builds validated trees from the block parser's interchange form.
//!
//! The block markup parser is an external collaborator. It hands over the
//! program and configuration as plain data (the `Raw*` types below, usually
//! deserialized from JSON). Everything goes through the node factories here,
//! so malformed input fails with an [`AstError`] before any tree exists.

use std::{fmt, rc::Rc, str::FromStr};

use serde::{
    Deserialize, Deserializer,
    de::{MapAccess, Visitor},
};

use crate::{
    configuration::{ComponentType, ConfigurationAst, ConfigurationComponent},
    errors::AstError,
    nodes::{
        AssignStmt, Binary, BlockProperties, BlocklyComment, BoolConst, IfStmt, KeySensor,
        LightAction, LightSensor, LightStatusAction, MainTask, MotorOnAction, MotorStopAction,
        NumConst, Phrase, ProgramAst, RepeatStmt, SerialWriteAction, ShowTextAction, StmtFlowCon,
        StmtList, StringConst, TemperatureSensor, TimerSensor, ToneAction, UltrasonicSensor, Unary,
        Var, VarDeclaration, WaitTimeStmt,
    },
};

/// One block: optional editor metadata plus the kind specific payload.
#[derive(Debug, Deserialize)]
pub struct RawBlock {
    #[serde(default)]
    pub properties: Option<BlockProperties>,
    #[serde(default)]
    pub comment: Option<BlocklyComment>,
    #[serde(flatten)]
    pub phrase: RawPhrase,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RawPhrase {
    NumConst {
        value: String,
    },
    BoolConst {
        value: bool,
    },
    StringConst {
        value: String,
    },
    Var {
        name: String,
        #[serde(rename = "type")]
        type_: Option<String>,
    },
    Binary {
        op: Option<String>,
        left: Box<RawBlock>,
        right: Box<RawBlock>,
    },
    Unary {
        op: Option<String>,
        expression: Box<RawBlock>,
    },
    KeySensing {
        port: String,
    },
    UltrasonicSensing {
        port: String,
    },
    LightSensing {
        port: String,
    },
    TemperatureSensing {
        port: String,
    },
    TimerSensing {
        #[serde(default = "first_timer")]
        timer: u8,
    },
    LightAction {
        color: Option<String>,
        #[serde(default)]
        blink: bool,
    },
    LightStatusAction {
        status: Option<String>,
    },
    ToneAction {
        port: String,
        frequency: Box<RawBlock>,
        duration: Box<RawBlock>,
    },
    MotorOnAction {
        port: String,
        power: Box<RawBlock>,
    },
    MotorStopAction {
        port: String,
    },
    ShowTextAction {
        port: String,
        text: Box<RawBlock>,
    },
    SerialWriteAction {
        value: Box<RawBlock>,
    },
    StmtList {
        #[serde(default)]
        statements: Vec<RawBlock>,
    },
    AssignStmt {
        name: String,
        value: Box<RawBlock>,
    },
    IfStmt {
        conditions: Vec<RawBlock>,
        then_lists: Vec<Vec<RawBlock>>,
        #[serde(default)]
        else_list: Option<Vec<RawBlock>>,
    },
    RepeatStmt {
        mode: Option<String>,
        #[serde(default)]
        expression: Option<Box<RawBlock>>,
        #[serde(default)]
        body: Vec<RawBlock>,
    },
    FlowControl {
        flow: Option<String>,
    },
    WaitTime {
        time: Box<RawBlock>,
    },
}

fn first_timer() -> u8 {
    1
}

#[derive(Debug, Deserialize)]
pub struct RawVariable {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub value: Box<RawBlock>,
    #[serde(default)]
    pub properties: Option<BlockProperties>,
    #[serde(default)]
    pub comment: Option<BlocklyComment>,
}

#[derive(Debug, Deserialize)]
pub struct RawProgram {
    #[serde(default)]
    pub variables: Vec<RawVariable>,
    #[serde(default)]
    pub body: Vec<RawBlock>,
}

#[derive(Debug, Deserialize)]
pub struct RawComponent {
    pub name: String,
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(default, deserialize_with = "ordered_ports")]
    pub ports: Vec<(String, String)>,
    #[serde(default)]
    pub properties: Option<BlockProperties>,
}

#[derive(Debug, Deserialize)]
pub struct RawConfiguration {
    #[serde(default)]
    pub robot: String,
    #[serde(default)]
    pub components: Vec<RawComponent>,
}

/// Reads a `{role: pin}` map keeping document order, which the pin conflict
/// check depends on.
fn ordered_ports<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PortsVisitor;

    impl<'de> Visitor<'de> for PortsVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map from port role to pin")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut ports = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((role, pin)) = map.next_entry::<String, String>()? {
                ports.push((role, pin));
            }
            Ok(ports)
        }
    }

    deserializer.deserialize_map(PortsVisitor)
}

fn required<T>(value: Option<&str>, kind: &'static str, field: &'static str) -> Result<T, AstError>
where
    T: FromStr<Err = AstError>,
{
    value
        .ok_or(AstError::MissingField { kind, field })?
        .parse()
}

/// Builds a validated program tree.
///
/// # Errors
///
/// Returns the first [`AstError`] raised by a node factory.
pub fn build_program(raw: &RawProgram) -> Result<ProgramAst, AstError> {
    let mut variables = Vec::with_capacity(raw.variables.len());
    for variable in &raw.variables {
        let type_ = required(variable.type_.as_deref(), "VAR_DECLARATION", "type")?;
        let value = build_phrase(&variable.value)?;
        variables.push(Rc::new(VarDeclaration::make(
            &variable.name,
            type_,
            value,
            variable.properties.clone(),
            variable.comment.clone(),
        )?));
    }
    let main_task = Rc::new(MainTask::make(variables, None, None));
    let body = Rc::new(build_list(&raw.body)?);
    Ok(ProgramAst::new(main_task, body))
}

/// Builds a validated configuration tree.
///
/// # Errors
///
/// Returns an [`AstError`] for bad component names, duplicate names, or
/// duplicate port roles.
pub fn build_configuration(raw: &RawConfiguration) -> Result<ConfigurationAst, AstError> {
    let components = raw
        .components
        .iter()
        .map(|component| {
            ConfigurationComponent::make(
                ComponentType::parse(&component.component_type),
                &component.name,
                component.ports.clone(),
                component.properties.clone(),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    ConfigurationAst::make(&raw.robot, components)
}

fn build_list(blocks: &[RawBlock]) -> Result<StmtList, AstError> {
    let statements = blocks
        .iter()
        .map(build_phrase)
        .collect::<Result<Vec<_>, _>>()?;
    StmtList::make(statements, None, None)
}

/// Builds one phrase and all of its children.
///
/// # Errors
///
/// Returns the first [`AstError`] raised by a node factory.
#[allow(clippy::too_many_lines)]
pub fn build_phrase(block: &RawBlock) -> Result<Phrase, AstError> {
    let properties = block.properties.clone();
    let comment = block.comment.clone();
    let phrase = match &block.phrase {
        RawPhrase::NumConst { value } => NumConst::make(value, properties, comment)?.into(),
        RawPhrase::BoolConst { value } => BoolConst::make(*value, properties, comment).into(),
        RawPhrase::StringConst { value } => StringConst::make(value, properties, comment).into(),
        RawPhrase::Var { name, type_ } => {
            let type_ = required(type_.as_deref(), "VAR", "type")?;
            Var::make(name, type_, properties, comment)?.into()
        }
        RawPhrase::Binary { op, left, right } => {
            let op = required(op.as_deref(), "BINARY", "op")?;
            Binary::make(op, build_phrase(left)?, build_phrase(right)?, properties, comment)?
                .into()
        }
        RawPhrase::Unary { op, expression } => {
            let op = required(op.as_deref(), "UNARY", "op")?;
            Unary::make(op, build_phrase(expression)?, properties, comment)?.into()
        }
        RawPhrase::KeySensing { port } => KeySensor::make(port, properties, comment)?.into(),
        RawPhrase::UltrasonicSensing { port } => {
            UltrasonicSensor::make(port, properties, comment)?.into()
        }
        RawPhrase::LightSensing { port } => LightSensor::make(port, properties, comment)?.into(),
        RawPhrase::TemperatureSensing { port } => {
            TemperatureSensor::make(port, properties, comment)?.into()
        }
        RawPhrase::TimerSensing { timer } => TimerSensor::make(*timer, properties, comment)?.into(),
        RawPhrase::LightAction { color, blink } => {
            let color = required(color.as_deref(), "LIGHT_ACTION", "color")?;
            LightAction::make(color, *blink, properties, comment).into()
        }
        RawPhrase::LightStatusAction { status } => {
            let status = required(status.as_deref(), "LIGHT_STATUS_ACTION", "status")?;
            LightStatusAction::make(status, properties, comment).into()
        }
        RawPhrase::ToneAction {
            port,
            frequency,
            duration,
        } => ToneAction::make(
            port,
            build_phrase(frequency)?,
            build_phrase(duration)?,
            properties,
            comment,
        )?
        .into(),
        RawPhrase::MotorOnAction { port, power } => {
            MotorOnAction::make(port, build_phrase(power)?, properties, comment)?.into()
        }
        RawPhrase::MotorStopAction { port } => {
            MotorStopAction::make(port, properties, comment)?.into()
        }
        RawPhrase::ShowTextAction { port, text } => {
            ShowTextAction::make(port, build_phrase(text)?, properties, comment)?.into()
        }
        RawPhrase::SerialWriteAction { value } => {
            SerialWriteAction::make(build_phrase(value)?, properties, comment)?.into()
        }
        RawPhrase::StmtList { statements } => {
            let statements = statements
                .iter()
                .map(build_phrase)
                .collect::<Result<Vec<_>, _>>()?;
            StmtList::make(statements, properties, comment)?.into()
        }
        RawPhrase::AssignStmt { name, value } => {
            AssignStmt::make(name, build_phrase(value)?, properties, comment)?.into()
        }
        RawPhrase::IfStmt {
            conditions,
            then_lists,
            else_list,
        } => {
            let conditions = conditions
                .iter()
                .map(build_phrase)
                .collect::<Result<Vec<_>, _>>()?;
            let then_lists = then_lists
                .iter()
                .map(|list| build_list(list).map(Rc::new))
                .collect::<Result<Vec<_>, _>>()?;
            let else_list = else_list
                .as_deref()
                .map(|list| build_list(list).map(Rc::new))
                .transpose()?;
            IfStmt::make(conditions, then_lists, else_list, properties, comment)?.into()
        }
        RawPhrase::RepeatStmt {
            mode,
            expression,
            body,
        } => {
            let mode = required(mode.as_deref(), "REPEAT_STMT", "mode")?;
            let expression = expression.as_deref().map(build_phrase).transpose()?;
            let body = Rc::new(build_list(body)?);
            RepeatStmt::make(mode, expression, body, properties, comment)?.into()
        }
        RawPhrase::FlowControl { flow } => {
            let flow = required(flow.as_deref(), "FLOW_CONTROL", "flow")?;
            StmtFlowCon::make(flow, properties, comment).into()
        }
        RawPhrase::WaitTime { time } => {
            WaitTimeStmt::make(build_phrase(time)?, properties, comment)?.into()
        }
    };
    Ok(phrase)
}
