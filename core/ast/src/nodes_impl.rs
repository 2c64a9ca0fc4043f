use std::{
    fmt::{self, Display, Formatter},
    rc::Rc,
};

use crate::errors::AstError;

use super::nodes::{
    AssignStmt, Binary, BinaryOp, BlockProperties, BlocklyComment, BlocklyType, BoolConst,
    BrickLedColor, Category, Flow, IfStmt, KeySensor, LightAction, LightSensor, LightStatus,
    LightStatusAction, MainTask, MotorOnAction, MotorStopAction, NumConst, Phrase, PhraseHeader,
    PhraseKind, ProgramAst, RepeatMode, RepeatStmt, SerialWriteAction, ShowTextAction, StmtFlowCon,
    StmtList, StringConst, TemperatureSensor, TimerSensor, ToneAction, UltrasonicSensor, Unary,
    UnaryOp, Var, VarDeclaration, WaitTimeStmt,
};

fn expect_expression(parent: PhraseKind, slot: &'static str, phrase: &Phrase) -> Result<(), AstError> {
    match phrase.category() {
        Category::Expr | Category::Sensor => Ok(()),
        found_category => Err(AstError::InvalidChild {
            parent,
            slot,
            expected: "an expression",
            found: phrase.kind(),
            found_category,
        }),
    }
}

fn expect_statement(parent: PhraseKind, slot: &'static str, phrase: &Phrase) -> Result<(), AstError> {
    match phrase.category() {
        Category::Stmt | Category::Actor => Ok(()),
        found_category => Err(AstError::InvalidChild {
            parent,
            slot,
            expected: "a statement",
            found: phrase.kind(),
            found_category,
        }),
    }
}

/// Names end up as identifiers in generated code, so they are restricted to
/// `[A-Za-z_][A-Za-z0-9_]*`.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn check_identifier(kind: PhraseKind, name: &str) -> Result<(), AstError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(AstError::InvalidIdentifier {
            kind,
            name: name.to_string(),
        })
    }
}

fn header(properties: Option<BlockProperties>, comment: Option<BlocklyComment>) -> PhraseHeader {
    PhraseHeader::new(properties, comment)
}

impl NumConst {
    /// # Errors
    ///
    /// Returns [`AstError::InvalidNumber`] unless `value` is a finite number.
    pub fn make(
        value: &str,
        properties: Option<BlockProperties>,
        comment: Option<BlocklyComment>,
    ) -> Result<Self, AstError> {
        let value = value.trim();
        match value.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(NumConst {
                header: header(properties, comment),
                value: value.to_string(),
            }),
            _ => Err(AstError::InvalidNumber {
                value: value.to_string(),
            }),
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Numeric value of the literal. Construction guarantees it parses.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.value.parse().unwrap_or_default()
    }
}

impl BoolConst {
    #[must_use]
    pub fn make(value: bool, properties: Option<BlockProperties>, comment: Option<BlocklyComment>) -> Self {
        BoolConst {
            header: header(properties, comment),
            value,
        }
    }

    #[must_use]
    pub fn value(&self) -> bool {
        self.value
    }
}

impl StringConst {
    #[must_use]
    pub fn make(value: &str, properties: Option<BlockProperties>, comment: Option<BlocklyComment>) -> Self {
        StringConst {
            header: header(properties, comment),
            value: value.to_string(),
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Var {
    /// # Errors
    ///
    /// Returns an error if `name` is not an identifier or `type_` is `VOID`.
    pub fn make(
        name: &str,
        type_: BlocklyType,
        properties: Option<BlockProperties>,
        comment: Option<BlocklyComment>,
    ) -> Result<Self, AstError> {
        check_identifier(PhraseKind::Var, name)?;
        if type_ == BlocklyType::Void {
            return Err(AstError::Malformed {
                kind: PhraseKind::Var,
                reason: format!("variable `{name}` cannot have type VOID"),
            });
        }
        Ok(Var {
            header: header(properties, comment),
            name: name.to_string(),
            type_,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn type_(&self) -> BlocklyType {
        self.type_
    }
}

impl Binary {
    /// # Errors
    ///
    /// Returns [`AstError::InvalidChild`] if an operand is not an expression.
    pub fn make(
        op: BinaryOp,
        left: Phrase,
        right: Phrase,
        properties: Option<BlockProperties>,
        comment: Option<BlocklyComment>,
    ) -> Result<Self, AstError> {
        expect_expression(PhraseKind::Binary, "left", &left)?;
        expect_expression(PhraseKind::Binary, "right", &right)?;
        Ok(Binary {
            header: header(properties, comment),
            op,
            left,
            right,
        })
    }

    #[must_use]
    pub fn op(&self) -> BinaryOp {
        self.op
    }

    #[must_use]
    pub fn left(&self) -> &Phrase {
        &self.left
    }

    #[must_use]
    pub fn right(&self) -> &Phrase {
        &self.right
    }
}

impl Unary {
    /// # Errors
    ///
    /// Returns [`AstError::InvalidChild`] if the operand is not an expression.
    pub fn make(
        op: UnaryOp,
        expression: Phrase,
        properties: Option<BlockProperties>,
        comment: Option<BlocklyComment>,
    ) -> Result<Self, AstError> {
        expect_expression(PhraseKind::Unary, "expression", &expression)?;
        Ok(Unary {
            header: header(properties, comment),
            op,
            expression,
        })
    }

    #[must_use]
    pub fn op(&self) -> UnaryOp {
        self.op
    }

    #[must_use]
    pub fn expression(&self) -> &Phrase {
        &self.expression
    }
}

macro_rules! port_sensor_impl {
    ( $( $name:ident ),+ ) => {
        $(
            impl $name {
                /// # Errors
                ///
                /// Returns [`AstError::InvalidIdentifier`] if `port` is not a
                /// valid component name.
                pub fn make(
                    port: &str,
                    properties: Option<BlockProperties>,
                    comment: Option<BlocklyComment>,
                ) -> Result<Self, AstError> {
                    check_identifier(PhraseKind::$name, port)?;
                    Ok($name {
                        header: header(properties, comment),
                        port: port.to_string(),
                    })
                }

                /// Name of the configuration component this block reads.
                #[must_use]
                pub fn port(&self) -> &str {
                    &self.port
                }
            }
        )+
    };
}

port_sensor_impl!(KeySensor, UltrasonicSensor, LightSensor, TemperatureSensor);

impl TimerSensor {
    /// # Errors
    ///
    /// Returns [`AstError::Malformed`] for timer `0`; timers are numbered from 1.
    pub fn make(
        timer: u8,
        properties: Option<BlockProperties>,
        comment: Option<BlocklyComment>,
    ) -> Result<Self, AstError> {
        if timer == 0 {
            return Err(AstError::Malformed {
                kind: PhraseKind::TimerSensor,
                reason: "timers are numbered from 1".to_string(),
            });
        }
        Ok(TimerSensor {
            header: header(properties, comment),
            timer,
        })
    }

    #[must_use]
    pub fn timer(&self) -> u8 {
        self.timer
    }
}

impl LightAction {
    /// Creates a read only light action.
    #[must_use]
    pub fn make(
        color: BrickLedColor,
        blink: bool,
        properties: Option<BlockProperties>,
        comment: Option<BlocklyComment>,
    ) -> Self {
        LightAction {
            header: header(properties, comment),
            color,
            blink,
        }
    }

    #[must_use]
    pub fn color(&self) -> BrickLedColor {
        self.color
    }

    #[must_use]
    pub fn is_blink(&self) -> bool {
        self.blink
    }

    #[must_use]
    pub fn is_blinking_on_off(&self) -> &'static str {
        if self.blink { "ON" } else { "OFF" }
    }
}

impl Display for LightAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "LightAction [{}, {}]", self.color, self.blink)
    }
}

impl LightStatusAction {
    #[must_use]
    pub fn make(
        status: LightStatus,
        properties: Option<BlockProperties>,
        comment: Option<BlocklyComment>,
    ) -> Self {
        LightStatusAction {
            header: header(properties, comment),
            status,
        }
    }

    #[must_use]
    pub fn status(&self) -> LightStatus {
        self.status
    }
}

impl ToneAction {
    /// # Errors
    ///
    /// Returns an error if `port` is not a component name or either argument
    /// is not an expression.
    pub fn make(
        port: &str,
        frequency: Phrase,
        duration: Phrase,
        properties: Option<BlockProperties>,
        comment: Option<BlocklyComment>,
    ) -> Result<Self, AstError> {
        check_identifier(PhraseKind::ToneAction, port)?;
        expect_expression(PhraseKind::ToneAction, "frequency", &frequency)?;
        expect_expression(PhraseKind::ToneAction, "duration", &duration)?;
        Ok(ToneAction {
            header: header(properties, comment),
            port: port.to_string(),
            frequency,
            duration,
        })
    }

    #[must_use]
    pub fn port(&self) -> &str {
        &self.port
    }

    #[must_use]
    pub fn frequency(&self) -> &Phrase {
        &self.frequency
    }

    #[must_use]
    pub fn duration(&self) -> &Phrase {
        &self.duration
    }
}

impl MotorOnAction {
    /// # Errors
    ///
    /// Returns an error if `port` is not a component name or `power` is not
    /// an expression.
    pub fn make(
        port: &str,
        power: Phrase,
        properties: Option<BlockProperties>,
        comment: Option<BlocklyComment>,
    ) -> Result<Self, AstError> {
        check_identifier(PhraseKind::MotorOnAction, port)?;
        expect_expression(PhraseKind::MotorOnAction, "power", &power)?;
        Ok(MotorOnAction {
            header: header(properties, comment),
            port: port.to_string(),
            power,
        })
    }

    #[must_use]
    pub fn port(&self) -> &str {
        &self.port
    }

    #[must_use]
    pub fn power(&self) -> &Phrase {
        &self.power
    }
}

impl MotorStopAction {
    /// # Errors
    ///
    /// Returns [`AstError::InvalidIdentifier`] if `port` is not a component name.
    pub fn make(
        port: &str,
        properties: Option<BlockProperties>,
        comment: Option<BlocklyComment>,
    ) -> Result<Self, AstError> {
        check_identifier(PhraseKind::MotorStopAction, port)?;
        Ok(MotorStopAction {
            header: header(properties, comment),
            port: port.to_string(),
        })
    }

    #[must_use]
    pub fn port(&self) -> &str {
        &self.port
    }
}

impl ShowTextAction {
    /// # Errors
    ///
    /// Returns an error if `port` is not a component name or `text` is not an
    /// expression.
    pub fn make(
        port: &str,
        text: Phrase,
        properties: Option<BlockProperties>,
        comment: Option<BlocklyComment>,
    ) -> Result<Self, AstError> {
        check_identifier(PhraseKind::ShowTextAction, port)?;
        expect_expression(PhraseKind::ShowTextAction, "text", &text)?;
        Ok(ShowTextAction {
            header: header(properties, comment),
            port: port.to_string(),
            text,
        })
    }

    #[must_use]
    pub fn port(&self) -> &str {
        &self.port
    }

    #[must_use]
    pub fn text(&self) -> &Phrase {
        &self.text
    }
}

impl SerialWriteAction {
    /// # Errors
    ///
    /// Returns [`AstError::InvalidChild`] if `value` is not an expression.
    pub fn make(
        value: Phrase,
        properties: Option<BlockProperties>,
        comment: Option<BlocklyComment>,
    ) -> Result<Self, AstError> {
        expect_expression(PhraseKind::SerialWriteAction, "value", &value)?;
        Ok(SerialWriteAction {
            header: header(properties, comment),
            value,
        })
    }

    #[must_use]
    pub fn value(&self) -> &Phrase {
        &self.value
    }
}

impl StmtList {
    /// # Errors
    ///
    /// Returns [`AstError::InvalidChild`] if an element is not a statement or
    /// an action.
    pub fn make(
        statements: Vec<Phrase>,
        properties: Option<BlockProperties>,
        comment: Option<BlocklyComment>,
    ) -> Result<Self, AstError> {
        for statement in &statements {
            expect_statement(PhraseKind::StmtList, "statements", statement)?;
        }
        Ok(StmtList {
            header: header(properties, comment),
            statements,
        })
    }

    #[must_use]
    pub fn empty() -> Self {
        StmtList {
            header: PhraseHeader::default(),
            statements: Vec::new(),
        }
    }

    #[must_use]
    pub fn statements(&self) -> &[Phrase] {
        &self.statements
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl AssignStmt {
    /// # Errors
    ///
    /// Returns an error if `name` is not an identifier or `value` is not an
    /// expression.
    pub fn make(
        name: &str,
        value: Phrase,
        properties: Option<BlockProperties>,
        comment: Option<BlocklyComment>,
    ) -> Result<Self, AstError> {
        check_identifier(PhraseKind::AssignStmt, name)?;
        expect_expression(PhraseKind::AssignStmt, "value", &value)?;
        Ok(AssignStmt {
            header: header(properties, comment),
            name: name.to_string(),
            value,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> &Phrase {
        &self.value
    }
}

impl IfStmt {
    /// # Errors
    ///
    /// Returns [`AstError::Malformed`] unless there is at least one condition
    /// and exactly one then-list per condition, and [`AstError::InvalidChild`]
    /// if a condition is not an expression.
    pub fn make(
        conditions: Vec<Phrase>,
        then_lists: Vec<Rc<StmtList>>,
        else_list: Option<Rc<StmtList>>,
        properties: Option<BlockProperties>,
        comment: Option<BlocklyComment>,
    ) -> Result<Self, AstError> {
        if conditions.is_empty() || conditions.len() != then_lists.len() {
            return Err(AstError::Malformed {
                kind: PhraseKind::IfStmt,
                reason: format!(
                    "{} condition(s) for {} then-list(s)",
                    conditions.len(),
                    then_lists.len()
                ),
            });
        }
        for condition in &conditions {
            expect_expression(PhraseKind::IfStmt, "conditions", condition)?;
        }
        Ok(IfStmt {
            header: header(properties, comment),
            conditions,
            then_lists,
            else_list,
        })
    }

    #[must_use]
    pub fn conditions(&self) -> &[Phrase] {
        &self.conditions
    }

    #[must_use]
    pub fn then_lists(&self) -> &[Rc<StmtList>] {
        &self.then_lists
    }

    #[must_use]
    pub fn else_list(&self) -> Option<&Rc<StmtList>> {
        self.else_list.as_ref()
    }

    /// Condition and then-list pairs in evaluation order.
    pub fn arms(&self) -> impl Iterator<Item = (&Phrase, &Rc<StmtList>)> {
        self.conditions.iter().zip(self.then_lists.iter())
    }
}

impl RepeatStmt {
    /// # Errors
    ///
    /// Returns [`AstError::Malformed`] if `FOREVER` carries an expression or
    /// any other mode lacks one, and [`AstError::InvalidChild`] if the
    /// expression is not an expression.
    pub fn make(
        mode: RepeatMode,
        expression: Option<Phrase>,
        body: Rc<StmtList>,
        properties: Option<BlockProperties>,
        comment: Option<BlocklyComment>,
    ) -> Result<Self, AstError> {
        match (&mode, &expression) {
            (RepeatMode::Forever, Some(_)) => {
                return Err(AstError::Malformed {
                    kind: PhraseKind::RepeatStmt,
                    reason: "FOREVER takes no expression".to_string(),
                });
            }
            (RepeatMode::Times | RepeatMode::While | RepeatMode::Until, None) => {
                return Err(AstError::Malformed {
                    kind: PhraseKind::RepeatStmt,
                    reason: format!("{mode} requires an expression"),
                });
            }
            (_, Some(expression)) => {
                expect_expression(PhraseKind::RepeatStmt, "expression", expression)?;
            }
            (RepeatMode::Forever, None) => {}
        }
        Ok(RepeatStmt {
            header: header(properties, comment),
            mode,
            expression,
            body,
        })
    }

    #[must_use]
    pub fn mode(&self) -> RepeatMode {
        self.mode
    }

    #[must_use]
    pub fn expression(&self) -> Option<&Phrase> {
        self.expression.as_ref()
    }

    #[must_use]
    pub fn body(&self) -> &Rc<StmtList> {
        &self.body
    }
}

impl StmtFlowCon {
    #[must_use]
    pub fn make(flow: Flow, properties: Option<BlockProperties>, comment: Option<BlocklyComment>) -> Self {
        StmtFlowCon {
            header: header(properties, comment),
            flow,
        }
    }

    #[must_use]
    pub fn flow(&self) -> Flow {
        self.flow
    }
}

impl WaitTimeStmt {
    /// # Errors
    ///
    /// Returns [`AstError::InvalidChild`] if `time` is not an expression.
    pub fn make(
        time: Phrase,
        properties: Option<BlockProperties>,
        comment: Option<BlocklyComment>,
    ) -> Result<Self, AstError> {
        expect_expression(PhraseKind::WaitTimeStmt, "time", &time)?;
        Ok(WaitTimeStmt {
            header: header(properties, comment),
            time,
        })
    }

    #[must_use]
    pub fn time(&self) -> &Phrase {
        &self.time
    }
}

impl VarDeclaration {
    /// # Errors
    ///
    /// Returns an error if `name` is not an identifier, `type_` is `VOID`, or
    /// `value` is not an expression.
    pub fn make(
        name: &str,
        type_: BlocklyType,
        value: Phrase,
        properties: Option<BlockProperties>,
        comment: Option<BlocklyComment>,
    ) -> Result<Self, AstError> {
        check_identifier(PhraseKind::VarDeclaration, name)?;
        if type_ == BlocklyType::Void {
            return Err(AstError::Malformed {
                kind: PhraseKind::VarDeclaration,
                reason: format!("variable `{name}` cannot have type VOID"),
            });
        }
        expect_expression(PhraseKind::VarDeclaration, "value", &value)?;
        Ok(VarDeclaration {
            header: header(properties, comment),
            name: name.to_string(),
            type_,
            value,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn type_(&self) -> BlocklyType {
        self.type_
    }

    #[must_use]
    pub fn value(&self) -> &Phrase {
        &self.value
    }
}

impl MainTask {
    #[must_use]
    pub fn make(
        variables: Vec<Rc<VarDeclaration>>,
        properties: Option<BlockProperties>,
        comment: Option<BlocklyComment>,
    ) -> Self {
        MainTask {
            header: header(properties, comment),
            variables,
        }
    }

    #[must_use]
    pub fn variables(&self) -> &[Rc<VarDeclaration>] {
        &self.variables
    }
}

impl ProgramAst {
    #[must_use]
    pub fn new(main_task: Rc<MainTask>, body: Rc<StmtList>) -> Self {
        ProgramAst { main_task, body }
    }

    #[must_use]
    pub fn main_task(&self) -> &Rc<MainTask> {
        &self.main_task
    }

    #[must_use]
    pub fn body(&self) -> &Rc<StmtList> {
        &self.body
    }

    /// The two top level phrases in traversal order.
    #[must_use]
    pub fn phrases(&self) -> [Phrase; 2] {
        [
            Phrase::MainTask(self.main_task.clone()),
            Phrase::StmtList(self.body.clone()),
        ]
    }
}

impl Display for Phrase {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Phrase::NumConst(n) => write!(f, "NumConst [{}]", n.value),
            Phrase::BoolConst(b) => write!(f, "BoolConst [{}]", b.value),
            Phrase::StringConst(s) => write!(f, "StringConst [{}]", s.value),
            Phrase::Var(v) => write!(f, "Var [{}]", v.name),
            Phrase::LightAction(action) => write!(f, "{action}"),
            other => write!(f, "{}", other.kind()),
        }
    }
}
