use core::fmt;
use std::{
    fmt::{Display, Formatter},
    rc::Rc,
};

use serde::{Deserialize, Serialize};

use crate::info::{NepoInfo, NepoInfos};

/// Visual layout metadata copied from the block editor.
#[derive(Clone, PartialEq, Eq, Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlockProperties {
    pub block_type: String,
    pub block_id: String,
    pub disabled: bool,
    pub collapsed: bool,
    pub inline: Option<bool>,
    pub deletable: bool,
    pub movable: bool,
    pub in_task: Option<bool>,
    pub shadow: bool,
}

impl BlockProperties {
    #[must_use]
    pub fn new(block_type: &str, block_id: &str) -> Self {
        Self {
            block_type: block_type.to_string(),
            block_id: block_id.to_string(),
            deletable: true,
            movable: true,
            ..Self::default()
        }
    }
}

/// A comment the user attached to a block.
#[derive(Clone, PartialEq, Eq, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BlocklyComment {
    pub text: String,
    pub pinned: bool,
    pub height: u32,
    pub width: u32,
}

impl BlocklyComment {
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }
}

/// Data every phrase carries besides its kind specific payload.
#[derive(Debug, Default)]
pub struct PhraseHeader {
    pub(crate) properties: Option<BlockProperties>,
    pub(crate) comment: Option<BlocklyComment>,
    pub(crate) infos: NepoInfos,
}

impl PhraseHeader {
    #[must_use]
    pub fn new(properties: Option<BlockProperties>, comment: Option<BlocklyComment>) -> Self {
        Self {
            properties,
            comment,
            infos: NepoInfos::default(),
        }
    }
}

/// Behaviour shared by every node of the program tree.
pub trait Node {
    fn header(&self) -> &PhraseHeader;

    fn kind(&self) -> PhraseKind;

    fn properties(&self) -> Option<&BlockProperties> {
        self.header().properties.as_ref()
    }

    fn comment(&self) -> Option<&BlocklyComment> {
        self.header().comment.as_ref()
    }

    fn infos(&self) -> &NepoInfos {
        &self.header().infos
    }

    /// Attaches a diagnostic. The only mutation a node accepts.
    fn add_info(&self, info: NepoInfo) {
        self.header().infos.add(info);
    }

    fn block_id(&self) -> Option<&str> {
        self.properties().map(|p| p.block_id.as_str())
    }
}

/// Enumerations with a closed set of values whose external form is a
/// `SCREAMING_SNAKE_CASE` string.
macro_rules! closed_enum {
    (
        $(#[$outer:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$arm_attr:meta])*
                $arm:ident => $text:literal,
            )+
        }
    ) => {
        $(#[$outer])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$arm_attr])*
                $arm,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[ $( $name::$arm, )+ ];

            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$arm => $text, )+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::errors::AstError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$arm), )+
                    other => Err($crate::errors::AstError::UnknownEnumValue {
                        enum_name: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

closed_enum! {
    /// Broad grouping of node kinds, used to validate child slots.
    pub enum Category {
        Expr => "EXPR",
        Sensor => "SENSOR",
        Actor => "ACTOR",
        Stmt => "STMT",
        Task => "TASK",
    }
}

closed_enum! {
    pub enum BrickLedColor {
        Green => "GREEN",
        Orange => "ORANGE",
        Red => "RED",
    }
}

closed_enum! {
    pub enum LightStatus {
        Off => "OFF",
        Reset => "RESET",
    }
}

closed_enum! {
    pub enum RepeatMode {
        Forever => "FOREVER",
        Times => "TIMES",
        While => "WHILE",
        Until => "UNTIL",
    }
}

closed_enum! {
    pub enum Flow {
        Break => "BREAK",
        Continue => "CONTINUE",
    }
}

closed_enum! {
    pub enum BinaryOp {
        Add => "ADD",
        Minus => "MINUS",
        Multiply => "MULTIPLY",
        Divide => "DIVIDE",
        Mod => "MOD",
        Eq => "EQ",
        Neq => "NEQ",
        Lt => "LT",
        Lte => "LTE",
        Gt => "GT",
        Gte => "GTE",
        And => "AND",
        Or => "OR",
    }
}

closed_enum! {
    pub enum UnaryOp {
        Neg => "NEG",
        Not => "NOT",
    }
}

closed_enum! {
    /// Value types a block program can declare.
    pub enum BlocklyType {
        Number => "NUMBER",
        Boolean => "BOOLEAN",
        String => "STRING",
        Void => "VOID",
    }
}

/// Generates the kind tag, the `Phrase` sum type and its double dispatch from
/// one table, so the three can never disagree.
macro_rules! phrases {
    (
        $(
            $(#[$arm_attr:meta])*
            $name:ident => $text:literal, $category:ident, $visit:ident;
        )+
    ) => {
        closed_enum! {
            /// Tag of every concrete node type.
            pub enum PhraseKind {
                $(
                    $(#[$arm_attr])*
                    $name => $text,
                )+
            }
        }

        impl PhraseKind {
            #[must_use]
            pub fn category(self) -> Category {
                match self {
                    $( PhraseKind::$name => Category::$category, )+
                }
            }
        }

        /// A node of the program tree.
        #[derive(Clone, Debug)]
        pub enum Phrase {
            $(
                $name(Rc<$name>),
            )+
        }

        impl Phrase {
            #[must_use]
            pub fn kind(&self) -> PhraseKind {
                match self {
                    $( Phrase::$name(_) => PhraseKind::$name, )+
                }
            }

            #[must_use]
            pub fn category(&self) -> Category {
                self.kind().category()
            }

            #[must_use]
            pub fn header(&self) -> &PhraseHeader {
                match self {
                    $( Phrase::$name(node) => node.header(), )+
                }
            }

            #[must_use]
            pub fn infos(&self) -> &NepoInfos {
                &self.header().infos
            }

            pub fn add_info(&self, info: NepoInfo) {
                self.header().infos.add(info);
            }

            #[must_use]
            pub fn block_id(&self) -> Option<&str> {
                self.header().properties.as_ref().map(|p| p.block_id.as_str())
            }

            /// Calls the one visitor method matching this node's kind and
            /// returns its result untouched.
            pub fn accept<V: $crate::visitor::PhraseVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
                match self {
                    $( Phrase::$name(node) => visitor.$visit(node), )+
                }
            }
        }

        $(
            impl From<$name> for Phrase {
                fn from(node: $name) -> Self {
                    Phrase::$name(Rc::new(node))
                }
            }

            impl From<Rc<$name>> for Phrase {
                fn from(node: Rc<$name>) -> Self {
                    Phrase::$name(node)
                }
            }

            impl Node for $name {
                fn header(&self) -> &PhraseHeader {
                    &self.header
                }

                fn kind(&self) -> PhraseKind {
                    PhraseKind::$name
                }
            }
        )+
    };
}

phrases! {
    NumConst => "NUM_CONST", Expr, visit_num_const;
    BoolConst => "BOOL_CONST", Expr, visit_bool_const;
    StringConst => "STRING_CONST", Expr, visit_string_const;
    Var => "VAR", Expr, visit_var;
    Binary => "BINARY", Expr, visit_binary;
    Unary => "UNARY", Expr, visit_unary;
    KeySensor => "KEY_SENSING", Sensor, visit_key_sensor;
    UltrasonicSensor => "ULTRASONIC_SENSING", Sensor, visit_ultrasonic_sensor;
    LightSensor => "LIGHT_SENSING", Sensor, visit_light_sensor;
    TemperatureSensor => "TEMPERATURE_SENSING", Sensor, visit_temperature_sensor;
    TimerSensor => "TIMER_SENSING", Sensor, visit_timer_sensor;
    LightAction => "LIGHT_ACTION", Actor, visit_light_action;
    LightStatusAction => "LIGHT_STATUS_ACTION", Actor, visit_light_status_action;
    ToneAction => "TONE_ACTION", Actor, visit_tone_action;
    MotorOnAction => "MOTOR_ON_ACTION", Actor, visit_motor_on_action;
    MotorStopAction => "MOTOR_STOP_ACTION", Actor, visit_motor_stop_action;
    ShowTextAction => "SHOW_TEXT_ACTION", Actor, visit_show_text_action;
    SerialWriteAction => "SERIAL_WRITE_ACTION", Actor, visit_serial_write_action;
    StmtList => "STMT_LIST", Stmt, visit_stmt_list;
    AssignStmt => "ASSIGN_STMT", Stmt, visit_assign_stmt;
    IfStmt => "IF_STMT", Stmt, visit_if_stmt;
    RepeatStmt => "REPEAT_STMT", Stmt, visit_repeat_stmt;
    StmtFlowCon => "FLOW_CONTROL", Stmt, visit_stmt_flow_con;
    WaitTimeStmt => "WAIT_TIME", Stmt, visit_wait_time_stmt;
    VarDeclaration => "VAR_DECLARATION", Task, visit_var_declaration;
    MainTask => "MAIN_TASK", Task, visit_main_task;
}

macro_rules! phrase_nodes {
    (
        $(
            $(#[$outer:meta])*
            pub struct $name:ident {
                $(
                    $field_name:ident : $field_ty:ty
                ),* $(,)?
            }
        )+
    ) => {
        $(
            $(#[$outer])*
            #[derive(Debug)]
            pub struct $name {
                pub(crate) header: PhraseHeader,
                $(
                    pub(crate) $field_name : $field_ty,
                )*
            }
        )+
    };
}

phrase_nodes! {

    pub struct NumConst {
        value: String,
    }

    pub struct BoolConst {
        value: bool,
    }

    pub struct StringConst {
        value: String,
    }

    /// Reference to a declared variable.
    pub struct Var {
        name: String,
        type_: BlocklyType,
    }

    pub struct Binary {
        op: BinaryOp,
        left: Phrase,
        right: Phrase,
    }

    pub struct Unary {
        op: UnaryOp,
        expression: Phrase,
    }

    pub struct KeySensor {
        port: String,
    }

    pub struct UltrasonicSensor {
        port: String,
    }

    pub struct LightSensor {
        port: String,
    }

    pub struct TemperatureSensor {
        port: String,
    }

    pub struct TimerSensor {
        timer: u8,
    }

    /// The `robActions_brickLight_on` block: turns the brick light on.
    pub struct LightAction {
        color: BrickLedColor,
        blink: bool,
    }

    pub struct LightStatusAction {
        status: LightStatus,
    }

    pub struct ToneAction {
        port: String,
        frequency: Phrase,
        duration: Phrase,
    }

    pub struct MotorOnAction {
        port: String,
        power: Phrase,
    }

    pub struct MotorStopAction {
        port: String,
    }

    pub struct ShowTextAction {
        port: String,
        text: Phrase,
    }

    pub struct SerialWriteAction {
        value: Phrase,
    }

    pub struct StmtList {
        statements: Vec<Phrase>,
    }

    pub struct AssignStmt {
        name: String,
        value: Phrase,
    }

    /// `if`/`else if` chain; `conditions[i]` guards `then_lists[i]`.
    pub struct IfStmt {
        conditions: Vec<Phrase>,
        then_lists: Vec<Rc<StmtList>>,
        else_list: Option<Rc<StmtList>>,
    }

    pub struct RepeatStmt {
        mode: RepeatMode,
        expression: Option<Phrase>,
        body: Rc<StmtList>,
    }

    pub struct StmtFlowCon {
        flow: Flow,
    }

    pub struct WaitTimeStmt {
        time: Phrase,
    }

    pub struct VarDeclaration {
        name: String,
        type_: BlocklyType,
        value: Phrase,
    }

    pub struct MainTask {
        variables: Vec<Rc<VarDeclaration>>,
    }
}

/// Root of a program: the main task with its declarations and the body that
/// runs after setup.
#[derive(Debug, Clone)]
pub struct ProgramAst {
    pub(crate) main_task: Rc<MainTask>,
    pub(crate) body: Rc<StmtList>,
}
