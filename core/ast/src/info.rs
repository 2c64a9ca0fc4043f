//! Diagnostics attached to program nodes and configuration components.
//!
//! A [`NepoInfo`] never carries free text. It names a stable [`MessageKey`]
//! that the caller localizes, plus ordered parameters for the placeholders of
//! that message.

use std::{
    cell::{Ref, RefCell},
    fmt::{self, Display, Formatter},
};

use serde::Serialize;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

macro_rules! message_keys {
    (
        $(
            $(#[$attr:meta])*
            $variant:ident => $key:literal,
        )+
    ) => {
        /// Stable identifiers of every diagnostic the compiler can emit.
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        pub enum MessageKey {
            $(
                $(#[$attr])*
                $variant,
            )+
        }

        impl MessageKey {
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $( MessageKey::$variant => $key, )+
                }
            }
        }
    };
}

message_keys! {
    /// A pin of an exclusive port role is claimed twice.
    ConfigurationErrorOverlappingPorts => "CONFIGURATION_ERROR_OVERLAPPING_PORTS",
    /// A component lacks a port role its type requires.
    ConfigurationErrorMissingPort => "CONFIGURATION_ERROR_MISSING_PORT",
    ConfigurationErrorSensorMissing => "CONFIGURATION_ERROR_SENSOR_MISSING",
    ConfigurationErrorSensorWrong => "CONFIGURATION_ERROR_SENSOR_WRONG",
    ConfigurationErrorActorMissing => "CONFIGURATION_ERROR_ACTOR_MISSING",
    ConfigurationErrorActorWrong => "CONFIGURATION_ERROR_ACTOR_WRONG",
    VariableUsedBeforeDeclaration => "VARIABLE_USED_BEFORE_DECLARATION",
    VariableDeclaredTwice => "VARIABLE_DECLARED_TWICE",
    FlowControlOutsideLoop => "FLOW_CONTROL_OUTSIDE_LOOP",
    MotorPowerOutOfRange => "MOTOR_POWER_OUT_OF_RANGE",
    TypeErrorMismatch => "TYPE_ERROR_MISMATCH",
    TypeErrorBinaryOperands => "TYPE_ERROR_BINARY_OPERANDS",
    TypeErrorUnaryOperand => "TYPE_ERROR_UNARY_OPERAND",
}

impl Display for MessageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MessageKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single severity-tagged diagnostic.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct NepoInfo {
    severity: Severity,
    message: MessageKey,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    parameters: Vec<(String, String)>,
}

impl NepoInfo {
    #[must_use]
    pub fn new(severity: Severity, message: MessageKey) -> Self {
        Self {
            severity,
            message,
            parameters: Vec::new(),
        }
    }

    #[must_use]
    pub fn error(message: MessageKey) -> Self {
        Self::new(Severity::Error, message)
    }

    #[must_use]
    pub fn warning(message: MessageKey) -> Self {
        Self::new(Severity::Warning, message)
    }

    #[must_use]
    pub fn info(message: MessageKey) -> Self {
        Self::new(Severity::Info, message)
    }

    /// Appends a placeholder value for the localized message.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn message(&self) -> MessageKey {
        self.message
    }

    #[must_use]
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl Display for NepoInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if !self.parameters.is_empty() {
            let params: Vec<String> = self
                .parameters
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            write!(f, " [{}]", params.join(", "))?;
        }
        Ok(())
    }
}

/// Append-only list of diagnostics owned by a node or component.
///
/// Nodes are shared immutably, so the list uses interior mutability. There is
/// no way to remove or replace an entry once pushed.
#[derive(Default, Debug)]
pub struct NepoInfos {
    infos: RefCell<Vec<NepoInfo>>,
}

impl NepoInfos {
    pub fn add(&self, info: NepoInfo) {
        self.infos.borrow_mut().push(info);
    }

    #[must_use]
    pub fn borrow(&self) -> Ref<'_, Vec<NepoInfo>> {
        self.infos.borrow()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<NepoInfo> {
        self.infos.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.infos.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.infos.borrow().is_empty()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.infos.borrow().iter().filter(|i| i.is_error()).count()
    }

    #[must_use]
    pub fn contains(&self, message: MessageKey) -> bool {
        self.infos.borrow().iter().any(|i| i.message() == message)
    }
}
