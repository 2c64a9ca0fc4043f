//! Robot platform metadata.
//!
//! A platform describes the board the program is compiled for: the pins a
//! configuration may assign, which port roles claim a pin exclusively, and
//! the named workflows available for it.
//!
//! ## File Format
//!
//! ```toml
//! name = "arduino-uno"
//! free_pins = ["0", "1", "2", "A0"]
//!
//! [overlapping_roles]
//! TRIG = true
//! ECHO = true
//! GND = false
//!
//! [workflows]
//! validate = ["arduino_configuration_validator", "type_check"]
//! compile = ["arduino_configuration_validator", "type_check", "code_generator"]
//! ```
//!
//! A role maps to `true` if two components must never share its pin. Roles
//! missing from the table never claim a pin.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::worker::WorkerKind;

/// Port roles that occupy a pin exclusively on Arduino boards.
pub const ARDUINO_OVERLAPPING_ROLES: &[&str] = &[
    "INPUT", "OUTPUT", "+", "S", "PULSE", "TRIG", "ECHO", "RED", "GREEN", "BLUE", "RST", "IN",
    "SDA", "RS", "E", "D4", "D5", "D6", "D7", "PIN1", "IN1", "IN2", "IN3", "IN4", "OUT",
];

#[derive(Debug, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum PlatformError {
    #[error("failed to read platform file `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid platform description: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("platform `{platform}` has no workflow `{name}`")]
    UnknownWorkflow { platform: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub name: String,

    /// Assignable pins in the order they are handed out.
    #[serde(default)]
    pub free_pins: Vec<String>,

    #[serde(default)]
    pub overlapping_roles: BTreeMap<String, bool>,

    #[serde(default)]
    pub workflows: BTreeMap<String, Vec<WorkerKind>>,
}

impl Platform {
    /// The Arduino Uno: digital pins `0`..=`13` and analog pins `A0`..=`A5`.
    #[must_use]
    pub fn arduino_uno() -> Self {
        let free_pins = (0..=13)
            .map(|pin| pin.to_string())
            .chain((0..=5).map(|pin| format!("A{pin}")))
            .collect();
        let overlapping_roles = ARDUINO_OVERLAPPING_ROLES
            .iter()
            .map(|role| ((*role).to_string(), true))
            .collect();
        let workflows = BTreeMap::from([
            (
                "validate".to_string(),
                vec![
                    WorkerKind::ArduinoConfigurationValidator,
                    WorkerKind::TypeCheck,
                ],
            ),
            (
                "compile".to_string(),
                vec![
                    WorkerKind::ArduinoConfigurationValidator,
                    WorkerKind::TypeCheck,
                    WorkerKind::CodeGenerator,
                ],
            ),
        ]);
        Self {
            name: "arduino-uno".to_string(),
            free_pins,
            overlapping_roles,
            workflows,
        }
    }

    /// # Errors
    ///
    /// Returns [`PlatformError::Parse`] if `source` is not a valid platform
    /// description.
    pub fn from_toml_str(source: &str) -> Result<Self, PlatformError> {
        Ok(toml::from_str(source)?)
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, PlatformError> {
        let source = std::fs::read_to_string(path).map_err(|source| PlatformError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Whether a pin assigned to `role` is claimed exclusively.
    #[must_use]
    pub fn is_overlapping(&self, role: &str) -> bool {
        self.overlapping_roles.get(role).copied().unwrap_or(false)
    }

    /// # Errors
    ///
    /// Returns [`PlatformError::UnknownWorkflow`] if the platform defines no
    /// workflow called `name`.
    pub fn workflow(&self, name: &str) -> Result<&[WorkerKind], PlatformError> {
        self.workflows
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| PlatformError::UnknownWorkflow {
                platform: self.name.clone(),
                name: name.to_string(),
            })
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::arduino_uno()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arduino_uno_pins_and_roles() {
        let uno = Platform::arduino_uno();
        assert_eq!(uno.free_pins.len(), 20);
        assert_eq!(uno.free_pins[0], "0");
        assert_eq!(uno.free_pins[19], "A5");
        assert!(uno.is_overlapping("TRIG"));
        assert!(uno.is_overlapping("+"));
        assert!(!uno.is_overlapping("GND"));
        assert_eq!(uno.workflow("compile").unwrap().len(), 3);
    }

    #[test]
    fn parses_toml() {
        let platform = Platform::from_toml_str(
            r#"
            name = "test"
            free_pins = ["A", "B"]

            [overlapping_roles]
            IN = true
            VCC = false

            [workflows]
            check = ["validator"]
            "#,
        )
        .unwrap();
        assert_eq!(platform.free_pins, vec!["A", "B"]);
        assert!(platform.is_overlapping("IN"));
        assert!(!platform.is_overlapping("VCC"));
        assert_eq!(platform.workflow("check").unwrap(), &[WorkerKind::Validator]);
    }

    #[test]
    fn unknown_workflow_and_worker() {
        let platform = Platform::arduino_uno();
        let err = platform.workflow("flash").unwrap_err();
        assert_eq!(
            err.to_string(),
            "platform `arduino-uno` has no workflow `flash`"
        );
        assert!(matches!(
            Platform::from_toml_str("name = \"x\"\n[workflows]\nrun = [\"teleport\"]\n"),
            Err(PlatformError::Parse(_))
        ));
    }

    #[test]
    fn platform_is_shareable_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Platform>();
    }
}
