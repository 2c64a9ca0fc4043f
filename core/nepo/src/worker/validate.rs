use std::{rc::Rc, sync::Arc};

use nepo_ast::{
    configuration::ConfigurationComponent,
    info::{MessageKey, NepoInfo},
    visitor::{ComponentVisitor, walk_configuration, walk_program},
};
use tracing::debug;

use super::{Worker, WorkerError};
use crate::{
    bean::UsedHardwareBean, platform::Platform, project::Project, validator::ProgramValidator,
};

/// Program validation without hardware checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatorWorker;

impl Worker for ValidatorWorker {
    fn name(&self) -> &'static str {
        "validator"
    }

    fn execute(&self, project: &mut Project) -> Result<(), WorkerError> {
        validate_program(project, false);
        Ok(())
    }
}

/// Checks the Arduino configuration for pin conflicts and missing ports, then
/// validates the program against it.
#[derive(Debug, Clone)]
pub struct ArduinoConfigurationValidatorWorker {
    platform: Arc<Platform>,
}

impl ArduinoConfigurationValidatorWorker {
    #[must_use]
    pub fn new(platform: Arc<Platform>) -> Self {
        Self { platform }
    }

    /// Claims the pins of every component's exclusive roles from one shared
    /// pool. A pin that is no longer free is a conflict. Claimed pins stay
    /// claimed even if their component turns out to be erroneous.
    fn check_pins(&self, project: &mut Project) {
        let mut free_pins = self.platform.free_pins.clone();
        let configuration = Rc::clone(project.configuration());
        for component in configuration.components() {
            let mut claimed: Vec<&str> = Vec::new();
            for (role, pin) in component.component_properties() {
                if !self.platform.is_overlapping(role) {
                    continue;
                }
                if let Some(i) = free_pins.iter().position(|free| free == pin) {
                    free_pins.remove(i);
                    claimed.push(pin);
                } else {
                    debug!(component = component.name(), role, pin, "pin already taken");
                    report(
                        project,
                        component,
                        NepoInfo::error(MessageKey::ConfigurationErrorOverlappingPorts)
                            .with_param("pin", pin),
                    );
                }
            }
            if let Some(pin) = first_repeated(&claimed) {
                report(
                    project,
                    component,
                    NepoInfo::error(MessageKey::ConfigurationErrorOverlappingPorts)
                        .with_param("pin", pin),
                );
            }
        }
    }

    fn check_components(project: &mut Project) {
        let configuration = Rc::clone(project.configuration());
        walk_configuration(&configuration, &mut ArduinoComponentChecker { project });
    }
}

/// Arduino checks of single components that do not involve the pin pool.
struct ArduinoComponentChecker<'p> {
    project: &'p mut Project,
}

impl ArduinoComponentChecker<'_> {
    fn require_ports(&mut self, component: &ConfigurationComponent) {
        for role in component.component_type().required_roles() {
            if component.property(role).is_none() {
                report(
                    self.project,
                    component,
                    NepoInfo::error(MessageKey::ConfigurationErrorMissingPort)
                        .with_param("role", *role),
                );
            }
        }
    }
}

impl ComponentVisitor for ArduinoComponentChecker<'_> {
    type Output = ();

    fn visit_key(&mut self, component: &ConfigurationComponent) {
        self.require_ports(component);
    }

    fn visit_ultrasonic(&mut self, component: &ConfigurationComponent) {
        self.require_ports(component);
    }

    fn visit_light(&mut self, component: &ConfigurationComponent) {
        self.require_ports(component);
    }

    fn visit_temperature(&mut self, component: &ConfigurationComponent) {
        self.require_ports(component);
    }

    fn visit_buzzer(&mut self, component: &ConfigurationComponent) {
        self.require_ports(component);
    }

    fn visit_motor(&mut self, component: &ConfigurationComponent) {
        self.require_ports(component);
    }

    fn visit_lcd(&mut self, component: &ConfigurationComponent) {
        self.require_ports(component);
    }

    fn visit_led(&mut self, component: &ConfigurationComponent) {
        self.require_ports(component);
    }

    // Unknown to this board; left to newer front ends.
    fn visit_other(&mut self, component: &ConfigurationComponent, tag: &str) {
        debug!(component = component.name(), tag, "no checks for component type");
    }
}

impl Worker for ArduinoConfigurationValidatorWorker {
    fn name(&self) -> &'static str {
        "arduino_configuration_validator"
    }

    fn execute(&self, project: &mut Project) -> Result<(), WorkerError> {
        self.check_pins(project);
        Self::check_components(project);
        validate_program(project, true);
        Ok(())
    }
}

fn report(project: &mut Project, component: &ConfigurationComponent, info: NepoInfo) {
    component.add_info(info);
    project.add_errors(1);
}

fn first_repeated<'a>(pins: &[&'a str]) -> Option<&'a str> {
    pins.iter()
        .enumerate()
        .find(|&(i, pin)| pins[..i].contains(pin))
        .map(|(_, pin)| *pin)
}

fn validate_program(project: &mut Project, with_hardware: bool) {
    let configuration = Rc::clone(project.configuration());
    let mut validator =
        ProgramValidator::with_configuration(with_hardware.then_some(&*configuration));
    walk_program(project.program(), &mut validator);
    project.add_errors(validator.error_count());
    project.add_bean(UsedHardwareBean(validator.into_used_hardware()));
}
