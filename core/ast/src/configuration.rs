//! Hardware configuration trees.
//!
//! A configuration is a set of named components, each wiring logical port
//! roles (`TRIG`, `ECHO`, `+`, ...) to physical pins of the board. It is a
//! separate tree from the program and only meets it through component names.

use std::{
    fmt::{self, Display, Formatter},
    rc::Rc,
};

use rustc_hash::FxHashMap;

use crate::{
    errors::AstError,
    info::{NepoInfo, NepoInfos},
    nodes::BlockProperties,
    nodes_impl::is_identifier,
    visitor::ComponentVisitor,
};

/// Kind of a configuration component.
///
/// Known kinds carry their required port roles. Anything else is kept as an
/// opaque tag so the configuration of a newer front end still loads.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum ComponentType {
    Key,
    Ultrasonic,
    Light,
    Temperature,
    Buzzer,
    Motor,
    Lcd,
    Led,
    Other(String),
}

impl ComponentType {
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        match tag {
            "KEY" => ComponentType::Key,
            "ULTRASONIC" => ComponentType::Ultrasonic,
            "LIGHT" => ComponentType::Light,
            "TEMPERATURE" => ComponentType::Temperature,
            "BUZZER" => ComponentType::Buzzer,
            "MOTOR" => ComponentType::Motor,
            "LCD" => ComponentType::Lcd,
            "LED" => ComponentType::Led,
            other => ComponentType::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ComponentType::Key => "KEY",
            ComponentType::Ultrasonic => "ULTRASONIC",
            ComponentType::Light => "LIGHT",
            ComponentType::Temperature => "TEMPERATURE",
            ComponentType::Buzzer => "BUZZER",
            ComponentType::Motor => "MOTOR",
            ComponentType::Lcd => "LCD",
            ComponentType::Led => "LED",
            ComponentType::Other(tag) => tag,
        }
    }

    /// Port roles a component of this type must assign.
    #[must_use]
    pub fn required_roles(&self) -> &'static [&'static str] {
        match self {
            ComponentType::Key => &["PIN1"],
            ComponentType::Ultrasonic => &["TRIG", "ECHO"],
            ComponentType::Light | ComponentType::Temperature => &["OUTPUT"],
            ComponentType::Buzzer => &["+"],
            ComponentType::Motor => &["IN1", "IN2"],
            ComponentType::Lcd => &["RS", "E", "D4", "D5", "D6", "D7"],
            ComponentType::Led => &["INPUT"],
            ComponentType::Other(_) => &[],
        }
    }
}

impl Display for ComponentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct ConfigurationComponent {
    name: String,
    component_type: ComponentType,
    properties: Vec<(String, String)>,
    block_properties: Option<BlockProperties>,
    infos: NepoInfos,
}

impl ConfigurationComponent {
    /// Creates a component with its role to pin mapping in definition order.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::InvalidComponentName`] for a bad name,
    /// [`AstError::DuplicatePortRole`] if a role appears twice and
    /// [`AstError::InvalidPin`] for a pin that cannot appear in a sketch.
    pub fn make(
        component_type: ComponentType,
        name: &str,
        properties: Vec<(String, String)>,
        block_properties: Option<BlockProperties>,
    ) -> Result<Self, AstError> {
        if !is_identifier(name) {
            return Err(AstError::InvalidComponentName {
                name: name.to_string(),
            });
        }
        for (i, (role, pin)) in properties.iter().enumerate() {
            if properties[..i].iter().any(|(other, _)| other == role) {
                return Err(AstError::DuplicatePortRole {
                    component: name.to_string(),
                    role: role.clone(),
                });
            }
            if !is_pin(pin) {
                return Err(AstError::InvalidPin {
                    component: name.to_string(),
                    role: role.clone(),
                    pin: pin.clone(),
                });
            }
        }
        Ok(Self {
            name: name.to_string(),
            component_type,
            properties,
            block_properties,
            infos: NepoInfos::default(),
        })
    }

    /// Calls the one visitor method matching this component's type.
    pub fn accept<V: ComponentVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match &self.component_type {
            ComponentType::Key => visitor.visit_key(self),
            ComponentType::Ultrasonic => visitor.visit_ultrasonic(self),
            ComponentType::Light => visitor.visit_light(self),
            ComponentType::Temperature => visitor.visit_temperature(self),
            ComponentType::Buzzer => visitor.visit_buzzer(self),
            ComponentType::Motor => visitor.visit_motor(self),
            ComponentType::Lcd => visitor.visit_lcd(self),
            ComponentType::Led => visitor.visit_led(self),
            ComponentType::Other(tag) => visitor.visit_other(self, tag),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn component_type(&self) -> &ComponentType {
        &self.component_type
    }

    /// Role to pin pairs in definition order.
    pub fn component_properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(role, pin)| (role.as_str(), pin.as_str()))
    }

    #[must_use]
    pub fn property(&self, role: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(r, _)| r == role)
            .map(|(_, pin)| pin.as_str())
    }

    #[must_use]
    pub fn block_properties(&self) -> Option<&BlockProperties> {
        self.block_properties.as_ref()
    }

    #[must_use]
    pub fn infos(&self) -> &NepoInfos {
        &self.infos
    }

    pub fn add_info(&self, info: NepoInfo) {
        self.infos.add(info);
    }
}

/// All components of one robot configuration, in definition order.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationAst {
    robot: String,
    components: Vec<Rc<ConfigurationComponent>>,
    index: FxHashMap<String, usize>,
}

impl ConfigurationAst {
    /// # Errors
    ///
    /// Returns [`AstError::DuplicateComponentName`] if two components share a
    /// name.
    pub fn make(robot: &str, components: Vec<ConfigurationComponent>) -> Result<Self, AstError> {
        let mut index = FxHashMap::default();
        let mut stored = Vec::with_capacity(components.len());
        for component in components {
            if index
                .insert(component.name().to_string(), stored.len())
                .is_some()
            {
                return Err(AstError::DuplicateComponentName {
                    name: component.name().to_string(),
                });
            }
            stored.push(Rc::new(component));
        }
        Ok(Self {
            robot: robot.to_string(),
            components: stored,
            index,
        })
    }

    #[must_use]
    pub fn robot(&self) -> &str {
        &self.robot
    }

    #[must_use]
    pub fn components(&self) -> &[Rc<ConfigurationComponent>] {
        &self.components
    }

    #[must_use]
    pub fn component(&self, name: &str) -> Option<&Rc<ConfigurationComponent>> {
        self.index.get(name).map(|&i| &self.components[i])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Pins end up verbatim in generated source, e.g. `2`, `A0` or `GND`.
fn is_pin(pin: &str) -> bool {
    !pin.is_empty() && pin.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(r, p)| ((*r).to_string(), (*p).to_string()))
            .collect()
    }

    #[test]
    fn component_keeps_role_order() {
        let component = ConfigurationComponent::make(
            ComponentType::Ultrasonic,
            "U",
            props(&[("TRIG", "8"), ("ECHO", "9")]),
            None,
        )
        .unwrap();
        let roles: Vec<_> = component.component_properties().collect();
        assert_eq!(roles, vec![("TRIG", "8"), ("ECHO", "9")]);
        assert_eq!(component.property("ECHO"), Some("9"));
        assert_eq!(component.property("GND"), None);
    }

    #[test]
    fn duplicate_role_is_rejected() {
        let err = ConfigurationComponent::make(
            ComponentType::Motor,
            "M",
            props(&[("IN1", "3"), ("IN1", "4")]),
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            AstError::DuplicatePortRole {
                component: "M".to_string(),
                role: "IN1".to_string()
            }
        );
    }

    #[test]
    fn pin_must_be_a_plain_token() {
        for pin in ["", "2; digitalWrite(3, HIGH)", "A 0", "-1"] {
            let err = ConfigurationComponent::make(
                ComponentType::Led,
                "L",
                props(&[("INPUT", pin)]),
                None,
            )
            .unwrap_err();
            assert_eq!(
                err,
                AstError::InvalidPin {
                    component: "L".to_string(),
                    role: "INPUT".to_string(),
                    pin: pin.to_string(),
                }
            );
        }
        for pin in ["13", "A0", "GND", "LED_BUILTIN"] {
            assert!(
                ConfigurationComponent::make(ComponentType::Led, "L", props(&[("INPUT", pin)]), None)
                    .is_ok()
            );
        }
    }

    #[test]
    fn duplicate_component_name_is_rejected() {
        let a = ConfigurationComponent::make(ComponentType::Key, "K", props(&[("PIN1", "2")]), None)
            .unwrap();
        let b = ConfigurationComponent::make(ComponentType::Led, "K", props(&[("INPUT", "3")]), None)
            .unwrap();
        assert_eq!(
            ConfigurationAst::make("uno", vec![a, b]).unwrap_err(),
            AstError::DuplicateComponentName {
                name: "K".to_string()
            }
        );
    }

    #[test]
    fn lookup_by_name_and_order() {
        let a = ConfigurationComponent::make(ComponentType::Key, "K", props(&[("PIN1", "2")]), None)
            .unwrap();
        let b = ConfigurationComponent::make(ComponentType::parse("SERVO"), "S", props(&[]), None)
            .unwrap();
        let config = ConfigurationAst::make("uno", vec![a, b]).unwrap();
        assert_eq!(config.len(), 2);
        assert_eq!(config.components()[1].name(), "S");
        assert_eq!(
            config.component("S").unwrap().component_type(),
            &ComponentType::Other("SERVO".to_string())
        );
        assert!(config.component("X").is_none());
    }

    /// Names the method it was called through.
    struct MethodName;

    impl ComponentVisitor for MethodName {
        type Output = String;

        fn visit_key(&mut self, _: &ConfigurationComponent) -> String {
            "key".to_string()
        }
        fn visit_ultrasonic(&mut self, _: &ConfigurationComponent) -> String {
            "ultrasonic".to_string()
        }
        fn visit_light(&mut self, _: &ConfigurationComponent) -> String {
            "light".to_string()
        }
        fn visit_temperature(&mut self, _: &ConfigurationComponent) -> String {
            "temperature".to_string()
        }
        fn visit_buzzer(&mut self, _: &ConfigurationComponent) -> String {
            "buzzer".to_string()
        }
        fn visit_motor(&mut self, _: &ConfigurationComponent) -> String {
            "motor".to_string()
        }
        fn visit_lcd(&mut self, _: &ConfigurationComponent) -> String {
            "lcd".to_string()
        }
        fn visit_led(&mut self, _: &ConfigurationComponent) -> String {
            "led".to_string()
        }
        fn visit_other(&mut self, _: &ConfigurationComponent, tag: &str) -> String {
            format!("other {tag}")
        }
    }

    #[test]
    fn components_dispatch_by_type_in_order() {
        let config = ConfigurationAst::make(
            "uno",
            vec![
                ConfigurationComponent::make(ComponentType::Motor, "M", props(&[]), None).unwrap(),
                ConfigurationComponent::make(ComponentType::Key, "K", props(&[]), None).unwrap(),
                ConfigurationComponent::make(ComponentType::parse("SERVO"), "S", props(&[]), None)
                    .unwrap(),
            ],
        )
        .unwrap();
        assert_eq!(
            crate::visitor::walk_configuration(&config, &mut MethodName),
            vec!["motor", "key", "other SERVO"]
        );
    }

    #[test]
    fn component_type_tags() {
        assert_eq!(ComponentType::parse("ULTRASONIC"), ComponentType::Ultrasonic);
        assert_eq!(ComponentType::Buzzer.to_string(), "BUZZER");
        assert_eq!(ComponentType::Lcd.required_roles().len(), 6);
        assert!(ComponentType::Other("X".into()).required_roles().is_empty());
    }
}
