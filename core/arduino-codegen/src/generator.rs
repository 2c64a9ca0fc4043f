use nepo_ast::{
    configuration::{ComponentType, ConfigurationAst, ConfigurationComponent},
    hardware::UsedHardware,
    nodes::{
        AssignStmt, Binary, BinaryOp, BlocklyType, BoolConst, Flow, IfStmt, KeySensor,
        LightAction, LightSensor, LightStatus, LightStatusAction, MainTask, MotorOnAction,
        MotorStopAction, NumConst, ProgramAst, RepeatMode, RepeatStmt, SerialWriteAction,
        ShowTextAction, StmtFlowCon, StmtList, StringConst, TemperatureSensor, TimerSensor,
        ToneAction, UltrasonicSensor, Unary, Var, VarDeclaration, WaitTimeStmt,
    },
    visitor::PhraseVisitor,
};

use crate::{
    errors::CodegenError,
    utils::{braced, pin_constant, string_literal, variable},
};

const HEADER: &str = "// This file is automatically generated by the NEPO compiler.";

type Emitted = Result<String, CodegenError>;

/// Emits one Arduino sketch. Expression visits return the expression text,
/// statement visits return complete lines without a trailing newline.
pub(crate) struct ArduinoGenerator<'a> {
    configuration: &'a ConfigurationAst,
    used: &'a UsedHardware,
    loop_counter: usize,
}

impl<'a> ArduinoGenerator<'a> {
    pub(crate) fn new(configuration: &'a ConfigurationAst, used: &'a UsedHardware) -> Self {
        Self {
            configuration,
            used,
            loop_counter: 0,
        }
    }

    pub(crate) fn generate_program(&mut self, program: &ProgramAst) -> Emitted {
        let body = self.visit_stmt_list(program.body())?;
        let initialisation = self.visit_main_task(program.main_task())?;

        let mut sections = vec![HEADER.to_string(), self.includes().join("\n")];
        let definitions = self.pin_definitions()?;
        if !definitions.is_empty() {
            sections.push(definitions.join("\n"));
        }
        let globals = self.globals(program);
        if !globals.is_empty() {
            sections.push(globals.join("\n"));
        }
        let mut setup = self.setup_lines()?;
        if !initialisation.is_empty() {
            setup.push(initialisation);
        }
        sections.push(braced("void setup()", &setup.join("\n")));
        sections.push(braced("void loop()", &body));

        let mut sketch = sections.join("\n\n");
        sketch.push('\n');
        Ok(sketch)
    }

    fn used_components(&self) -> impl Iterator<Item = &'a ConfigurationComponent> + '_ {
        self.configuration
            .components()
            .iter()
            .map(AsRef::as_ref)
            .filter(|component| self.used.uses_component(component.name()))
    }

    fn uses_lcd(&self) -> bool {
        self.used_components()
            .any(|component| *component.component_type() == ComponentType::Lcd)
    }

    fn includes(&self) -> Vec<String> {
        let mut includes = vec![
            "#include <Arduino.h>".to_string(),
            "#include <NEPODEFS.h>".to_string(),
        ];
        if self.uses_lcd() {
            includes.push("#include <LiquidCrystal.h>".to_string());
        }
        includes
    }

    /// Pin constant of `role` on the component called `name`.
    fn pin(&self, name: &str, role: &str) -> Emitted {
        let component = self
            .configuration
            .component(name)
            .ok_or_else(|| CodegenError::MissingComponent {
                name: name.to_string(),
            })?;
        if component.property(role).is_none() {
            return Err(CodegenError::MissingPort {
                component: name.to_string(),
                role: role.to_string(),
            });
        }
        Ok(pin_constant(name, role))
    }

    fn pin_definitions(&self) -> Result<Vec<String>, CodegenError> {
        let mut lines = Vec::new();
        for component in self.used_components() {
            for role in component.component_type().required_roles() {
                let pin = component
                    .property(role)
                    .ok_or_else(|| CodegenError::MissingPort {
                        component: component.name().to_string(),
                        role: (*role).to_string(),
                    })?;
                lines.push(format!(
                    "const int {} = {pin};",
                    pin_constant(component.name(), role)
                ));
            }
            if *component.component_type() == ComponentType::Lcd {
                let pins: Vec<String> = component
                    .component_type()
                    .required_roles()
                    .iter()
                    .map(|role| pin_constant(component.name(), role))
                    .collect();
                lines.push(format!(
                    "LiquidCrystal _lcd_{}({});",
                    component.name(),
                    pins.join(", ")
                ));
            }
        }
        Ok(lines)
    }

    fn globals(&self, program: &ProgramAst) -> Vec<String> {
        let mut lines: Vec<String> = program
            .main_task()
            .variables()
            .iter()
            .map(|declaration| {
                let c_type = match declaration.type_() {
                    BlocklyType::Number => "double",
                    BlocklyType::Boolean => "bool",
                    BlocklyType::String => "String",
                    BlocklyType::Void => "void",
                };
                format!("{c_type} {};", variable(declaration.name()))
            })
            .collect();
        for timer in self.used.timers() {
            lines.push(format!("unsigned long __time_{timer} = millis();"));
        }
        lines
    }

    fn setup_lines(&self) -> Result<Vec<String>, CodegenError> {
        let mut lines = Vec::new();
        if self.used.uses_serial() {
            lines.push("Serial.begin(9600);".to_string());
        }
        for component in self.used_components() {
            let name = component.name();
            let modes: &[(&str, &str)] = match component.component_type() {
                ComponentType::Key => &[("PIN1", "INPUT")],
                ComponentType::Ultrasonic => &[("TRIG", "OUTPUT"), ("ECHO", "INPUT")],
                ComponentType::Buzzer => &[("+", "OUTPUT")],
                ComponentType::Motor => &[("IN1", "OUTPUT"), ("IN2", "OUTPUT")],
                ComponentType::Led => &[("INPUT", "OUTPUT")],
                ComponentType::Lcd => {
                    lines.push(format!("_lcd_{name}.begin(16, 2);"));
                    &[]
                }
                ComponentType::Light | ComponentType::Temperature | ComponentType::Other(_) => &[],
            };
            for (role, mode) in modes {
                lines.push(format!("pinMode({}, {mode});", self.pin(name, role)?));
            }
        }
        Ok(lines)
    }

    fn block(&mut self, list: &StmtList) -> Emitted {
        let mut lines = Vec::with_capacity(list.statements().len());
        for statement in list.statements() {
            let emitted = statement.accept(self)?;
            if !emitted.is_empty() {
                lines.push(emitted);
            }
        }
        Ok(lines.join("\n"))
    }
}

impl PhraseVisitor for ArduinoGenerator<'_> {
    type Output = Emitted;

    fn visit_num_const(&mut self, node: &NumConst) -> Emitted {
        Ok(node.value().to_string())
    }

    fn visit_bool_const(&mut self, node: &BoolConst) -> Emitted {
        Ok(node.value().to_string())
    }

    fn visit_string_const(&mut self, node: &StringConst) -> Emitted {
        Ok(string_literal(node.value()))
    }

    fn visit_var(&mut self, node: &Var) -> Emitted {
        Ok(variable(node.name()))
    }

    fn visit_binary(&mut self, node: &Binary) -> Emitted {
        let left = node.left().accept(self)?;
        let right = node.right().accept(self)?;
        Ok(match node.op() {
            // `%` is not defined on doubles
            BinaryOp::Mod => format!("fmod({left}, {right})"),
            op => format!("({left} {} {right})", op.symbol()),
        })
    }

    fn visit_unary(&mut self, node: &Unary) -> Emitted {
        let operand = node.expression().accept(self)?;
        Ok(format!("({}{operand})", node.op().symbol()))
    }

    fn visit_key_sensor(&mut self, node: &KeySensor) -> Emitted {
        Ok(format!("digitalRead({})", self.pin(node.port(), "PIN1")?))
    }

    fn visit_ultrasonic_sensor(&mut self, node: &UltrasonicSensor) -> Emitted {
        Ok(format!(
            "_getUltrasonicDistance({}, {})",
            self.pin(node.port(), "TRIG")?,
            self.pin(node.port(), "ECHO")?
        ))
    }

    fn visit_light_sensor(&mut self, node: &LightSensor) -> Emitted {
        Ok(format!(
            "(analogRead({}) * 100 / 1023)",
            self.pin(node.port(), "OUTPUT")?
        ))
    }

    fn visit_temperature_sensor(&mut self, node: &TemperatureSensor) -> Emitted {
        Ok(format!(
            "_getTemperature({})",
            self.pin(node.port(), "OUTPUT")?
        ))
    }

    fn visit_timer_sensor(&mut self, node: &TimerSensor) -> Emitted {
        Ok(format!("((int) (millis() - __time_{}))", node.timer()))
    }

    fn visit_light_action(&mut self, node: &LightAction) -> Emitted {
        Ok(format!(
            "_setBrickLight({}, {});",
            node.color(),
            node.is_blinking_on_off()
        ))
    }

    fn visit_light_status_action(&mut self, node: &LightStatusAction) -> Emitted {
        Ok(match node.status() {
            LightStatus::Off => "_setBrickLight(OFF, OFF);".to_string(),
            LightStatus::Reset => "_resetBrickLight();".to_string(),
        })
    }

    fn visit_tone_action(&mut self, node: &ToneAction) -> Emitted {
        let pin = self.pin(node.port(), "+")?;
        let frequency = node.frequency().accept(self)?;
        let duration = node.duration().accept(self)?;
        Ok(format!("tone({pin}, {frequency}, {duration});"))
    }

    fn visit_motor_on_action(&mut self, node: &MotorOnAction) -> Emitted {
        let in1 = self.pin(node.port(), "IN1")?;
        let in2 = self.pin(node.port(), "IN2")?;
        let power = node.power().accept(self)?;
        Ok(format!("_motorOn({in1}, {in2}, {power});"))
    }

    fn visit_motor_stop_action(&mut self, node: &MotorStopAction) -> Emitted {
        let in1 = self.pin(node.port(), "IN1")?;
        let in2 = self.pin(node.port(), "IN2")?;
        Ok(format!("_motorStop({in1}, {in2});"))
    }

    fn visit_show_text_action(&mut self, node: &ShowTextAction) -> Emitted {
        if self.configuration.component(node.port()).is_none() {
            return Err(CodegenError::MissingComponent {
                name: node.port().to_string(),
            });
        }
        let text = node.text().accept(self)?;
        Ok(format!("_lcd_{}.print({text});", node.port()))
    }

    fn visit_serial_write_action(&mut self, node: &SerialWriteAction) -> Emitted {
        Ok(format!("Serial.println({});", node.value().accept(self)?))
    }

    fn visit_stmt_list(&mut self, node: &StmtList) -> Emitted {
        self.block(node)
    }

    fn visit_assign_stmt(&mut self, node: &AssignStmt) -> Emitted {
        let value = node.value().accept(self)?;
        Ok(format!("{} = {value};", variable(node.name())))
    }

    fn visit_if_stmt(&mut self, node: &IfStmt) -> Emitted {
        let mut text = String::new();
        for (i, (condition, then_list)) in node.arms().enumerate() {
            let condition = condition.accept(self)?;
            let body = self.block(then_list)?;
            let head = if i == 0 {
                format!("if ({condition})")
            } else {
                format!(" else if ({condition})")
            };
            text.push_str(&braced(&head, &body));
        }
        if let Some(else_list) = node.else_list() {
            let body = self.block(else_list)?;
            text.push_str(&braced(" else", &body));
        }
        Ok(text)
    }

    fn visit_repeat_stmt(&mut self, node: &RepeatStmt) -> Emitted {
        let expression = node
            .expression()
            .map(|expression| expression.accept(self))
            .transpose()?
            .unwrap_or_default();
        let head = match node.mode() {
            RepeatMode::Forever => "while (true)".to_string(),
            RepeatMode::Times => {
                let counter = format!("___k{}", self.loop_counter);
                self.loop_counter += 1;
                format!("for (int {counter} = 0; {counter} < {expression}; {counter} += 1)")
            }
            RepeatMode::While => format!("while ({expression})"),
            RepeatMode::Until => format!("while (!({expression}))"),
        };
        let body = self.block(node.body())?;
        Ok(braced(&head, &body))
    }

    fn visit_stmt_flow_con(&mut self, node: &StmtFlowCon) -> Emitted {
        Ok(match node.flow() {
            Flow::Break => "break;".to_string(),
            Flow::Continue => "continue;".to_string(),
        })
    }

    fn visit_wait_time_stmt(&mut self, node: &WaitTimeStmt) -> Emitted {
        Ok(format!("delay({});", node.time().accept(self)?))
    }

    fn visit_var_declaration(&mut self, node: &VarDeclaration) -> Emitted {
        let value = node.value().accept(self)?;
        Ok(format!("{} = {value};", variable(node.name())))
    }

    fn visit_main_task(&mut self, node: &MainTask) -> Emitted {
        let mut lines = Vec::with_capacity(node.variables().len());
        for declaration in node.variables() {
            lines.push(self.visit_var_declaration(declaration)?);
        }
        Ok(lines.join("\n"))
    }
}
