#![warn(clippy::pedantic)]

use nepo_ast::{configuration::ConfigurationAst, hardware::UsedHardware, nodes::ProgramAst};

use crate::generator::ArduinoGenerator;

pub mod errors;
mod generator;
mod utils;

pub use errors::CodegenError;

/// Generates an Arduino sketch for a validated program.
///
/// Only components listed in `used` get pin constants and setup code, in the
/// order the configuration defines them. The output depends on nothing but
/// the arguments, so equal inputs always give identical text.
///
/// # Errors
///
/// Returns an error if the program refers to a component or port the
/// configuration does not define.
pub fn generate(
    program: &ProgramAst,
    configuration: &ConfigurationAst,
    used: &UsedHardware,
) -> Result<String, CodegenError> {
    ArduinoGenerator::new(configuration, used).generate_program(program)
}
