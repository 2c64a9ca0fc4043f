use nepo_arduino_codegen::generate;
use tracing::{debug, warn};

use super::{Worker, WorkerError};
use crate::{bean::UsedHardwareBean, project::Project, result::ProjectResult};

/// Generates the Arduino sketch once every earlier worker has succeeded.
///
/// Needs the [`UsedHardwareBean`] of a validator worker; running without one
/// is a broken workflow, not a program error.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeGeneratorWorker;

impl Worker for CodeGeneratorWorker {
    fn name(&self) -> &'static str {
        "code_generator"
    }

    fn execute(&self, project: &mut Project) -> Result<(), WorkerError> {
        let used = project
            .bean::<UsedHardwareBean>()
            .map_err(|source| WorkerError::project(self.name(), source))?;
        if !project.result().is_success() {
            warn!(result = %project.result(), "skipping code generation");
            return Ok(());
        }
        match generate(project.program(), project.configuration(), &used.0) {
            Ok(source) => {
                debug!(bytes = source.len(), "sketch generated");
                project.set_source(source);
            }
            Err(err) => {
                warn!(error = %err, "code generation failed");
                project.set_result(ProjectResult::CompilerGenerationError);
            }
        }
        Ok(())
    }
}
