//! Pipeline stages.
//!
//! A [`Worker`] takes the project by `&mut`, attaches diagnostics, raises the
//! error count and result, and may register beans for later workers. Program
//! errors are never returned as `Err`; an `Err` means the pipeline itself
//! cannot go on, and the [`Workflow`](workflow::Workflow) driver stops.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    platform::Platform,
    project::{Project, ProjectError},
};

pub mod codegen;
pub mod type_check;
pub mod validate;
pub mod workflow;

pub use codegen::CodeGeneratorWorker;
pub use type_check::TypeCheckWorker;
pub use validate::{ArduinoConfigurationValidatorWorker, ValidatorWorker};
pub use workflow::Workflow;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum WorkerError {
    #[error("worker `{worker}`: {source}")]
    Project {
        worker: &'static str,
        #[source]
        source: ProjectError,
    },
}

impl WorkerError {
    pub fn project(worker: &'static str, source: ProjectError) -> Self {
        WorkerError::Project { worker, source }
    }
}

pub trait Worker {
    fn name(&self) -> &'static str;

    /// # Errors
    ///
    /// Returns a [`WorkerError`] if the pipeline must stop.
    fn execute(&self, project: &mut Project) -> Result<(), WorkerError>;
}

/// Worker names usable in platform workflow definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerKind {
    Validator,
    ArduinoConfigurationValidator,
    TypeCheck,
    CodeGenerator,
}

impl WorkerKind {
    #[must_use]
    pub fn create(self, platform: &Arc<Platform>) -> Box<dyn Worker> {
        match self {
            WorkerKind::Validator => Box::new(ValidatorWorker),
            WorkerKind::ArduinoConfigurationValidator => {
                Box::new(ArduinoConfigurationValidatorWorker::new(Arc::clone(platform)))
            }
            WorkerKind::TypeCheck => Box::new(TypeCheckWorker),
            WorkerKind::CodeGenerator => Box::new(CodeGeneratorWorker),
        }
    }
}
