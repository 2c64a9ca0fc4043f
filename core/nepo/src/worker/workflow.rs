use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{Worker, WorkerError, WorkerKind};
use crate::{platform::Platform, project::Project, result::ProjectResult};

/// An ordered list of workers run over one project.
pub struct Workflow {
    name: String,
    workers: Vec<Box<dyn Worker>>,
}

impl Workflow {
    #[must_use]
    pub fn new(name: &str, workers: Vec<Box<dyn Worker>>) -> Self {
        Self {
            name: name.to_string(),
            workers,
        }
    }

    /// Instantiates `kinds` in order for `platform`.
    #[must_use]
    pub fn from_kinds(name: &str, kinds: &[WorkerKind], platform: &Arc<Platform>) -> Self {
        Self::new(
            name,
            kinds.iter().map(|kind| kind.create(platform)).collect(),
        )
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn worker_names(&self) -> Vec<&'static str> {
        self.workers.iter().map(|worker| worker.name()).collect()
    }

    /// Runs every worker in order. Program errors found on the way do not
    /// stop the run; a worker error does, after marking the project with
    /// [`ProjectResult::CompilerWorkflowError`].
    ///
    /// # Errors
    ///
    /// Returns the first [`WorkerError`] raised.
    pub fn run(&self, project: &mut Project) -> Result<(), WorkerError> {
        for worker in &self.workers {
            debug!(workflow = %self.name, worker = worker.name(), "worker started");
            if let Err(err) = worker.execute(project) {
                warn!(workflow = %self.name, worker = worker.name(), error = %err, "workflow aborted");
                project.set_result(ProjectResult::CompilerWorkflowError);
                return Err(err);
            }
            debug!(
                workflow = %self.name,
                worker = worker.name(),
                errors = project.error_count(),
                "worker finished"
            );
        }
        info!(
            workflow = %self.name,
            result = %project.result(),
            errors = project.error_count(),
            "workflow finished"
        );
        Ok(())
    }
}

impl std::fmt::Debug for Workflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workflow")
            .field("name", &self.name)
            .field("workers", &self.worker_names())
            .finish()
    }
}
