use nepo_type_checker::TypeCheckerBuilder;
use tracing::debug;

use super::{Worker, WorkerError};
use crate::{bean::TypeCheckBean, project::Project};

#[derive(Debug, Clone, Copy, Default)]
pub struct TypeCheckWorker;

impl Worker for TypeCheckWorker {
    fn name(&self) -> &'static str {
        "type_check"
    }

    fn execute(&self, project: &mut Project) -> Result<(), WorkerError> {
        let typed_context =
            TypeCheckerBuilder::build_typed_context(project.program()).typed_context();
        debug!(errors = typed_context.error_count(), "type check finished");
        project.add_errors(typed_context.error_count());
        project.add_bean(TypeCheckBean(typed_context));
        Ok(())
    }
}
