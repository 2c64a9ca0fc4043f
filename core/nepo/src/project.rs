use std::{any::type_name, rc::Rc};

use nepo_ast::{configuration::ConfigurationAst, nodes::ProgramAst};
use thiserror::Error;

use crate::{bean::BeanRegistry, result::ProjectResult};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum ProjectError {
    #[error("no bean of type `{bean}` has been registered")]
    MissingBean { bean: &'static str },
}

/// Everything one compilation request works on.
///
/// Workers receive the project by `&mut`, append diagnostics to its trees,
/// raise the error count and the result, and register beans for the workers
/// after them.
#[derive(Debug)]
pub struct Project {
    program: ProgramAst,
    configuration: Rc<ConfigurationAst>,
    error_count: usize,
    result: ProjectResult,
    beans: BeanRegistry,
    source: Option<String>,
}

impl Project {
    #[must_use]
    pub fn new(program: ProgramAst, configuration: ConfigurationAst) -> Self {
        Self {
            program,
            configuration: Rc::new(configuration),
            error_count: 0,
            result: ProjectResult::Success,
            beans: BeanRegistry::default(),
            source: None,
        }
    }

    #[must_use]
    pub fn program(&self) -> &ProgramAst {
        &self.program
    }

    #[must_use]
    pub fn configuration(&self) -> &Rc<ConfigurationAst> {
        &self.configuration
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    #[must_use]
    pub fn result(&self) -> ProjectResult {
        self.result
    }

    /// Raises the result to `result` if it is worse than the current one.
    /// A result once reached is never lowered.
    pub fn set_result(&mut self, result: ProjectResult) {
        self.result = self.result.max(result);
    }

    /// Counts `count` program errors and marks the program invalid.
    pub fn add_errors(&mut self, count: usize) {
        if count > 0 {
            self.error_count += count;
            self.set_result(ProjectResult::ProgramInvalidStatements);
        }
    }

    pub fn add_bean<B: 'static>(&mut self, bean: B) {
        self.beans.insert(bean);
    }

    /// # Errors
    ///
    /// Returns [`ProjectError::MissingBean`] naming `B` if no worker has
    /// registered one.
    pub fn bean<B: 'static>(&self) -> Result<&B, ProjectError> {
        self.beans.get::<B>().ok_or(ProjectError::MissingBean {
            bean: type_name::<B>(),
        })
    }

    #[must_use]
    pub fn has_bean<B: 'static>(&self) -> bool {
        self.beans.contains::<B>()
    }

    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn set_source(&mut self, source: String) {
        self.source = Some(source);
    }
}

#[cfg(test)]
mod tests {
    use nepo_ast::nodes::{MainTask, StmtList};

    use super::*;
    use crate::bean::UsedHardwareBean;

    fn empty_project() -> Project {
        Project::new(
            ProgramAst::new(
                Rc::new(MainTask::make(vec![], None, None)),
                Rc::new(StmtList::empty()),
            ),
            ConfigurationAst::default(),
        )
    }

    #[test]
    fn result_is_never_lowered() {
        let mut project = empty_project();
        project.set_result(ProjectResult::CompilerGenerationError);
        project.set_result(ProjectResult::Success);
        project.set_result(ProjectResult::ProgramInvalidStatements);
        assert_eq!(project.result(), ProjectResult::CompilerGenerationError);
    }

    #[test]
    fn add_errors_counts_and_invalidates() {
        let mut project = empty_project();
        project.add_errors(0);
        assert_eq!(project.result(), ProjectResult::Success);
        project.add_errors(2);
        project.add_errors(1);
        assert_eq!(project.error_count(), 3);
        assert_eq!(project.result(), ProjectResult::ProgramInvalidStatements);
    }

    #[test]
    fn missing_bean_names_type() {
        let project = empty_project();
        let err = project.bean::<UsedHardwareBean>().unwrap_err();
        assert!(err.to_string().contains("UsedHardwareBean"));
    }
}
