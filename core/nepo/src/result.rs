use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// Overall status of a compilation request.
///
/// Variants are declared from best to worst and the derived ordering follows
/// that, so `max` picks the worse of two results.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectResult {
    #[default]
    Success,
    ProgramInvalidStatements,
    CompilerGenerationError,
    CompilerWorkflowError,
}

impl ProjectResult {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectResult::Success => "SUCCESS",
            ProjectResult::ProgramInvalidStatements => "PROGRAM_INVALID_STATEMENTS",
            ProjectResult::CompilerGenerationError => "COMPILER_GENERATION_ERROR",
            ProjectResult::CompilerWorkflowError => "COMPILER_WORKFLOW_ERROR",
        }
    }

    #[must_use]
    pub fn is_success(self) -> bool {
        self == ProjectResult::Success
    }
}

impl Display for ProjectResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_by_severity() {
        assert!(ProjectResult::Success < ProjectResult::ProgramInvalidStatements);
        assert!(ProjectResult::ProgramInvalidStatements < ProjectResult::CompilerGenerationError);
        assert!(ProjectResult::CompilerGenerationError < ProjectResult::CompilerWorkflowError);
        assert_eq!(
            ProjectResult::CompilerWorkflowError.max(ProjectResult::Success),
            ProjectResult::CompilerWorkflowError
        );
    }

    #[test]
    fn serializes_as_key() {
        assert_eq!(
            serde_json::to_string(&ProjectResult::ProgramInvalidStatements).unwrap(),
            "\"PROGRAM_INVALID_STATEMENTS\""
        );
    }
}
