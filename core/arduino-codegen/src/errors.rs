use thiserror::Error;

/// Reasons code generation can fail on a program that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum CodegenError {
    #[error("program uses component `{name}` which is not configured")]
    MissingComponent { name: String },

    #[error("component `{component}` has no pin for port role `{role}`")]
    MissingPort { component: String, role: String },
}
