#![warn(clippy::pedantic)]

//! NEPO Compiler Core
//!
//! Validates block programs written for a robot configuration and compiles
//! them to Arduino sketches.
//!
//! ## Compilation Phases
//!
//! 1. **Build**: JSON interchange → validated program and configuration trees
//! 2. **Validate**: pin conflicts, required ports, program checks
//! 3. **Type check**: expression and statement types
//! 4. **Generate**: Arduino sketch text
//!
//! Phases 2 to 4 are [`worker`]s. A [`platform::Platform`] names the ordered
//! worker lists it supports, and [`compile`] runs one of them over a fresh
//! [`project::Project`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use nepo::{compile, parse_configuration, parse_program, platform::Platform};
//!
//! let platform = Arc::new(Platform::arduino_uno());
//! let program = parse_program(&program_json)?;
//! let configuration = parse_configuration(&configuration_json)?;
//! let report = compile(program, configuration, &platform, "compile")?;
//! if let Some(sketch) = &report.source {
//!     println!("{sketch}");
//! }
//! ```
//!
//! ## Threading
//!
//! Trees use `Rc` and a project never leaves the thread that built it. Run
//! concurrent requests on separate threads, each parsing its own input, and
//! share the immutable platform through an `Arc`.

use std::sync::Arc;

use anyhow::Context;
use nepo_ast::{
    builder::{RawConfiguration, RawProgram, build_configuration, build_program},
    configuration::ConfigurationAst,
    nodes::ProgramAst,
};

use crate::{platform::Platform, project::Project, report::CompilationReport, worker::Workflow};

pub mod bean;
pub mod platform;
pub mod project;
pub mod report;
pub mod result;
pub mod validator;
pub mod worker;

/// Parses a program from its JSON interchange form.
///
/// # Errors
///
/// Returns an error if `source` is not valid JSON of the expected shape or
/// a node factory rejects a block.
pub fn parse_program(source: &str) -> anyhow::Result<ProgramAst> {
    let raw: RawProgram = serde_json::from_str(source).context("Failed to parse program JSON")?;
    build_program(&raw).context("Invalid program")
}

/// Parses a robot configuration from its JSON interchange form.
///
/// # Errors
///
/// Returns an error if `source` is not valid JSON of the expected shape or
/// a component is rejected.
pub fn parse_configuration(source: &str) -> anyhow::Result<ConfigurationAst> {
    let raw: RawConfiguration =
        serde_json::from_str(source).context("Failed to parse configuration JSON")?;
    build_configuration(&raw).context("Invalid configuration")
}

/// Runs the platform workflow `workflow` over a new project.
///
/// Program errors and worker errors both end up in the report. Only a
/// workflow the platform does not define is an `Err`.
///
/// # Errors
///
/// Returns an error if `platform` has no workflow named `workflow`.
pub fn compile(
    program: ProgramAst,
    configuration: ConfigurationAst,
    platform: &Arc<Platform>,
    workflow: &str,
) -> anyhow::Result<CompilationReport> {
    let kinds = platform
        .workflow(workflow)
        .with_context(|| format!("Cannot compile for platform `{}`", platform.name))?;
    let workflow = Workflow::from_kinds(workflow, kinds, platform);
    let mut project = Project::new(program, configuration);
    let workflow_error = workflow.run(&mut project).err().map(|err| err.to_string());
    Ok(CompilationReport::from_project(&project, workflow_error))
}
