use std::sync::Arc;

use nepo::{
    compile, parse_configuration, parse_program, platform::Platform, report::CompilationReport,
};
use nepo_ast::{configuration::ConfigurationAst, nodes::ProgramAst};

pub(crate) fn get_test_data_path() -> std::path::PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::env::current_dir().unwrap());
    manifest_dir.join("test_data")
}

/// Automatically resolves a test data file path based on the test's module path.
///
/// # Example
/// For a test in `tests/src/pipeline.rs` inside `mod pipeline_tests`,
/// `get_test_file_path(module_path!(), "blink.json")` resolves to
/// `tests/test_data/pipeline/blink.json`
///
/// # Arguments
/// * `module_path` - The module path (use `module_path!()`)
/// * `file_name` - The fixture file name
pub(crate) fn get_test_file_path(module_path: &str, file_name: &str) -> std::path::PathBuf {
    let mut path = get_test_data_path();
    for part in get_test_path_parts(module_path) {
        path = path.join(part);
    }
    path.join(file_name)
}

fn get_test_path_parts(module_path: &str) -> Vec<&str> {
    module_path
        .split("::")
        .skip(1) // skip the crate name
        .filter(|p| !p.ends_with("_tests")) // skip test module names
        .collect()
}

pub(crate) fn read_fixture(module_path: &str, file_name: &str) -> String {
    let path = get_test_file_path(module_path, file_name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Failed to read test file: {path:?}"))
}

pub(crate) fn load_program(module_path: &str, file_name: &str) -> ProgramAst {
    parse_program(&read_fixture(module_path, file_name))
        .unwrap_or_else(|e| panic!("Invalid program fixture {file_name}: {e:#}"))
}

pub(crate) fn load_configuration(module_path: &str, file_name: &str) -> ConfigurationAst {
    parse_configuration(&read_fixture(module_path, file_name))
        .unwrap_or_else(|e| panic!("Invalid configuration fixture {file_name}: {e:#}"))
}

pub(crate) fn load_platform(file_name: &str) -> Arc<Platform> {
    let path = get_test_data_path().join("platforms").join(file_name);
    Arc::new(Platform::load(&path).unwrap())
}

pub(crate) fn uno() -> Arc<Platform> {
    Arc::new(Platform::arduino_uno())
}

/// Compiles a program fixture against a configuration fixture of the same
/// test module.
pub(crate) fn compile_fixture(
    module_path: &str,
    program: &str,
    configuration: &str,
    platform: &Arc<Platform>,
    workflow: &str,
) -> CompilationReport {
    compile(
        load_program(module_path, program),
        load_configuration(module_path, configuration),
        platform,
        workflow,
    )
    .unwrap()
}
