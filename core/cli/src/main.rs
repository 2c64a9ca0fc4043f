#![warn(clippy::pedantic)]

//! # NEPO Compiler CLI
//!
//! Command line interface for the NEPO block program compiler.
//!
//! 1. Read the program and configuration JSON and build validated trees.
//! 2. Load the platform (`--platform`, or the built-in Arduino Uno).
//! 3. Run the selected workflow (`--workflow`, default `compile`).
//! 4. Print diagnostics to stderr, and the sketch to stdout or `-o <file>`.
//!
//! With `--json` the whole report is printed to stdout as JSON instead.
//!
//! ## Exit codes
//! * 0 – the program compiled (or validated) without errors.
//! * 1 – usage, IO or input errors, or a program with errors.
//!
//! ## Example
//! ```bash
//! nepoc blink.json --configuration uno.json -o blink.ino
//! ```

mod parser;

use std::{fs, path::Path, process, sync::Arc};

use anyhow::Context;
use clap::Parser;
use nepo::{
    compile, parse_configuration, parse_program, platform::Platform, report::CompilationReport,
};
use parser::Cli;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let args = Cli::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(report) if report.is_success() => process::exit(0),
        Ok(_) => process::exit(1),
        Err(err) => {
            eprintln!("Error: {err:#}");
            process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(args: &Cli) -> anyhow::Result<CompilationReport> {
    let program = parse_program(&read(&args.program)?)
        .with_context(|| format!("In program `{}`", args.program.display()))?;
    let configuration = match &args.configuration {
        Some(path) => parse_configuration(&read(path)?)
            .with_context(|| format!("In configuration `{}`", path.display()))?,
        None => Default::default(),
    };
    let platform = match &args.platform {
        Some(path) => Platform::load(path)?,
        None => Platform::arduino_uno(),
    };
    info!(platform = %platform.name, workflow = %args.workflow, "compiling");

    let report = compile(program, configuration, &Arc::new(platform), &args.workflow)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(report);
    }
    eprintln!("{report}");
    if let Some(source) = &report.source {
        match &args.output {
            Some(path) => {
                fs::write(path, source)
                    .with_context(|| format!("Failed to write `{}`", path.display()))?;
                println!("Sketch written to: {}", path.display());
            }
            None => print!("{source}"),
        }
    }
    Ok(report)
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read `{}`", path.display()))
}
