//! Command line argument parsing for the NEPO compiler.

use std::path::PathBuf;

use clap::Parser;

/// Command line interface definition for the NEPO compiler.
///
/// `nepoc` reads a block program and a robot configuration, both in their
/// JSON interchange form, and runs one workflow of the target platform over
/// them.
///
/// ## Examples
///
/// Check a program without generating code:
/// ```bash
/// nepoc blink.json --configuration uno.json --workflow validate
/// ```
///
/// Compile and write the sketch:
/// ```bash
/// nepoc blink.json --configuration uno.json -o blink.ino
/// ```
#[derive(Parser, Debug)]
#[command(
    name = "nepoc",
    author,
    version,
    about = "NEPO block program compiler (nepoc)",
    long_about = "The 'nepoc' command validates a NEPO block program against a robot configuration \
and compiles it to an Arduino sketch. Diagnostics go to stderr; the sketch goes to stdout unless -o is given."
)]
pub(crate) struct Cli {
    /// Path to the program JSON file.
    pub(crate) program: PathBuf,

    /// Path to the robot configuration JSON file.
    ///
    /// Without one the program is checked against an empty configuration.
    #[arg(short = 'c', long)]
    pub(crate) configuration: Option<PathBuf>,

    /// Platform description in TOML. Defaults to the built-in Arduino Uno.
    #[arg(short = 'p', long)]
    pub(crate) platform: Option<PathBuf>,

    /// Workflow of the platform to run.
    #[arg(short = 'w', long, default_value = "compile")]
    pub(crate) workflow: String,

    /// Write the generated sketch to this file instead of stdout.
    #[arg(short = 'o', long = "output")]
    pub(crate) output: Option<PathBuf>,

    /// Print the full report as JSON on stdout.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub(crate) json: bool,

    /// Log the pipeline at debug level unless `RUST_LOG` says otherwise.
    #[arg(short = 'v', long, action = clap::ArgAction::SetTrue)]
    pub(crate) verbose: bool,
}
