//! Command line definition for the `veritest` runner

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use veritest_core::OutputMode;

/// Veritest test runner.
///
/// Runs the registered test suites and reports results through the selected
/// output sink.
///
/// EXAMPLES:
///     veritest                              Run the default suites
///     veritest math strings                 Run specific suites by key
///     veritest --output colored --mode verbose
///     veritest --output junit --output-file results.xml
///     veritest --test-pattern 'test_add*'   Run matching methods only
#[derive(Parser, Debug)]
#[command(name = "veritest")]
#[command(version)]
pub struct Cli {
    /// Keys of the suites to run; all default suites when empty
    pub suites: Vec<String>,

    /// Output sink
    #[arg(short, long, value_enum, default_value_t = OutputKind::Plain)]
    pub output: OutputKind,

    /// Verbosity of the plain and colored sinks
    #[arg(long, value_enum, default_value_t = Mode::Terse)]
    pub mode: Mode,

    /// Write the report to a file instead of the console
    #[arg(long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Run only test methods whose `name(args)` matches this wildcard
    /// pattern; repeatable, a method runs if any pattern matches
    #[arg(long, value_name = "GLOB")]
    pub test_pattern: Vec<String>,

    /// List the test methods of the selected suites and exit
    #[arg(long)]
    pub list_tests: bool,

    /// List the registered suites and exit
    #[arg(long)]
    pub list_suites: bool,

    /// Abort a test method at its first failed assertion
    #[arg(long)]
    pub no_continue: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Plain text
    Plain,
    /// Colorized console output
    Colored,
    /// GCC-style diagnostics
    Gcc,
    /// MSVC-style diagnostics
    Msvc,
    /// Generic one-line diagnostics
    Generic,
    /// JUnit XML report
    Junit,
    /// Self-contained HTML report
    Html,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Report every method and assertion
    Debug,
    /// Report suite banners and failures
    Verbose,
    /// Report failures only
    Terse,
}

impl Mode {
    pub fn to_output_mode(self) -> OutputMode {
        match self {
            Mode::Debug => OutputMode::Debug,
            Mode::Verbose => OutputMode::Verbose,
            Mode::Terse => OutputMode::Terse,
        }
    }
}
