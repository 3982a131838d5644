//! Plain text output sink

use std::io::{self, Write};
use std::time::Duration;

use crate::assertion::Assertion;
use crate::output::{file_name, percentage, Output};

/// Verbosity of the text sinks, in increasing order of information printed:
/// `Terse` < `Verbose` < `Debug`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OutputMode {
    /// Everything: suite banners, every method, every assertion
    Debug,
    /// Suite banners and failed methods
    Verbose,
    /// Failures only
    Terse,
}

/// Writes results as plain text to any stream.
///
/// Failure detail is always written; success detail only in `Debug` mode.
/// Write errors are ignored, matching the fire-and-forget nature of
/// progress output.
pub struct TextOutput<W: Write + Send> {
    stream: W,
    mode: OutputMode,
}

impl TextOutput<io::Stdout> {
    pub fn new(mode: OutputMode) -> Self {
        TextOutput::with_stream(mode, io::stdout())
    }
}

impl<W: Write + Send> TextOutput<W> {
    pub fn with_stream(mode: OutputMode, stream: W) -> Self {
        TextOutput { stream, mode }
    }

    pub fn into_inner(self) -> W {
        self.stream
    }
}

impl<W: Write + Send> Output for TextOutput<W> {
    fn initialize_suite(&mut self, suite_name: &str, num_tests: usize) {
        if self.mode <= OutputMode::Verbose {
            let _ = writeln!(
                self.stream,
                "Running suite '{}' with {} tests...",
                suite_name, num_tests
            );
        }
    }

    fn finish_suite(
        &mut self,
        suite_name: &str,
        num_tests: usize,
        num_positive: usize,
        total_duration: Duration,
    ) {
        if self.mode <= OutputMode::Verbose || num_tests != num_positive {
            let _ = writeln!(
                self.stream,
                "Suite '{}' finished, {}/{} successful ({}%) in {} microseconds ({:.3} ms).",
                suite_name,
                num_positive,
                num_tests,
                percentage(num_positive, num_tests),
                total_duration.as_micros(),
                total_duration.as_secs_f64() * 1000.0
            );
        }
        let _ = self.stream.flush();
    }

    fn initialize_test_method(&mut self, _suite_name: &str, method_name: &str, arg_string: &str) {
        if self.mode <= OutputMode::Debug {
            let _ = writeln!(
                self.stream,
                "Running method '{}'{}{}...",
                method_name,
                if arg_string.is_empty() {
                    ""
                } else {
                    " with argument: "
                },
                arg_string
            );
        }
    }

    fn finish_test_method(
        &mut self,
        _suite_name: &str,
        method_name: &str,
        arg_string: &str,
        success: bool,
    ) {
        if self.mode <= OutputMode::Debug || (self.mode <= OutputMode::Verbose && !success) {
            let _ = writeln!(
                self.stream,
                "Test-method '{}({})' finished with {}",
                method_name,
                arg_string,
                if success { "success!" } else { "errors!" }
            );
        }
    }

    fn print_exception(&mut self, _suite_name: &str, method_name: &str, arg_string: &str, error: &str) {
        let _ = writeln!(
            self.stream,
            "Test-method '{}({})' failed with exception!",
            method_name, arg_string
        );
        let _ = writeln!(self.stream, "\tException: {}", error);
    }

    fn print_success(&mut self, assertion: &Assertion) {
        if self.mode <= OutputMode::Debug {
            let _ = writeln!(
                self.stream,
                "Test '{}' line {} successful!",
                assertion.full_method(),
                assertion.line
            );
        }
    }

    fn print_failure(&mut self, assertion: &Assertion) {
        let _ = writeln!(self.stream, "Test '{}' failed!", assertion.full_method());
        let _ = writeln!(self.stream, "\tSuite: {}", assertion.suite);
        let _ = writeln!(self.stream, "\tFile: {}", file_name(&assertion.file));
        let _ = writeln!(self.stream, "\tLine: {}", assertion.line);
        if !assertion.error_message.is_empty() {
            let _ = writeln!(self.stream, "\tFailure: {}", assertion.error_message);
        }
        if !assertion.user_message.is_empty() {
            let _ = writeln!(self.stream, "\tMessage: {}", assertion.user_message);
        }
    }
}
