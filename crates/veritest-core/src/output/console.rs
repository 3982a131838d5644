//! Colorized console output sink

use std::time::Duration;

use colored::Colorize;

use crate::assertion::Assertion;
use crate::output::text::OutputMode;
use crate::output::{file_name, percentage, Output};

/// Writes the same information as [`crate::TextOutput`] to the console,
/// highlighting failures in red and successes in green. Only writes to the
/// terminal; honor `NO_COLOR` through the `colored` crate's own handling.
pub struct ConsoleOutput {
    mode: OutputMode,
}

impl ConsoleOutput {
    pub fn new(mode: OutputMode) -> Self {
        ConsoleOutput { mode }
    }
}

impl Output for ConsoleOutput {
    fn initialize_suite(&mut self, suite_name: &str, num_tests: usize) {
        if self.mode <= OutputMode::Verbose {
            println!(
                "Running suite '{}' with {} tests...",
                suite_name.bold(),
                num_tests
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
            let line = format!(
                "Suite '{}' finished, {}/{} successful ({}%) in {} microseconds ({:.3} ms).",
                suite_name,
                num_positive,
                num_tests,
                percentage(num_positive, num_tests),
                total_duration.as_micros(),
                total_duration.as_secs_f64() * 1000.0
            );
            if num_tests != num_positive {
                println!("{}", line.red());
            } else {
                println!("{}", line);
            }
        }
    }

    fn initialize_test_method(&mut self, _suite_name: &str, method_name: &str, arg_string: &str) {
        if self.mode <= OutputMode::Debug {
            println!(
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
            let line = format!(
                "Test-method '{}({})' finished with {}",
                method_name,
                arg_string,
                if success { "success!" } else { "errors!" }
            );
            if success {
                println!("{}", line);
            } else {
                println!("{}", line.red().bold());
            }
        }
    }

    fn print_exception(&mut self, _suite_name: &str, method_name: &str, arg_string: &str, error: &str) {
        println!(
            "{}",
            format!(
                "Test-method '{}({})' failed with exception!",
                method_name, arg_string
            )
            .red()
            .bold()
        );
        println!("{}", format!("\tException: {}", error).red());
    }

    fn print_success(&mut self, assertion: &Assertion) {
        if self.mode <= OutputMode::Debug {
            println!(
                "{}",
                format!(
                    "Test '{}' line {} successful!",
                    assertion.full_method(),
                    assertion.line
                )
                .green()
            );
        }
    }

    fn print_failure(&mut self, assertion: &Assertion) {
        println!(
            "{}",
            format!("Test '{}' failed!", assertion.full_method())
                .red()
                .bold()
        );
        println!("{}", format!("\tSuite: {}", assertion.suite).red());
        println!(
            "{}",
            format!("\tFile: {}", file_name(&assertion.file)).red()
        );
        println!("{}", format!("\tLine: {}", assertion.line).red());
        if !assertion.error_message.is_empty() {
            println!("{}", format!("\tFailure: {}", assertion.error_message).red());
        }
        if !assertion.user_message.is_empty() {
            println!("{}", format!("\tMessage: {}", assertion.user_message).red());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::{RunnableSuite, Suite};

    #[test]
    fn reports_mixed_results_without_panicking() {
        colored::control::set_override(false);
        let mut suite = Suite::new("console");
        suite.add_test("test_pass", |ctx| ctx.assert_that(true, ""));
        suite.add_test("test_fail", |ctx| ctx.assert_that(false, "nope"));

        let mut sink = ConsoleOutput::new(OutputMode::Verbose);
        assert!(!suite.run(&mut sink, true));
        colored::control::unset_override();
    }
}
