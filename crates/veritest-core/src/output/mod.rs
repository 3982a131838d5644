//! Output sinks - consumers of lifecycle and result events
//!
//! The suite engine pushes every lifecycle transition and assertion outcome
//! into an [`Output`] implementation as it happens; sinks decide what to
//! retain or render. Every handler defaults to a no-op so a sink overrides
//! only the events it cares about.

pub mod collector;
pub mod compiler;
pub mod console;
pub mod html;
pub mod synchronized;
pub mod text;
pub mod xml;

use std::io::{self, Write};
use std::time::Duration;

use crate::assertion::Assertion;

/// Receiver for the events a suite run emits.
///
/// Legal call sequence per `run` invocation: `initialize_suite` once, then
/// for each executed method `initialize_test_method` followed by exactly one
/// of `finish_test_method` or `print_exception` (with any number of
/// `print_success` / `print_failure` calls in between), then `finish_suite`
/// once before the suite recurses into its children.
///
/// Sinks must be `Send` so they can be shared across a parallel suite's
/// worker threads behind a [`synchronized::SynchronizedOutput`].
pub trait Output: Send {
    /// Called once before any method events of a suite run.
    fn initialize_suite(&mut self, _suite_name: &str, _num_tests: usize) {}

    /// Called once after all of a suite's own methods have run.
    ///
    /// `num_positive <= num_tests` always holds.
    fn finish_suite(
        &mut self,
        _suite_name: &str,
        _num_tests: usize,
        _num_positive: usize,
        _total_duration: Duration,
    ) {
    }

    /// Called before a test method body is invoked.
    fn initialize_test_method(&mut self, _suite_name: &str, _method_name: &str, _arg_string: &str) {
    }

    /// Called after a test method body returned without panicking.
    fn finish_test_method(
        &mut self,
        _suite_name: &str,
        _method_name: &str,
        _arg_string: &str,
        _success: bool,
    ) {
    }

    /// Called when a test method body panicked.
    ///
    /// `finish_test_method` is skipped for that method; the two completion
    /// events are mutually exclusive.
    fn print_exception(
        &mut self,
        _suite_name: &str,
        _method_name: &str,
        _arg_string: &str,
        _error: &str,
    ) {
    }

    /// A passed assertion.
    fn print_success(&mut self, _assertion: &Assertion) {}

    /// A failed assertion.
    fn print_failure(&mut self, _assertion: &Assertion) {}

    /// Capability query: sinks that can render a supplementary report after
    /// the run (e.g. HTML) expose it here instead of being discovered by
    /// downcasting.
    fn report_generator(&mut self) -> Option<&mut dyn ReportGenerator> {
        None
    }
}

/// Post-run report generation, exposed through [`Output::report_generator`].
pub trait ReportGenerator {
    fn generate(
        &mut self,
        stream: &mut dyn Write,
        include_passed: bool,
        title: &str,
    ) -> io::Result<()>;
}

/// Fraction as a percentage with two decimals.
pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    if part == 0 || whole == 0 {
        return 0.0;
    }
    let scaled = ((part as f64 / whole as f64) * 10_000.0) as i64;
    scaled as f64 / 100.0
}

/// File name without any leading directories.
pub(crate) fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_to_two_decimals() {
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.66);
        assert_eq!(percentage(3, 3), 100.0);
        assert_eq!(percentage(0, 3), 0.0);
        assert_eq!(percentage(1, 0), 0.0);
    }

    #[test]
    fn file_name_strips_directories() {
        assert_eq!(file_name("src/output/text.rs"), "text.rs");
        assert_eq!(file_name("C:\\tests\\math.rs"), "math.rs");
        assert_eq!(file_name("plain.rs"), "plain.rs");
    }
}
