//! JUnit XML output sink
//!
//! Renders results in the JUnit XML format understood by most CI tools.
//! Each `<testsuite>` element is written when its suite finishes; the
//! surrounding `<testsuites>` element is opened at construction and closed
//! by [`XmlOutput::finish`] (or on drop).

use std::io::{self, Write};
use std::time::Duration;

use chrono::Utc;

use crate::assertion::Assertion;
use crate::output::collector::CollectorOutput;
use crate::output::{file_name, Output};

/// Replaces the five XML-reserved characters with entities.
fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn fractional_seconds(duration: Duration) -> String {
    format!("{}.{:03}", duration.as_secs(), duration.subsec_millis())
}

/// Collector-backed sink producing a JUnit XML report.
pub struct XmlOutput<W: Write + Send> {
    collector: CollectorOutput,
    writer: Option<W>,
}

impl<W: Write + Send> XmlOutput<W> {
    pub fn new(mut writer: W) -> Self {
        let _ = writer.write_all(b"<?xml version=\"1.0\" ?>\n<testsuites>\n");
        XmlOutput {
            collector: CollectorOutput::new(),
            writer: Some(writer),
        }
    }

    /// Closes the report and hands back the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        let mut writer = self.writer.take().expect("writer already taken");
        writer.write_all(b"</testsuites>\n")?;
        writer.flush()?;
        Ok(writer)
    }

    fn write_suite_element(&mut self) {
        let suite = match self.collector.suites().last() {
            Some(suite) => suite,
            None => return,
        };
        let writer = match self.writer.as_mut() {
            Some(writer) => writer,
            None => return,
        };

        let num_errors = suite
            .methods
            .iter()
            .filter(|method| method.exception_message.is_some())
            .count();
        let num_failures = suite
            .num_tests
            .saturating_sub(suite.num_positive)
            .saturating_sub(num_errors);
        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%S");

        let _ = writeln!(
            writer,
            "\t<testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" errors=\"{}\" time=\"{}\" timestamp=\"{}\">",
            xml_escape(&suite.suite_name),
            suite.num_tests,
            num_failures,
            num_errors,
            fractional_seconds(suite.duration),
            timestamp
        );

        for method in &suite.methods {
            let _ = writeln!(
                writer,
                "\t\t<testcase classname=\"{}\" name=\"{}\">",
                xml_escape(&suite.suite_name),
                xml_escape(&method.display_name())
            );
            if let Some(message) = &method.exception_message {
                let _ = writeln!(
                    writer,
                    "\t\t\t<error message=\"{}\" type=\"\"/>",
                    xml_escape(message)
                );
            } else if method.failed_assertions.is_empty() && method.passed_assertions.is_empty() {
                let _ = writeln!(
                    writer,
                    "\t\t\t<skipped message=\"Test case has no assertions\" type=\"\"/>"
                );
            } else if !method.failed_assertions.is_empty() {
                let _ = writeln!(
                    writer,
                    "\t\t\t<failure message=\"{} assertions failed\" type=\"\">",
                    method.failed_assertions.len()
                );
                for assertion in &method.failed_assertions {
                    let _ = writeln!(
                        writer,
                        "\t\t\t\tFailure: {}",
                        xml_escape(&assertion.error_message)
                    );
                    let _ = writeln!(writer, "\t\t\t\tFile: {}", file_name(&assertion.file));
                    let _ = writeln!(writer, "\t\t\t\tLine: {}", assertion.line);
                    if !assertion.user_message.is_empty() {
                        let _ = writeln!(
                            writer,
                            "\t\t\t\tMessage: {}",
                            xml_escape(&assertion.user_message)
                        );
                    }
                    let _ = writeln!(writer);
                }
                let _ = writeln!(writer, "\t\t\t</failure>");
            }
            let _ = writeln!(writer, "\t\t</testcase>");
        }

        let _ = writeln!(writer, "\t</testsuite>");
    }
}

impl<W: Write + Send> Drop for XmlOutput<W> {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            let _ = writer.write_all(b"</testsuites>\n");
            let _ = writer.flush();
        }
    }
}

impl<W: Write + Send> Output for XmlOutput<W> {
    fn initialize_suite(&mut self, suite_name: &str, num_tests: usize) {
        self.collector.initialize_suite(suite_name, num_tests);
    }

    fn finish_suite(
        &mut self,
        suite_name: &str,
        num_tests: usize,
        num_positive: usize,
        total_duration: Duration,
    ) {
        self.collector
            .finish_suite(suite_name, num_tests, num_positive, total_duration);
        self.write_suite_element();
    }

    fn initialize_test_method(&mut self, suite_name: &str, method_name: &str, arg_string: &str) {
        self.collector
            .initialize_test_method(suite_name, method_name, arg_string);
    }

    fn finish_test_method(
        &mut self,
        suite_name: &str,
        method_name: &str,
        arg_string: &str,
        success: bool,
    ) {
        self.collector
            .finish_test_method(suite_name, method_name, arg_string, success);
    }

    fn print_exception(&mut self, suite_name: &str, method_name: &str, arg_string: &str, error: &str) {
        self.collector
            .print_exception(suite_name, method_name, arg_string, error);
    }

    fn print_success(&mut self, assertion: &Assertion) {
        self.collector.print_success(assertion);
    }

    fn print_failure(&mut self, assertion: &Assertion) {
        self.collector.print_failure(assertion);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::{RunnableSuite, Suite};

    fn run_to_xml(suite: &mut Suite) -> String {
        let mut sink = XmlOutput::new(Vec::new());
        suite.run(&mut sink, true);
        String::from_utf8(sink.finish().unwrap()).unwrap()
    }

    #[test]
    fn wraps_everything_in_testsuites() {
        let mut suite = Suite::new("xml");
        suite.add_test("test_ok", |ctx| ctx.assert_that(true, ""));
        let xml = run_to_xml(&mut suite);
        assert!(xml.starts_with("<?xml version=\"1.0\" ?>\n<testsuites>\n"));
        assert!(xml.ends_with("</testsuites>\n"));
        assert!(xml.contains("<testsuite name=\"xml\" tests=\"1\" failures=\"0\" errors=\"0\""));
        assert!(xml.contains("<testcase classname=\"xml\" name=\"test_ok\">"));
    }

    #[test]
    fn classifies_failures_errors_and_skips() {
        let mut suite = Suite::new("mixed");
        suite.add_test("test_fails", |ctx| ctx.assert_eq(1, 2, "off by one"));
        suite.add_test("test_panics", |_ctx| panic!("broken"));
        suite.add_test("test_empty", |_ctx| {});

        let xml = run_to_xml(&mut suite);
        assert!(xml.contains("tests=\"3\" failures=\"1\" errors=\"1\""));
        assert!(xml.contains("<failure message=\"1 assertions failed\" type=\"\">"));
        assert!(xml.contains("Failure: Got 2, expected 1"));
        assert!(xml.contains("Message: off by one"));
        assert!(xml.contains("<error message=\"broken\" type=\"\"/>"));
        assert!(xml.contains("<skipped message=\"Test case has no assertions\" type=\"\"/>"));
    }

    #[test]
    fn escapes_reserved_characters() {
        let mut suite = Suite::new("escape");
        suite.add_test_with("test_text", "<&>\"", |ctx, _text| {
            ctx.assert_that(true, "");
        });
        let xml = run_to_xml(&mut suite);
        assert!(xml.contains("name=\"test_text(&quot;&lt;&amp;&gt;&quot;&quot;)\""));
        assert!(!xml.contains("name=\"test_text(\"<"));
    }

    #[test]
    fn footer_is_written_on_drop() {
        let mut suite = Suite::new("dropped");
        suite.add_test("test_ok", |ctx| ctx.assert_that(true, ""));
        // No way to get the buffer back after drop; just exercise the path.
        let mut sink = XmlOutput::new(Vec::new());
        suite.run(&mut sink, true);
        drop(sink);
    }

    #[test]
    fn fractional_seconds_pad_milliseconds() {
        assert_eq!(fractional_seconds(Duration::from_millis(1_234)), "1.234");
        assert_eq!(fractional_seconds(Duration::from_millis(5)), "0.005");
    }
}
