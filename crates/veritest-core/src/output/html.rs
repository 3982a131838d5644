//! Self-contained HTML report sink
//!
//! Collects results during the run and renders a single static HTML page on
//! demand through the [`ReportGenerator`] capability.

use std::io::{self, Write};
use std::time::Duration;

use crate::assertion::Assertion;
use crate::output::collector::CollectorOutput;
use crate::output::{file_name, percentage, Output, ReportGenerator};

fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2em; }\n\
table { border-collapse: collapse; margin-bottom: 2em; }\n\
th, td { border: 1px solid #999; padding: 0.3em 0.8em; text-align: left; }\n\
th { background: #eee; }\n\
tr.passed td.result { color: #070; }\n\
tr.failed td.result { color: #b00; font-weight: bold; }\n\
pre { margin: 0; }\n";

/// Retains all results and renders them as one HTML page after the run.
///
/// The run itself produces no output; call
/// [`Output::report_generator`] and [`ReportGenerator::generate`] once the
/// suites have finished.
#[derive(Default)]
pub struct HtmlOutput {
    collector: CollectorOutput,
}

impl HtmlOutput {
    pub fn new() -> Self {
        HtmlOutput::default()
    }
}

impl Output for HtmlOutput {
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

    fn report_generator(&mut self) -> Option<&mut dyn ReportGenerator> {
        Some(self)
    }
}

impl ReportGenerator for HtmlOutput {
    fn generate(
        &mut self,
        stream: &mut dyn Write,
        include_passed: bool,
        title: &str,
    ) -> io::Result<()> {
        let title = html_escape(title);
        writeln!(stream, "<!DOCTYPE html>")?;
        writeln!(stream, "<html>\n<head>")?;
        writeln!(stream, "<meta charset=\"utf-8\">")?;
        writeln!(stream, "<title>{}</title>", title)?;
        writeln!(stream, "<style>\n{}</style>", STYLE)?;
        writeln!(stream, "</head>\n<body>")?;
        writeln!(stream, "<h1>{}</h1>", title)?;

        writeln!(stream, "<h2>Overview</h2>")?;
        writeln!(stream, "<table>")?;
        writeln!(
            stream,
            "<tr><th>Suite</th><th>Tests</th><th>Successful</th><th>Rate</th><th>Duration</th></tr>"
        )?;
        for suite in self.collector.suites() {
            writeln!(
                stream,
                "<tr><td><a href=\"#{0}\">{0}</a></td><td>{1}</td><td>{2}</td><td>{3}%</td><td>{4:.3} ms</td></tr>",
                html_escape(&suite.suite_name),
                suite.num_tests,
                suite.num_positive,
                percentage(suite.num_positive, suite.num_tests),
                suite.duration.as_secs_f64() * 1000.0
            )?;
        }
        writeln!(stream, "</table>")?;

        for suite in self.collector.suites() {
            let name = html_escape(&suite.suite_name);
            writeln!(stream, "<h2 id=\"{0}\">Suite '{0}'</h2>", name)?;
            writeln!(stream, "<table>")?;
            writeln!(
                stream,
                "<tr><th>Method</th><th>Result</th><th>Details</th></tr>"
            )?;
            for method in &suite.methods {
                if method.success && !include_passed {
                    continue;
                }
                let (class, verdict) = if method.success {
                    ("passed", "passed")
                } else {
                    ("failed", "failed")
                };
                let mut details = String::new();
                if let Some(message) = &method.exception_message {
                    details.push_str(&format!("Exception: {}\n", html_escape(message)));
                }
                for assertion in &method.failed_assertions {
                    details.push_str(&format!(
                        "{}:{}: {}",
                        html_escape(file_name(&assertion.file)),
                        assertion.line,
                        html_escape(&assertion.error_message)
                    ));
                    if !assertion.user_message.is_empty() {
                        details.push_str(&format!(" ({})", html_escape(&assertion.user_message)));
                    }
                    details.push('\n');
                }
                writeln!(
                    stream,
                    "<tr class=\"{}\"><td>{}</td><td class=\"result\">{}</td><td><pre>{}</pre></td></tr>",
                    class,
                    html_escape(&method.display_name()),
                    verdict,
                    details.trim_end()
                )?;
            }
            writeln!(stream, "</table>")?;
        }

        writeln!(stream, "</body>\n</html>")?;
        stream.flush()
    }
}
