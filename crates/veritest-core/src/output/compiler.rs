//! Compiler-style output sink
//!
//! Formats each failure as a single diagnostic line that editors and IDEs
//! can parse and jump to, using a configurable template with `%file`,
//! `%line` and `%text` placeholders.

use std::io::Write;

use crate::assertion::Assertion;
use crate::output::{file_name, Output};

/// GCC/Clang style: `file:line: error: text`
pub const FORMAT_GCC: &str = "%file:%line: error: %text";
/// MSVC style: `file(line) : error: text`
pub const FORMAT_MSVC: &str = "%file(%line) : error: %text";
/// A neutral fallback style
pub const FORMAT_GENERIC: &str = "file: %file, line: %line: %text";

/// Writes one diagnostic line per failure or exception, nothing else.
pub struct CompilerOutput<W: Write + Send> {
    format: String,
    stream: W,
}

impl<W: Write + Send> CompilerOutput<W> {
    pub fn new(format: impl Into<String>, stream: W) -> Self {
        CompilerOutput {
            format: format.into(),
            stream,
        }
    }

    pub fn into_inner(self) -> W {
        self.stream
    }

    fn write_diagnostic(&mut self, file: &str, line: u32, text: &str) {
        let rendered = self
            .format
            .replace("%file", file)
            .replace("%line", &line.to_string())
            .replace("%text", text);
        let _ = writeln!(self.stream, "{}", rendered);
    }
}

impl<W: Write + Send> Output for CompilerOutput<W> {
    fn print_exception(&mut self, suite_name: &str, method_name: &str, arg_string: &str, error: &str) {
        let text = if arg_string.is_empty() {
            format!("method '{}' failed with exception: {}", method_name, error)
        } else {
            format!(
                "method '{}({})' failed with exception: {}",
                method_name, arg_string, error
            )
        };
        // Exceptions carry no call site; attribute them to the suite.
        self.write_diagnostic(suite_name, 0, &text);
    }

    fn print_failure(&mut self, assertion: &Assertion) {
        let text = if assertion.user_message.is_empty() {
            assertion.error_message.clone()
        } else if assertion.error_message.is_empty() {
            assertion.user_message.clone()
        } else {
            format!("{} ({})", assertion.error_message, assertion.user_message)
        };
        let file = file_name(&assertion.file).to_string();
        self.write_diagnostic(&file, assertion.line, &text);
    }
}
