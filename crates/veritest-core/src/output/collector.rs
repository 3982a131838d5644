//! Retaining sink for post-run rendering
//!
//! The suite engine never retains assertion results; sinks that render a
//! complete report after the run (JUnit XML, HTML) collect them here.

use std::time::Duration;

use crate::assertion::Assertion;
use crate::output::Output;

/// Everything observed about one test method invocation.
#[derive(Debug, Clone)]
pub struct MethodRecord {
    pub method_name: String,
    pub arg_string: String,
    pub passed_assertions: Vec<Assertion>,
    pub failed_assertions: Vec<Assertion>,
    pub exception_message: Option<String>,
    pub success: bool,
}

impl MethodRecord {
    fn new(method_name: &str, arg_string: &str) -> Self {
        MethodRecord {
            method_name: method_name.to_string(),
            arg_string: arg_string.to_string(),
            passed_assertions: Vec::new(),
            failed_assertions: Vec::new(),
            exception_message: None,
            success: false,
        }
    }

    /// The `name(args)` display form, without parentheses for methods
    /// registered without arguments.
    pub fn display_name(&self) -> String {
        if self.arg_string.is_empty() {
            self.method_name.clone()
        } else {
            format!("{}({})", self.method_name, self.arg_string)
        }
    }
}

/// Everything observed about one suite run.
#[derive(Debug, Clone)]
pub struct SuiteRecord {
    pub suite_name: String,
    pub num_tests: usize,
    pub num_positive: usize,
    pub duration: Duration,
    pub methods: Vec<MethodRecord>,
}

/// Collects all suite and method records for processing after the run.
///
/// Suite and method names are not unique across a run, so the current
/// records are tracked by index, following the event stream. This assumes
/// a serialized, non-interleaved stream: all of a suite's method events
/// arrive between its `initialize_suite` and `finish_suite`. Children of a
/// [`crate::ParallelSuite`] interleave their events even behind a
/// synchronized adapter, so a collector fed by such a run can attribute
/// methods to the wrong suite record. Receiving a method or assertion
/// event before the matching initialize event is a broken-sink condition
/// and panics.
#[derive(Debug, Default)]
pub struct CollectorOutput {
    suites: Vec<SuiteRecord>,
    current_suite: Option<usize>,
}

impl CollectorOutput {
    pub fn new() -> Self {
        CollectorOutput::default()
    }

    pub fn suites(&self) -> &[SuiteRecord] {
        &self.suites
    }

    fn current_suite_mut(&mut self) -> &mut SuiteRecord {
        let index = self.current_suite.expect("suite event before initialize_suite");
        &mut self.suites[index]
    }

    fn current_method_mut(&mut self) -> &mut MethodRecord {
        self.current_suite_mut()
            .methods
            .last_mut()
            .expect("method event before initialize_test_method")
    }
}

impl Output for CollectorOutput {
    fn initialize_suite(&mut self, suite_name: &str, num_tests: usize) {
        self.suites.push(SuiteRecord {
            suite_name: suite_name.to_string(),
            num_tests,
            num_positive: 0,
            duration: Duration::ZERO,
            methods: Vec::new(),
        });
        self.current_suite = Some(self.suites.len() - 1);
    }

    fn finish_suite(
        &mut self,
        _suite_name: &str,
        _num_tests: usize,
        num_positive: usize,
        total_duration: Duration,
    ) {
        let suite = self.current_suite_mut();
        suite.num_positive = num_positive;
        suite.duration = total_duration;
    }

    fn initialize_test_method(&mut self, _suite_name: &str, method_name: &str, arg_string: &str) {
        let record = MethodRecord::new(method_name, arg_string);
        self.current_suite_mut().methods.push(record);
    }

    fn finish_test_method(
        &mut self,
        _suite_name: &str,
        _method_name: &str,
        _arg_string: &str,
        success: bool,
    ) {
        self.current_method_mut().success = success;
    }

    fn print_exception(
        &mut self,
        _suite_name: &str,
        _method_name: &str,
        _arg_string: &str,
        error: &str,
    ) {
        let method = self.current_method_mut();
        method.success = false;
        method.exception_message = Some(error.to_string());
    }

    fn print_success(&mut self, assertion: &Assertion) {
        self.current_method_mut()
            .passed_assertions
            .push(assertion.clone());
    }

    fn print_failure(&mut self, assertion: &Assertion) {
        self.current_method_mut()
            .failed_assertions
            .push(assertion.clone());
    }
}
