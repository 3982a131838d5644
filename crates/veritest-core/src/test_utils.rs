//! Shared test helpers: an event-recording output sink

use std::time::Duration;

use crate::assertion::Assertion;
use crate::output::Output;

/// One observed sink event, with durations stripped so event logs compare
/// deterministically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    InitSuite {
        suite: String,
        tests: usize,
    },
    FinishSuite {
        suite: String,
        tests: usize,
        positive: usize,
    },
    InitMethod {
        method: String,
    },
    FinishMethod {
        method: String,
        success: bool,
    },
    Exception {
        method: String,
        error: String,
    },
    Success {
        method: String,
    },
    Failure {
        method: String,
        error: String,
    },
}

/// Records every event it receives, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingOutput {
    pub events: Vec<Event>,
}

impl Output for RecordingOutput {
    fn initialize_suite(&mut self, suite_name: &str, num_tests: usize) {
        self.events.push(Event::InitSuite {
            suite: suite_name.to_string(),
            tests: num_tests,
        });
    }

    fn finish_suite(
        &mut self,
        suite_name: &str,
        num_tests: usize,
        num_positive: usize,
        _total_duration: Duration,
    ) {
        self.events.push(Event::FinishSuite {
            suite: suite_name.to_string(),
            tests: num_tests,
            positive: num_positive,
        });
    }

    fn initialize_test_method(&mut self, _suite_name: &str, method_name: &str, _arg_string: &str) {
        self.events.push(Event::InitMethod {
            method: method_name.to_string(),
        });
    }

    fn finish_test_method(
        &mut self,
        _suite_name: &str,
        method_name: &str,
        _arg_string: &str,
        success: bool,
    ) {
        self.events.push(Event::FinishMethod {
            method: method_name.to_string(),
            success,
        });
    }

    fn print_exception(
        &mut self,
        _suite_name: &str,
        method_name: &str,
        _arg_string: &str,
        error: &str,
    ) {
        self.events.push(Event::Exception {
            method: method_name.to_string(),
            error: error.to_string(),
        });
    }

    fn print_success(&mut self, assertion: &Assertion) {
        self.events.push(Event::Success {
            method: assertion.method.clone(),
        });
    }

    fn print_failure(&mut self, assertion: &Assertion) {
        self.events.push(Event::Failure {
            method: assertion.method.clone(),
            error: assertion.error_message.clone(),
        });
    }
}
