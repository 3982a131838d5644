//! The per-method assertion surface handed to every test body
//!
//! A [`TestContext`] carries the transient state of the method currently
//! executing and routes every assertion outcome to the output sink the
//! moment it is evaluated. Call sites are captured through `#[track_caller]`
//! so each [`Assertion`] carries the file and line of the check itself.

use std::any::Any;
use std::ops::Sub;
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe, Location};

use crate::assertion::Assertion;
use crate::format::ArgFormat;
use crate::output::Output;

/// Sentinel unwind payload for a deliberate method abort.
///
/// Raised with `resume_unwind` so the panic hook never fires for control
/// flow; recognized and swallowed at the method-invocation boundary.
pub(crate) struct MethodAbort;

/// Extracts a printable message from a panic payload. Payloads that are not
/// strings are normalized to a generic runtime error.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panicked with a non-string payload".to_string()
    }
}

/// Assertion surface for one test method invocation.
pub struct TestContext<'a> {
    pub(crate) suite: &'a str,
    pub(crate) method: &'a str,
    pub(crate) args: &'a str,
    pub(crate) continue_on_failure: bool,
    pub(crate) succeeded: bool,
    pub(crate) output: &'a mut dyn Output,
}

impl<'a> TestContext<'a> {
    pub(crate) fn new(
        suite: &'a str,
        method: &'a str,
        args: &'a str,
        continue_on_failure: bool,
        output: &'a mut dyn Output,
    ) -> Self {
        TestContext {
            suite,
            method,
            args,
            continue_on_failure,
            succeeded: true,
            output,
        }
    }

    /// Whether the current method has already failed (but kept executing).
    pub fn has_failed(&self) -> bool {
        !self.succeeded
    }

    /// Checks a boolean condition.
    #[track_caller]
    pub fn assert_that(&mut self, condition: bool, message: &str) {
        self.record(condition, || "Assertion failed".to_string(), message);
    }

    /// Checks `actual` against `expected`.
    #[track_caller]
    pub fn assert_eq<T, U>(&mut self, expected: T, actual: U, message: &str)
    where
        T: PartialEq<U> + ArgFormat,
        U: ArgFormat,
    {
        let success = expected == actual;
        self.record(
            success,
            || {
                format!(
                    "Got {}, expected {}",
                    actual.format_arg(),
                    expected.format_arg()
                )
            },
            message,
        );
    }

    /// Checks that `actual` is within `delta` of `expected`.
    #[track_caller]
    pub fn assert_delta<T>(&mut self, expected: T, actual: T, delta: T, message: &str)
    where
        T: PartialOrd + Sub<Output = T> + Copy + ArgFormat,
    {
        let distance = if actual >= expected {
            actual - expected
        } else {
            expected - actual
        };
        self.record(
            distance <= delta,
            || {
                format!(
                    "Got {}, expected {} +/- {}",
                    actual.format_arg(),
                    expected.format_arg(),
                    delta.format_arg()
                )
            },
            message,
        );
    }

    /// Checks that the given closure panics.
    #[track_caller]
    pub fn assert_panics<F: FnOnce()>(&mut self, body: F, message: &str) {
        let result = catch_unwind(AssertUnwindSafe(body));
        self.record(
            result.is_err(),
            || "Expected panic did not occur".to_string(),
            message,
        );
    }

    /// Checks that the given closure does not panic.
    #[track_caller]
    pub fn assert_no_panic<F: FnOnce()>(&mut self, body: F, message: &str) {
        match catch_unwind(AssertUnwindSafe(body)) {
            Ok(()) => self.record(true, String::new, message),
            Err(payload) => {
                let error = panic_message(payload.as_ref());
                self.record(false, || format!("Unexpected panic: {}", error), message);
            }
        }
    }

    /// Records an unconditional failure, continuing the method body unless
    /// the run was started without continue-on-failure.
    #[track_caller]
    pub fn fail(&mut self, message: &str) {
        self.record(false, String::new, message);
    }

    /// Records a failure and aborts the current method immediately.
    #[track_caller]
    pub fn fail_now(&mut self, message: &str) -> ! {
        let assertion = self.make_assertion(Location::caller(), "Test method aborted", message);
        self.succeeded = false;
        self.output.print_failure(&assertion);
        resume_unwind(Box::new(MethodAbort))
    }

    #[track_caller]
    fn record(&mut self, success: bool, error: impl FnOnce() -> String, message: &str) {
        let error_message = if success { String::new() } else { error() };
        let assertion = self.make_assertion(Location::caller(), &error_message, message);
        if success {
            self.output.print_success(&assertion);
        } else {
            self.succeeded = false;
            self.output.print_failure(&assertion);
            if !self.continue_on_failure {
                resume_unwind(Box::new(MethodAbort));
            }
        }
    }

    fn make_assertion(
        &self,
        location: &Location<'_>,
        error_message: &str,
        user_message: &str,
    ) -> Assertion {
        Assertion {
            suite: self.suite.to_string(),
            method: self.method.to_string(),
            args: self.args.to_string(),
            file: location.file().to_string(),
            line: location.line(),
            error_message: error_message.to_string(),
            user_message: user_message.to_string(),
        }
    }
}
