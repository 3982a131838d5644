//! Lock-wrapping adapter making any sink safe for concurrent use

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::assertion::Assertion;
use crate::output::Output;

/// Serializes every call into the wrapped sink behind one mutex.
///
/// No buffering, no reordering: the real sink observes calls in arrival
/// order, one at a time. The adapter is `Sync`; each worker thread obtains
/// its own lightweight [`SyncHandle`] through [`SynchronizedOutput::handle`]
/// and uses that wherever a `&mut dyn Output` is expected.
pub struct SynchronizedOutput<'a> {
    inner: Mutex<&'a mut dyn Output>,
}

impl<'a> SynchronizedOutput<'a> {
    pub fn new(output: &'a mut dyn Output) -> Self {
        SynchronizedOutput {
            inner: Mutex::new(output),
        }
    }

    /// A per-thread forwarder to the shared sink.
    pub fn handle(&self) -> SyncHandle<'_, 'a> {
        SyncHandle { shared: self }
    }

    fn lock(&self) -> MutexGuard<'_, &'a mut dyn Output> {
        // A panic inside one writer must not silence the rest of the run.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Forwarding handle created by [`SynchronizedOutput::handle`]; every event
/// acquires the shared lock for exactly the duration of one sink call.
pub struct SyncHandle<'s, 'a> {
    shared: &'s SynchronizedOutput<'a>,
}

impl Output for SyncHandle<'_, '_> {
    fn initialize_suite(&mut self, suite_name: &str, num_tests: usize) {
        self.shared.lock().initialize_suite(suite_name, num_tests);
    }

    fn finish_suite(
        &mut self,
        suite_name: &str,
        num_tests: usize,
        num_positive: usize,
        total_duration: Duration,
    ) {
        self.shared
            .lock()
            .finish_suite(suite_name, num_tests, num_positive, total_duration);
    }

    fn initialize_test_method(&mut self, suite_name: &str, method_name: &str, arg_string: &str) {
        self.shared
            .lock()
            .initialize_test_method(suite_name, method_name, arg_string);
    }

    fn finish_test_method(
        &mut self,
        suite_name: &str,
        method_name: &str,
        arg_string: &str,
        success: bool,
    ) {
        self.shared
            .lock()
            .finish_test_method(suite_name, method_name, arg_string, success);
    }

    fn print_exception(&mut self, suite_name: &str, method_name: &str, arg_string: &str, error: &str) {
        self.shared
            .lock()
            .print_exception(suite_name, method_name, arg_string, error);
    }

    fn print_success(&mut self, assertion: &Assertion) {
        self.shared.lock().print_success(assertion);
    }

    fn print_failure(&mut self, assertion: &Assertion) {
        self.shared.lock().print_failure(assertion);
    }

    // report_generator stays None: supplementary reports are generated
    // after the run, directly on the unwrapped sink.
}
