//! Thread-parallel suite execution
//!
//! A [`ParallelSuite`] runs each of its child suites on its own OS thread,
//! all sharing one [`SynchronizedOutput`] so their events reach the real
//! sink serialized. Fan-out is bounded by the number of children at this
//! nesting level; there is no thread pool and no work stealing.

use std::thread;
use std::time::Duration;

use crate::assertion::Assertion;
use crate::output::synchronized::SynchronizedOutput;
use crate::output::Output;
use crate::suite::{RunnableSuite, Suite, SuiteHooks, TestDescriptor};

/// A suite that runs its children concurrently instead of running test
/// methods of its own.
///
/// Direct test-method registration is not part of its surface; a suite
/// converted via [`ParallelSuite::from_suite`] that still carries methods
/// gets a synthetic failure assertion at run time and the methods are never
/// executed.
pub struct ParallelSuite {
    suite: Suite,
}

impl ParallelSuite {
    pub fn new(name: impl Into<String>) -> Self {
        ParallelSuite {
            suite: Suite::new(name),
        }
    }

    pub fn with_hooks(name: impl Into<String>, hooks: impl SuiteHooks + 'static) -> Self {
        ParallelSuite {
            suite: Suite::with_hooks(name, hooks),
        }
    }

    /// Reuses an existing suite's name, hooks and children. Any directly
    /// registered test methods are carried along but never executed.
    pub fn from_suite(suite: Suite) -> Self {
        ParallelSuite { suite }
    }

    /// Adds a child suite, run on its own thread.
    pub fn add_suite(&mut self, child: impl RunnableSuite + 'static) {
        self.suite.add_suite(child);
    }
}

impl RunnableSuite for ParallelSuite {
    fn name(&self) -> &str {
        self.suite.name()
    }

    fn list_tests(&self) -> Vec<TestDescriptor> {
        self.suite.list_tests()
    }

    fn run_selected(
        &mut self,
        output: &mut dyn Output,
        selected: &[TestDescriptor],
        continue_on_failure: bool,
    ) -> bool {
        let num_tests = self.suite.method_count();
        let name = self.suite.name().to_string();

        output.initialize_suite(&name, num_tests);
        if self.suite.hooks_mut().setup() {
            if num_tests != 0 {
                let warning = Assertion::synthetic(
                    &name,
                    "test methods registered directly on a parallel suite are never executed",
                );
                output.print_failure(&warning);
            }
            self.suite.hooks_mut().tear_down();
        }
        output.finish_suite(&name, num_tests, 0, Duration::ZERO);

        // Each child is a distinct suite instance with private per-run
        // state; the only shared resource is the sink behind the adapter.
        let shared = SynchronizedOutput::new(output);
        thread::scope(|scope| {
            for child in self.suite.children_mut() {
                let shared = &shared;
                scope.spawn(move || {
                    let mut sink = shared.handle();
                    child.run_selected(&mut sink, selected, continue_on_failure);
                });
            }
        });
        // A panicking child propagates out of the scope above rather than
        // being swallowed.

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Event, RecordingOutput};

    fn passing_child(name: &str, tests: usize) -> Suite {
        let mut suite = Suite::new(name);
        for index in 0..tests {
            suite.add_test(&format!("test_{}", index), |ctx| {
                ctx.assert_that(true, "");
            });
        }
        suite
    }

    #[test]
    fn scenario_two_children_three_tests_each() {
        let mut parallel = ParallelSuite::new("par");
        parallel.add_suite(passing_child("left", 3));
        parallel.add_suite(passing_child("right", 3));

        let mut sink = RecordingOutput::default();
        let result = parallel.run(&mut sink, true);

        assert!(result);
        let finished = sink
            .events
            .iter()
            .filter(|event| matches!(event, Event::FinishMethod { success: true, .. }))
            .count();
        assert_eq!(finished, 6);

        // The parallel level itself reports an empty method list.
        assert!(sink.events.contains(&Event::InitSuite {
            suite: "par".to_string(),
            tests: 0,
        }));
        assert!(sink.events.contains(&Event::FinishSuite {
            suite: "par".to_string(),
            tests: 0,
            positive: 0,
        }));
    }

    #[test]
    fn each_child_reports_complete_suite_lifecycle() {
        let mut parallel = ParallelSuite::new("par");
        parallel.add_suite(passing_child("a", 1));
        parallel.add_suite(passing_child("b", 1));

        let mut sink = RecordingOutput::default();
        parallel.run(&mut sink, true);

        for child in ["a", "b"] {
            assert!(sink.events.contains(&Event::InitSuite {
                suite: child.to_string(),
                tests: 1,
            }));
            assert!(sink.events.contains(&Event::FinishSuite {
                suite: child.to_string(),
                tests: 1,
                positive: 1,
            }));
        }
    }

    #[test]
    fn direct_methods_trigger_misconfiguration_warning() {
        let mut inner = Suite::new("misused");
        inner.add_test("never_runs", |ctx| ctx.assert_that(true, ""));
        let mut parallel = ParallelSuite::from_suite(inner);

        let mut sink = RecordingOutput::default();
        let result = parallel.run(&mut sink, true);

        // Still returns true; the warning is a reported failure, not an abort.
        assert!(result);
        assert!(sink
            .events
            .iter()
            .any(|event| matches!(event, Event::Failure { .. })));
        // The method itself never executed.
        assert!(!sink
            .events
            .iter()
            .any(|event| matches!(event, Event::InitMethod { .. })));
        // Reported statistics expose the misconfiguration: 0 of 1 positive.
        assert!(sink.events.contains(&Event::FinishSuite {
            suite: "misused".to_string(),
            tests: 1,
            positive: 0,
        }));
    }

    #[test]
    fn selection_is_passed_down_to_children() {
        let mut parallel = ParallelSuite::new("par");
        parallel.add_suite(passing_child("a", 2));
        parallel.add_suite(passing_child("b", 2));

        let selection: Vec<TestDescriptor> = parallel
            .list_tests()
            .into_iter()
            .filter(|descriptor| descriptor.full_name.starts_with("test_0"))
            .collect();
        assert_eq!(selection.len(), 2);

        let mut sink = RecordingOutput::default();
        parallel.run_selected(&mut sink, &selection, true);

        for child in ["a", "b"] {
            assert!(sink.events.contains(&Event::FinishSuite {
                suite: child.to_string(),
                tests: 1,
                positive: 1,
            }));
        }
    }

    #[test]
    fn nested_parallel_suites_run_to_completion() {
        let mut inner = ParallelSuite::new("inner");
        inner.add_suite(passing_child("deep", 2));
        let mut outer = ParallelSuite::new("outer");
        outer.add_suite(inner);
        outer.add_suite(passing_child("shallow", 1));

        let mut sink = RecordingOutput::default();
        outer.run(&mut sink, true);

        let finished = sink
            .events
            .iter()
            .filter(|event| matches!(event, Event::FinishMethod { success: true, .. }))
            .count();
        assert_eq!(finished, 3);
    }
}
