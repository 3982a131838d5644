//! Behavior-driven scenario suites
//!
//! A [`BddSuite`] expresses tests as given/when/then scenarios. Each
//! scenario registers as one ordinary test method, so stories run through
//! the same engine, selection and sinks as any other suite.

use crate::output::Output;
use crate::suite::{RunnableSuite, Suite, SuiteHooks, TestDescriptor};

/// A suite whose test methods are scenarios.
///
/// Running a scenario asserts its precondition, runs the action under
/// panic containment, then asserts its postcondition. Story state shared
/// between scenarios lives in the closures' captures.
pub struct BddSuite {
    suite: Suite,
}

impl BddSuite {
    pub fn new(name: impl Into<String>) -> Self {
        BddSuite {
            suite: Suite::new(name),
        }
    }

    pub fn with_hooks(name: impl Into<String>, hooks: impl SuiteHooks + 'static) -> Self {
        BddSuite {
            suite: Suite::with_hooks(name, hooks),
        }
    }

    /// Registers one scenario as a test method named after the scenario.
    /// Registration order defines execution order.
    pub fn add_scenario<G, W, T>(&mut self, name: &str, given: G, when: W, then: T)
    where
        G: Fn() -> bool + Send + 'static,
        W: Fn() + Send + 'static,
        T: Fn() -> bool + Send + 'static,
    {
        self.suite.add_test(name, move |ctx| {
            ctx.assert_that(given(), "precondition failed");
            ctx.assert_no_panic(&when, "scenario action panicked");
            ctx.assert_that(then(), "postcondition failed");
        });
    }

    /// Adds a child suite, run after the scenarios.
    pub fn add_suite(&mut self, child: impl RunnableSuite + 'static) {
        self.suite.add_suite(child);
    }
}

impl RunnableSuite for BddSuite {
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
        self.suite.run_selected(output, selected, continue_on_failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Event, RecordingOutput};
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    #[test]
    fn passing_scenario_reports_three_successes() {
        let counter = Arc::new(AtomicI32::new(0));
        let mut suite = BddSuite::new("counting");
        suite.add_scenario(
            "increment_from_zero",
            {
                let counter = Arc::clone(&counter);
                move || counter.load(Ordering::SeqCst) == 0
            },
            {
                let counter = Arc::clone(&counter);
                move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            },
            {
                let counter = Arc::clone(&counter);
                move || counter.load(Ordering::SeqCst) == 1
            },
        );

        let mut sink = RecordingOutput::default();
        assert!(suite.run(&mut sink, true));
        let successes = sink
            .events
            .iter()
            .filter(|event| matches!(event, Event::Success { .. }))
            .count();
        assert_eq!(successes, 3);
        assert!(sink.events.contains(&Event::FinishMethod {
            method: "increment_from_zero".to_string(),
            success: true,
        }));
    }

    #[test]
    fn failed_precondition_carries_its_message() {
        let mut suite = BddSuite::new("gated");
        suite.add_scenario("impossible", || false, || (), || true);

        let mut sink = RecordingOutput::default();
        assert!(!suite.run(&mut sink, true));
        assert!(sink.events.contains(&Event::Failure {
            method: "impossible".to_string(),
            error: "Assertion failed".to_string(),
        }));
    }

    #[test]
    fn panicking_action_is_contained_and_postcondition_still_checked() {
        let mut suite = BddSuite::new("explosive");
        suite.add_scenario("blows_up", || true, || panic!("bang"), || true);

        let mut sink = RecordingOutput::default();
        assert!(!suite.run(&mut sink, true));
        // The panic is an assertion failure, not a method-level exception.
        assert!(!sink
            .events
            .iter()
            .any(|event| matches!(event, Event::Exception { .. })));
        assert!(sink.events.contains(&Event::Failure {
            method: "blows_up".to_string(),
            error: "Unexpected panic: bang".to_string(),
        }));
        // Precondition and postcondition both still passed.
        let successes = sink
            .events
            .iter()
            .filter(|event| matches!(event, Event::Success { .. }))
            .count();
        assert_eq!(successes, 2);
    }

    #[test]
    fn scenarios_list_and_run_in_registration_order() {
        let mut suite = BddSuite::new("story");
        for name in ["first", "second", "third"] {
            suite.add_scenario(name, || true, || (), || true);
        }

        let names: Vec<String> = suite
            .list_tests()
            .into_iter()
            .map(|descriptor| descriptor.full_name)
            .collect();
        assert_eq!(names, vec!["first()", "second()", "third()"]);

        let mut sink = RecordingOutput::default();
        assert!(suite.run(&mut sink, true));
        assert!(sink.events.contains(&Event::FinishSuite {
            suite: "story".to_string(),
            tests: 3,
            positive: 3,
        }));
    }
}
