//! The suite execution engine
//!
//! A [`Suite`] owns an ordered list of registered test methods and an
//! ordered list of child suites. Running a suite executes its own methods
//! sequentially in registration order (with hook points, failure isolation
//! and duration measurement) and then recurses into the children with the
//! same selection list, so each level independently filters its own methods.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::context::{panic_message, MethodAbort, TestContext};
use crate::format::ArgFormat;
use crate::output::Output;

/// Opaque, process-unique identity of one registered test method.
///
/// Stable for the lifetime of the suite that registered the method, so a
/// descriptor obtained from [`Suite::list_tests`] can be used to re-select
/// exactly that method in a later run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodId(u64);

impl MethodId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        MethodId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identifies one registered, invocable test method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestDescriptor {
    /// Stable reference for re-selection
    pub id: MethodId,
    /// Display form `name(args)`
    pub full_name: String,
}

type TestBody = Box<dyn Fn(&mut TestContext<'_>) + Send>;

struct TestMethod {
    id: MethodId,
    name: String,
    args: String,
    body: TestBody,
}

/// Extension seams called around a suite run and around every test method.
///
/// These are the only customization points; the `run` algorithm itself is
/// sealed ([`crate::ParallelSuite`] being the sole intentional second
/// implementation).
pub trait SuiteHooks: Send {
    /// Runs before any test method. Returning false skips the whole suite
    /// body, including `tear_down`.
    fn setup(&mut self) -> bool {
        true
    }

    /// Runs after all test methods, provided `setup` returned true.
    fn tear_down(&mut self) {}

    /// Runs before every test method. Returning false skips the method,
    /// including `after`.
    fn before(&mut self, _method: &str) -> bool {
        true
    }

    /// Runs after every test method whose `before` hook passed, whether or
    /// not the method succeeded.
    fn after(&mut self, _method: &str, _success: bool) {}
}

struct DefaultHooks;

impl SuiteHooks for DefaultHooks {}

/// Common surface of [`Suite`] and [`crate::ParallelSuite`], allowing
/// heterogeneous suite trees.
pub trait RunnableSuite: Send {
    fn name(&self) -> &str;

    /// The ordered descriptors of this suite's methods followed by each
    /// child's, depth-first. Pure; safe to call without a prior run.
    fn list_tests(&self) -> Vec<TestDescriptor>;

    /// Runs the methods of this suite (and its descendants) that appear in
    /// `selected`, routing all events to `output`.
    ///
    /// Returns whether every selected method of *this* suite's own list
    /// succeeded; child results are reported through the sink but do not
    /// feed into the return value.
    fn run_selected(
        &mut self,
        output: &mut dyn Output,
        selected: &[TestDescriptor],
        continue_on_failure: bool,
    ) -> bool;

    /// Runs everything this suite and its descendants know about.
    fn run(&mut self, output: &mut dyn Output, continue_on_failure: bool) -> bool {
        let selection = self.list_tests();
        self.run_selected(output, &selection, continue_on_failure)
    }
}

/// A named, ordered collection of test methods and child suites.
///
/// Per-run state lives behind `&mut self`, so two concurrent runs of the
/// same instance are rejected at compile time; parallel execution happens
/// across distinct child instances under a [`crate::ParallelSuite`].
pub struct Suite {
    name: String,
    methods: Vec<TestMethod>,
    children: Vec<Box<dyn RunnableSuite>>,
    hooks: Box<dyn SuiteHooks>,
    continue_on_failure: bool,
    total_duration: Duration,
    num_positive: usize,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Suite::with_hooks(name, DefaultHooks)
    }

    /// A suite named after the source file it is constructed in.
    #[track_caller]
    pub fn for_current_file() -> Self {
        let file = std::panic::Location::caller().file();
        let base = Path::new(file)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("suite");
        Suite::new(base)
    }

    pub fn with_hooks(name: impl Into<String>, hooks: impl SuiteHooks + 'static) -> Self {
        Suite {
            name: name.into(),
            methods: Vec::new(),
            children: Vec::new(),
            hooks: Box::new(hooks),
            continue_on_failure: true,
            total_duration: Duration::ZERO,
            num_positive: 0,
        }
    }

    /// Registers a test method. Registration order defines execution order.
    pub fn add_test<F>(&mut self, name: &str, body: F)
    where
        F: Fn(&mut TestContext<'_>) + Send + 'static,
    {
        self.push_method(name, String::new(), Box::new(body));
    }

    /// Registers a test method with pre-bound arguments. The arguments are
    /// rendered once, at registration time, into the method's display name;
    /// use a tuple to bind more than one value.
    pub fn add_test_with<A, F>(&mut self, name: &str, args: A, body: F)
    where
        A: ArgFormat + Send + 'static,
        F: Fn(&mut TestContext<'_>, &A) + Send + 'static,
    {
        let rendered = args.format_arg();
        self.push_method(
            name,
            rendered,
            Box::new(move |context| body(context, &args)),
        );
    }

    /// Adds a child suite, run after this suite's own methods.
    pub fn add_suite(&mut self, child: impl RunnableSuite + 'static) {
        self.children.push(Box::new(child));
    }

    pub(crate) fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Box<dyn RunnableSuite>] {
        &mut self.children
    }

    pub(crate) fn hooks_mut(&mut self) -> &mut dyn SuiteHooks {
        self.hooks.as_mut()
    }

    fn push_method(&mut self, name: &str, args: String, body: TestBody) {
        self.methods.push(TestMethod {
            id: MethodId::next(),
            name: name.to_string(),
            args,
            body,
        });
    }

    /// Indices of this suite's own methods that appear in the selection.
    /// Methods belonging to other suites are ignored at this level.
    fn filter_tests(&self, selected: &[TestDescriptor]) -> Vec<usize> {
        self.methods
            .iter()
            .enumerate()
            .filter(|(_, method)| selected.iter().any(|descriptor| descriptor.id == method.id))
            .map(|(index, _)| index)
            .collect()
    }

    /// Runs one test method: init event, `before` gate, timed body
    /// invocation with panic containment, `after` hook, completion event.
    fn run_test_method(&mut self, index: usize, output: &mut dyn Output) -> (bool, Duration) {
        let method = &self.methods[index];
        output.initialize_test_method(&self.name, &method.name, &method.args);
        if !self.hooks.before(&method.name) {
            // Skipped: no completion event, no after hook, zero duration.
            return (false, Duration::ZERO);
        }

        let mut context = TestContext::new(
            &self.name,
            &method.name,
            &method.args,
            self.continue_on_failure,
            output,
        );
        let mut exception_thrown = false;
        let start = Instant::now();
        let outcome = catch_unwind(AssertUnwindSafe(|| (method.body)(&mut context)));
        let elapsed = start.elapsed();
        if let Err(payload) = outcome {
            context.succeeded = false;
            if !payload.is::<MethodAbort>() {
                exception_thrown = true;
                let error = panic_message(payload.as_ref());
                context
                    .output
                    .print_exception(&self.name, &method.name, &method.args, &error);
            }
        }
        let success = context.succeeded;

        self.hooks.after(&method.name, success);
        // A reported exception replaces the completion event.
        if !exception_thrown {
            output.finish_test_method(&self.name, &method.name, &method.args, success);
        }
        (success, elapsed)
    }
}

impl RunnableSuite for Suite {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_tests(&self) -> Vec<TestDescriptor> {
        let mut result: Vec<TestDescriptor> = self
            .methods
            .iter()
            .map(|method| TestDescriptor {
                id: method.id,
                full_name: format!("{}({})", method.name, method.args),
            })
            .collect();
        for child in &self.children {
            result.extend(child.list_tests());
        }
        result
    }

    fn run_selected(
        &mut self,
        output: &mut dyn Output,
        selected: &[TestDescriptor],
        continue_on_failure: bool,
    ) -> bool {
        let picked = self.filter_tests(selected);
        self.continue_on_failure = continue_on_failure;
        output.initialize_suite(&self.name, picked.len());

        self.total_duration = Duration::ZERO;
        self.num_positive = 0;
        if self.hooks.setup() {
            for &index in &picked {
                let (success, elapsed) = self.run_test_method(index, output);
                self.total_duration += elapsed;
                if success {
                    self.num_positive += 1;
                }
            }
            self.hooks.tear_down();
        }
        output.finish_suite(
            &self.name,
            picked.len(),
            self.num_positive,
            self.total_duration,
        );

        // The full selection is passed down unchanged; each child filters
        // its own methods from it.
        for child in &mut self.children {
            child.run_selected(output, selected, continue_on_failure);
        }

        self.num_positive == picked.len()
    }
}
