use std::process;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::Parser;
use veritest_core::{BddSuite, ParallelSuite, Suite};

mod cli;
mod registry;
mod runner;

use cli::Cli;
use registry::{RegistrationFlags, Registry};

/// Arithmetic checks, including parameterized methods.
fn math_suite() -> Suite {
    let mut suite = Suite::new("math");
    suite.add_test("test_add", |ctx| ctx.assert_eq(4, 2 + 2, ""));
    suite.add_test("test_subtract", |ctx| ctx.assert_eq(0, 2 - 2, ""));
    suite.add_test("test_delta", |ctx| {
        ctx.assert_delta(0.1 + 0.2, 0.3, 1e-9, "floating point sums drift");
    });
    for base in [2i64, 3, 10] {
        suite.add_test_with("test_square", base, |ctx, n| {
            ctx.assert_that(n * n >= *n, "squares never shrink");
        });
    }
    suite
}

fn string_suite() -> Suite {
    let mut formatting = Suite::new("formatting");
    formatting.add_test_with("test_concat", ("foo", "bar"), |ctx, (left, right)| {
        ctx.assert_eq("foobar".to_string(), format!("{}{}", left, right), "");
    });
    formatting.add_test("test_trim", |ctx| {
        ctx.assert_eq("x", "  x  ".trim(), "");
    });

    let mut suite = Suite::new("strings");
    suite.add_test("test_len", |ctx| ctx.assert_eq(5usize, "hello".len(), ""));
    suite.add_test("test_upper", |ctx| {
        ctx.assert_eq("HELLO".to_string(), "hello".to_uppercase(), "");
    });
    suite.add_suite(formatting);
    suite
}

fn parallel_suite() -> ParallelSuite {
    let mut sorting = Suite::new("sorting");
    sorting.add_test("test_sort", |ctx| {
        let mut values = vec![3, 1, 2];
        values.sort();
        ctx.assert_eq(vec![1, 2, 3], values, "");
    });
    let mut searching = Suite::new("searching");
    searching.add_test("test_binary_search", |ctx| {
        ctx.assert_that([1, 3, 5].binary_search(&3) == Ok(1), "3 should sit at index 1");
    });

    let mut suite = ParallelSuite::new("collections");
    suite.add_suite(sorting);
    suite.add_suite(searching);
    suite
}

/// Given/when/then scenarios sharing one story-wide stack.
fn stack_suite() -> BddSuite {
    let stack = Arc::new(Mutex::new(Vec::<i32>::new()));
    let mut suite = BddSuite::new("stack");
    suite.add_scenario(
        "push_grows_the_stack",
        {
            let stack = Arc::clone(&stack);
            move || stack.lock().unwrap().is_empty()
        },
        {
            let stack = Arc::clone(&stack);
            move || stack.lock().unwrap().push(7)
        },
        {
            let stack = Arc::clone(&stack);
            move || stack.lock().unwrap().last() == Some(&7)
        },
    );
    suite.add_scenario(
        "pop_empties_the_stack",
        {
            let stack = Arc::clone(&stack);
            move || !stack.lock().unwrap().is_empty()
        },
        {
            let stack = Arc::clone(&stack);
            move || {
                stack.lock().unwrap().pop();
            }
        },
        {
            let stack = Arc::clone(&stack);
            move || stack.lock().unwrap().is_empty()
        },
    );
    suite
}

/// Deliberately failing suite, kept out of the default run so the plain
/// `veritest` invocation exits cleanly.
fn broken_suite() -> Suite {
    let mut suite = Suite::new("broken");
    suite.add_test("test_fails", |ctx| ctx.assert_eq(5, 2 + 2, "arithmetic is broken"));
    suite.add_test("test_gives_up", |ctx| ctx.fail("unconditional failure"));
    suite
}

fn build_registry() -> Result<Registry> {
    let mut registry = Registry::new();
    registry.register("math", "arithmetic and delta assertions", math_suite)?;
    registry.register("strings", "string handling with a nested child suite", string_suite)?;
    registry.register("collections", "thread-parallel child suites", parallel_suite)?;
    registry.register("stack", "behavior-driven stack scenarios", stack_suite)?;
    registry.register_with_flags(
        "broken",
        "intentionally failing methods",
        RegistrationFlags {
            omit_from_default: true,
            omit_from_listing: false,
        },
        broken_suite,
    )?;
    Ok(registry)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let registry = build_registry()?;
    let code = runner::run(&registry, &cli)?;
    process::exit(code);
}
