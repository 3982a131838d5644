//! Suite selection, sink construction and run orchestration

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use glob::Pattern;
use veritest_core::{
    Assertion, CompilerOutput, ConsoleOutput, HtmlOutput, Output, SynchronizedOutput,
    TestDescriptor, TextOutput, XmlOutput, FORMAT_GCC, FORMAT_GENERIC, FORMAT_MSVC,
};

use crate::cli::{Cli, Mode, OutputKind};
use crate::registry::{Registry, SuiteEntry};

/// Tee sink: forwards every event unchanged and remembers whether any suite
/// level finished with fewer positives than tests. Failures anywhere in a
/// nested suite tree surface here even though `run` only returns the
/// top-level result.
struct StatsOutput<'a> {
    inner: &'a mut dyn Output,
    any_failed: bool,
}

impl<'a> StatsOutput<'a> {
    fn new(inner: &'a mut dyn Output) -> Self {
        StatsOutput {
            inner,
            any_failed: false,
        }
    }
}

impl Output for StatsOutput<'_> {
    fn initialize_suite(&mut self, suite_name: &str, num_tests: usize) {
        self.inner.initialize_suite(suite_name, num_tests);
    }

    fn finish_suite(
        &mut self,
        suite_name: &str,
        num_tests: usize,
        num_positive: usize,
        total_duration: Duration,
    ) {
        if num_positive < num_tests {
            self.any_failed = true;
        }
        self.inner
            .finish_suite(suite_name, num_tests, num_positive, total_duration);
    }

    fn initialize_test_method(&mut self, suite_name: &str, method_name: &str, arg_string: &str) {
        self.inner
            .initialize_test_method(suite_name, method_name, arg_string);
    }

    fn finish_test_method(
        &mut self,
        suite_name: &str,
        method_name: &str,
        arg_string: &str,
        success: bool,
    ) {
        self.inner
            .finish_test_method(suite_name, method_name, arg_string, success);
    }

    fn print_exception(&mut self, suite_name: &str, method_name: &str, arg_string: &str, error: &str) {
        self.inner
            .print_exception(suite_name, method_name, arg_string, error);
    }

    fn print_success(&mut self, assertion: &Assertion) {
        self.inner.print_success(assertion);
    }

    fn print_failure(&mut self, assertion: &Assertion) {
        self.inner.print_failure(assertion);
    }
}

fn select_entries<'r>(registry: &'r Registry, cli: &Cli) -> Result<Vec<&'r SuiteEntry>> {
    if cli.suites.is_empty() {
        return Ok(registry
            .entries()
            .iter()
            .filter(|entry| !entry.flags().omit_from_default)
            .collect());
    }
    cli.suites
        .iter()
        .map(|key| {
            registry
                .find(key)
                .with_context(|| format!("unknown suite key {:?} (try --list-suites)", key))
        })
        .collect()
}

fn compile_patterns(raw: &[String]) -> Result<Vec<Pattern>> {
    raw.iter()
        .map(|pattern| {
            Pattern::new(pattern).with_context(|| format!("invalid test pattern {:?}", pattern))
        })
        .collect()
}

fn open_stream(path: Option<&Path>) -> Result<Box<dyn Write + Send>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create output file {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

fn make_sink(cli: &Cli) -> Result<Box<dyn Output>> {
    let mode = cli.mode.to_output_mode();
    Ok(match cli.output {
        OutputKind::Plain => Box::new(TextOutput::with_stream(
            mode,
            open_stream(cli.output_file.as_deref())?,
        )),
        OutputKind::Colored => {
            if cli.output_file.is_some() {
                bail!("colored output can only write to the console");
            }
            Box::new(ConsoleOutput::new(mode))
        }
        OutputKind::Gcc => Box::new(CompilerOutput::new(
            FORMAT_GCC,
            open_stream(cli.output_file.as_deref())?,
        )),
        OutputKind::Msvc => Box::new(CompilerOutput::new(
            FORMAT_MSVC,
            open_stream(cli.output_file.as_deref())?,
        )),
        OutputKind::Generic => Box::new(CompilerOutput::new(
            FORMAT_GENERIC,
            open_stream(cli.output_file.as_deref())?,
        )),
        OutputKind::Junit => Box::new(XmlOutput::new(open_stream(cli.output_file.as_deref())?)),
        // Collects during the run; the page is written afterwards.
        OutputKind::Html => Box::new(HtmlOutput::new()),
    })
}

/// Runs the suites selected by `cli` and returns the process exit code:
/// 0 when every executed suite level passed completely, 1 otherwise.
pub fn run(registry: &Registry, cli: &Cli) -> Result<i32> {
    let entries = select_entries(registry, cli)?;

    if cli.list_suites {
        for entry in &entries {
            if cli.suites.is_empty() && entry.flags().omit_from_listing {
                continue;
            }
            println!("{} - {}", entry.key(), entry.description());
        }
        return Ok(0);
    }
    if cli.list_tests {
        for entry in &entries {
            let suite = entry.instantiate();
            for descriptor in suite.list_tests() {
                println!("{}: {}", entry.key(), descriptor.full_name);
            }
        }
        return Ok(0);
    }
    if entries.is_empty() {
        eprintln!("No test suites selected");
        return Ok(0);
    }

    let patterns = compile_patterns(&cli.test_pattern)?;
    let continue_on_failure = !cli.no_continue;
    let mut sink = make_sink(cli)?;

    let any_failed;
    {
        let mut stats = StatsOutput::new(sink.as_mut());
        {
            // Parallel suites may be nested anywhere in the tree, so the
            // whole run goes through the synchronized adapter.
            let shared = SynchronizedOutput::new(&mut stats);
            let mut handle = shared.handle();
            for entry in &entries {
                let mut suite = entry.instantiate();
                if patterns.is_empty() {
                    suite.run(&mut handle, continue_on_failure);
                    continue;
                }
                let selection: Vec<TestDescriptor> = suite
                    .list_tests()
                    .into_iter()
                    .filter(|descriptor| {
                        patterns
                            .iter()
                            .any(|pattern| pattern.matches(&descriptor.full_name))
                    })
                    .collect();
                if selection.is_empty() {
                    continue;
                }
                suite.run_selected(&mut handle, &selection, continue_on_failure);
            }
        }
        any_failed = stats.any_failed;
    }

    if let Some(generator) = sink.report_generator() {
        let mut stream = open_stream(cli.output_file.as_deref())?;
        generator.generate(&mut stream, cli.mode != Mode::Terse, "Test results")?;
    }

    Ok(if any_failed { 1 } else { 0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use veritest_core::{CollectorOutput, RunnableSuite, Suite};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("veritest").chain(args.iter().copied())).unwrap()
    }

    fn demo_registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register("math", "arithmetic", || {
                let mut suite = Suite::new("math");
                suite.add_test("test_add", |ctx| ctx.assert_eq(4, 2 + 2, ""));
                suite.add_test("test_sub", |ctx| ctx.assert_eq(0, 2 - 2, ""));
                suite
            })
            .unwrap();
        registry
            .register_with_flags(
                "broken",
                "always fails",
                crate::registry::RegistrationFlags {
                    omit_from_default: true,
                    omit_from_listing: false,
                },
                || {
                    let mut suite = Suite::new("broken");
                    suite.add_test("test_fail", |ctx| ctx.assert_that(false, ""));
                    suite
                },
            )
            .unwrap();
        registry
    }

    #[test]
    fn default_selection_honors_omit_flag() {
        let registry = demo_registry();
        let entries = select_entries(&registry, &parse(&[])).unwrap();
        let keys: Vec<&str> = entries.iter().map(|entry| entry.key()).collect();
        assert_eq!(keys, vec!["math"]);
    }

    #[test]
    fn explicit_keys_override_omit_flag() {
        let registry = demo_registry();
        let entries = select_entries(&registry, &parse(&["broken"])).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key(), "broken");
    }

    #[test]
    fn unknown_key_is_an_error() {
        let registry = demo_registry();
        let error = select_entries(&registry, &parse(&["nonesuch"])).unwrap_err();
        assert!(error.to_string().contains("unknown suite key"));
    }

    #[test]
    fn stats_tee_flags_incomplete_suites() {
        let mut inner = CollectorOutput::new();
        let mut stats = StatsOutput::new(&mut inner);

        let mut child = Suite::new("child");
        child.add_test("fails", |ctx| ctx.assert_that(false, ""));
        let mut suite = Suite::new("parent");
        suite.add_test("passes", |ctx| ctx.assert_that(true, ""));
        suite.add_suite(child);

        // The parent's own methods all pass, but the tee still sees the
        // child's incomplete finish_suite event.
        assert!(suite.run(&mut stats, true));
        assert!(stats.any_failed);
        assert_eq!(inner.suites().len(), 2);
    }

    #[test]
    fn failing_suite_produces_exit_code_one() {
        let registry = demo_registry();
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("results.xml");
        let cli = parse(&[
            "broken",
            "--output",
            "junit",
            "--output-file",
            report.to_str().unwrap(),
        ]);

        assert_eq!(run(&registry, &cli).unwrap(), 1);
        let xml = std::fs::read_to_string(&report).unwrap();
        assert!(xml.contains("<testsuite name=\"broken\""));
        assert!(xml.ends_with("</testsuites>\n"));
    }

    #[test]
    fn patterns_restrict_the_selection() {
        let registry = demo_registry();
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("results.xml");
        let cli = parse(&[
            "math",
            "--test-pattern",
            "test_add*",
            "--output",
            "junit",
            "--output-file",
            report.to_str().unwrap(),
        ]);

        assert_eq!(run(&registry, &cli).unwrap(), 0);
        let xml = std::fs::read_to_string(&report).unwrap();
        assert!(xml.contains("tests=\"1\""));
        assert!(xml.contains("name=\"test_add\""));
        assert!(!xml.contains("test_sub"));
    }

    #[test]
    fn html_report_is_generated_after_the_run() {
        let registry = demo_registry();
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("results.html");
        let cli = parse(&[
            "math",
            "--output",
            "html",
            "--mode",
            "verbose",
            "--output-file",
            report.to_str().unwrap(),
        ]);

        assert_eq!(run(&registry, &cli).unwrap(), 0);
        let page = std::fs::read_to_string(&report).unwrap();
        assert!(page.contains("<h2 id=\"math\">Suite 'math'</h2>"));
        assert!(page.contains("test_add"));
    }

    #[test]
    fn colored_output_rejects_a_file_target() {
        let registry = demo_registry();
        let cli = parse(&["math", "--output", "colored", "--output-file", "out.txt"]);
        let error = run(&registry, &cli).unwrap_err();
        assert!(error.to_string().contains("console"));
    }

    #[test]
    fn empty_pattern_selection_skips_the_suite() {
        let registry = demo_registry();
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("results.xml");
        let cli = parse(&[
            "math",
            "--test-pattern",
            "no_such_method*",
            "--output",
            "junit",
            "--output-file",
            report.to_str().unwrap(),
        ]);

        assert_eq!(run(&registry, &cli).unwrap(), 0);
        let xml = std::fs::read_to_string(&report).unwrap();
        assert!(!xml.contains("<testsuite "));
    }
}
