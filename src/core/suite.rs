//! Suites: ordered lists of checks run as one unit.
//!
//! A suite is the counterpart of a demo test executable's `main`: it prints a
//! header and the environment it sees, runs its checks in order and stops at
//! the first failure.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;

use crate::core::check::{Check, CheckStatus};
use crate::core::outcome::Outcome;
use crate::util::env::{EnvSource, Layered};

/// A named, ordered list of checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suite {
    pub name: String,
    /// First line printed when the suite runs.
    pub header: Option<String>,
    /// Variables printed before the checks run.
    pub report_env: Vec<String>,
    /// Variables injected over the caller's environment for this suite.
    pub env: BTreeMap<String, String>,
    /// Number of times the suite is run. Always at least 1.
    pub repeat: u32,
    pub enabled: bool,
    pub checks: Vec<Check>,
}

/// Counters and outcome of one suite run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteRun {
    pub outcome: Outcome,
    /// Checks that passed in the deciding pass.
    pub passed: usize,
    /// Gated checks skipped in the deciding pass.
    pub skipped: usize,
    /// Passes executed, counting the deciding one.
    pub passes: u32,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Suite {
            name: name.into(),
            header: None,
            report_env: Vec::new(),
            env: BTreeMap::new(),
            repeat: 1,
            enabled: true,
            checks: Vec::new(),
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn reporting_env<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.report_env.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_repeat(mut self, repeat: u32) -> Self {
        self.repeat = repeat.max(1);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    /// Run the suite against `env`, writing its output to `out`.
    ///
    /// Every pass reruns the whole suite: header, env lines and checks. A
    /// pass stops at the first failing check, and later passes only run
    /// while earlier ones succeed.
    pub fn run(&self, env: &dyn EnvSource, out: &mut dyn Write) -> SuiteRun {
        let env = Layered::new(env).with(self.env.clone());

        let passes = self.repeat.max(1);
        let mut last = SuiteRun {
            outcome: Outcome::Passed,
            passed: 0,
            skipped: 0,
            passes: 0,
        };

        for pass in 1..=passes {
            last = self.run_pass(&env, out);
            last.passes = pass;
            if !last.outcome.is_success() {
                break;
            }
        }

        tracing::debug!("suite `{}`: {} after {} pass(es)", self.name, last.outcome, last.passes);
        last
    }

    fn run_pass(&self, env: &dyn EnvSource, out: &mut dyn Write) -> SuiteRun {
        if let Some(header) = &self.header {
            emit(out, format_args!("{}", header));
        }
        for name in &self.report_env {
            emit(out, format_args!("env var '{}' = {}", name, env.display(name)));
        }

        let mut passed = 0;
        let mut skipped = 0;

        for (index, check) in self.checks.iter().enumerate() {
            match check.run(env, out) {
                CheckStatus::Passed => passed += 1,
                CheckStatus::Skipped => skipped += 1,
                CheckStatus::Failed => {
                    let outcome = match check.code {
                        Some(code) => Outcome::Failed { index, code },
                        None => Outcome::failed_at(index),
                    };
                    return SuiteRun {
                        outcome,
                        passed,
                        skipped,
                        passes: 0,
                    };
                }
            }
        }

        SuiteRun {
            outcome: Outcome::Passed,
            passed,
            skipped,
            passes: 0,
        }
    }
}

fn emit(out: &mut dyn Write, line: fmt::Arguments<'_>) {
    if let Err(e) = writeln!(out, "{}", line) {
        tracing::warn!("could not write suite output: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::check::Gate;
    use std::collections::HashMap;
    use std::num::NonZeroU8;

    fn no_env() -> HashMap<String, String> {
        HashMap::new()
    }

    fn code(n: u8) -> NonZeroU8 {
        NonZeroU8::new(n).unwrap()
    }

    fn run(suite: &Suite, env: &HashMap<String, String>) -> (SuiteRun, String) {
        let mut out = Vec::new();
        let result = suite.run(env, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_all_equal_exits_zero() {
        let suite = Suite::new("sums")
            .check(Check::value(1 + 2 + 3, 6))
            .check(Check::value(-11 - 30 + 42, 1));

        let (result, output) = run(&suite, &no_env());
        assert_eq!(result.outcome, Outcome::Passed);
        assert_eq!(result.outcome.exit_code(), 0);
        assert_eq!(result.passed, 2);
        assert!(output.is_empty());
    }

    #[test]
    fn test_pinned_codes_report_first_failure() {
        let suite = Suite::new("stlib")
            .check(Check::value(1 + 3, 4).with_code(code(1)))
            .check(Check::value(11 + 30, 42).with_code(code(1)));

        let (result, output) = run(&suite, &no_env());
        assert_eq!(result.outcome.exit_code(), 1);
        assert_eq!(
            result.outcome,
            Outcome::Failed {
                index: 1,
                code: code(1)
            }
        );
        assert!(output.contains("41"));
        assert!(output.contains("42"));
    }

    #[test]
    fn test_unpinned_failure_uses_ordinal() {
        let suite = Suite::new("stlib")
            .check(Check::value(1 + 3, 4))
            .check(Check::value(11 + 30, 42));

        let (result, _) = run(&suite, &no_env());
        assert_eq!(result.outcome.exit_code(), 2);
    }

    #[test]
    fn test_stops_at_first_failure() {
        let suite = Suite::new("stop")
            .check(Check::value(1, 2))
            .check(Check::value(3, 4));

        let (result, output) = run(&suite, &no_env());
        assert_eq!(result.outcome.exit_code(), 1);
        assert_eq!(result.passed, 0);
        assert_eq!(output.lines().count(), 1);
        assert!(!output.contains('3'));
    }

    #[test]
    fn test_header_and_env_report() {
        let suite = Suite::new("shlib")
            .with_header("Tests of shlib ...")
            .reporting_env(["AZ", "BROKEN_TEST"])
            .with_env("AZ", "111");

        let (_, output) = run(&suite, &no_env());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Tests of shlib ...",
                "env var 'AZ' = 111",
                "env var 'BROKEN_TEST' = NULL",
            ]
        );
    }

    #[test]
    fn test_suite_env_enables_gate() {
        let suite = Suite::new("broken")
            .with_env("BROKEN_TEST", "true")
            .check(Check::value(1, 2).when(Gate::new("BROKEN_TEST", "true")));

        let (result, _) = run(&suite, &no_env());
        assert!(!result.outcome.is_success());
    }

    #[test]
    fn test_gated_checks_counted_as_skipped() {
        let suite = Suite::new("gated")
            .check(Check::value(1, 1))
            .check(Check::value(1, 2).when(Gate::new("BROKEN_TEST", "true")));

        let (result, _) = run(&suite, &no_env());
        assert!(result.outcome.is_success());
        assert_eq!(result.passed, 1);
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_repeat_runs_every_pass() {
        let suite = Suite::new("twice").with_repeat(2).check(Check::value(1, 1));
        let (result, _) = run(&suite, &no_env());
        assert_eq!(result.passes, 2);
        assert!(result.outcome.is_success());
    }

    #[test]
    fn test_repeat_prints_header_every_pass() {
        let suite = Suite::new("shlib")
            .with_header("Tests of shlib ...")
            .reporting_env(["AZ"])
            .with_repeat(2)
            .check(Check::value(6, 6));
        let (result, output) = run(&suite, &no_env());

        assert_eq!(result.passes, 2);
        assert_eq!(
            output,
            "Tests of shlib ...\nenv var 'AZ' = NULL\nTests of shlib ...\nenv var 'AZ' = NULL\n"
        );
    }

    #[test]
    fn test_repeat_stops_on_failure() {
        let suite = Suite::new("twice").with_repeat(3).check(Check::value(1, 2));
        let (result, output) = run(&suite, &no_env());
        assert_eq!(result.passes, 1);
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn test_repeat_is_at_least_one() {
        assert_eq!(Suite::new("s").with_repeat(0).repeat, 1);
    }
}
