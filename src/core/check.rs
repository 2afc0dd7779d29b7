//! The assertion helper and the checks built on it.

use std::fmt::Display;
use std::io::{self, Write};
use std::num::NonZeroU8;

use serde::{Deserialize, Serialize};

use crate::core::call::Call;
use crate::util::env::EnvSource;

/// Compare two values and report a mismatch.
///
/// Returns `true` iff `actual == expected`. On a mismatch exactly one line
/// containing both values is written to `out`; on a match nothing is
/// written. A failed write is logged and does not change the result.
pub fn expect_eq<T, W>(actual: T, expected: T, out: &mut W) -> bool
where
    T: PartialEq + Display,
    W: Write + ?Sized,
{
    if actual == expected {
        return true;
    }

    if let Err(e) = writeln!(out, "{} is not equal to {}", actual, expected) {
        tracing::warn!("could not write mismatch message: {}", e);
    }
    false
}

/// [`expect_eq`] writing its mismatch line to standard output.
pub fn expect_eq_stdout<T>(actual: T, expected: T) -> bool
where
    T: PartialEq + Display,
{
    expect_eq(actual, expected, &mut io::stdout().lock())
}

/// Where a check's actual value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actual {
    /// A value computed up front.
    Value(i64),
    /// A leaf function call evaluated when the check runs.
    Call(Call),
}

impl Actual {
    pub fn value(&self) -> i64 {
        match self {
            Actual::Value(v) => *v,
            Actual::Call(call) => call.evaluate(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Actual::Value(v) => v.to_string(),
            Actual::Call(call) => call.to_string(),
        }
    }
}

/// Condition on an environment variable.
///
/// The gate holds only when the variable is set and equal to `equals`; an
/// unset variable never satisfies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    pub var: String,
    pub equals: String,
}

impl Gate {
    pub fn new(var: impl Into<String>, equals: impl Into<String>) -> Self {
        Gate {
            var: var.into(),
            equals: equals.into(),
        }
    }

    pub fn holds(&self, env: &dyn EnvSource) -> bool {
        match env.var(&self.var) {
            Some(value) => value == self.equals,
            None => false,
        }
    }
}

/// One equality check inside a suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub actual: Actual,
    pub expected: i64,
    /// Exit code reported when this check is the first to fail. Defaults to
    /// the check's 1-based position in its suite.
    pub code: Option<NonZeroU8>,
    pub gate: Option<Gate>,
}

/// What happened to a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Passed,
    Failed,
    Skipped,
}

impl Check {
    pub fn new(actual: Actual, expected: i64) -> Self {
        Check {
            actual,
            expected,
            code: None,
            gate: None,
        }
    }

    /// Check a leaf call against an expected value.
    pub fn call(call: Call, expected: i64) -> Self {
        Check::new(Actual::Call(call), expected)
    }

    /// Check a precomputed value against an expected value.
    pub fn value(actual: i64, expected: i64) -> Self {
        Check::new(Actual::Value(actual), expected)
    }

    pub fn with_code(mut self, code: NonZeroU8) -> Self {
        self.code = Some(code);
        self
    }

    pub fn when(mut self, gate: Gate) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Human-readable form, e.g. `calc_sum3(1, 2, 3) == 6`.
    pub fn describe(&self) -> String {
        format!("{} == {}", self.actual.describe(), self.expected)
    }

    /// Run the check, writing a mismatch line to `out` on failure.
    pub fn run(&self, env: &dyn EnvSource, out: &mut dyn Write) -> CheckStatus {
        if let Some(gate) = &self.gate {
            if !gate.holds(env) {
                tracing::debug!("skipping `{}`: {} != {:?}", self.describe(), gate.var, gate.equals);
                return CheckStatus::Skipped;
            }
        }

        let actual = self.actual.value();
        tracing::debug!("checking `{}` (actual {})", self.describe(), actual);

        if expect_eq(actual, self.expected, out) {
            CheckStatus::Passed
        } else {
            CheckStatus::Failed
        }
    }
}
