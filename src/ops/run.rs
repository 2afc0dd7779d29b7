//! Running suites and collecting their reports.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use miette::Diagnostic as MietteDiagnostic;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::core::outcome::Outcome;
use crate::core::suite::Suite;
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::env::{EnvSource, Layered};

/// Options for [`run_suites`].
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Suites run in parallel. `None` runs them one at a time.
    pub jobs: Option<usize>,

    /// Stop after the first failing suite. Forces sequential execution.
    pub fail_fast: bool,

    /// Variables layered over the caller's environment for every suite.
    pub env: BTreeMap<String, String>,
}

/// What happened to a suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuiteStatus {
    Passed,
    Failed,
    /// `enabled = false`
    Disabled,
    /// Not reached because an earlier suite failed under fail-fast.
    NotRun,
}

/// Report for one suite.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub name: String,
    pub status: SuiteStatus,
    /// Present when the suite ran.
    pub outcome: Option<Outcome>,
    pub passed: usize,
    pub skipped: usize,
    pub passes: u32,
    /// Everything the suite wrote.
    pub output: String,
    #[serde(rename = "duration_ms", serialize_with = "serialize_duration_ms")]
    pub duration: Duration,
}

fn serialize_duration_ms<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}

impl SuiteReport {
    fn without_run(name: &str, status: SuiteStatus) -> Self {
        SuiteReport {
            name: name.to_string(),
            status,
            outcome: None,
            passed: 0,
            skipped: 0,
            passes: 0,
            output: String::new(),
            duration: Duration::ZERO,
        }
    }

    /// Exit code of this suite; 0 unless it failed.
    pub fn exit_code(&self) -> u8 {
        self.outcome.map(|o| o.exit_code()).unwrap_or(0)
    }
}

/// Report for a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub suites: Vec<SuiteReport>,
    #[serde(rename = "duration_ms", serialize_with = "serialize_duration_ms")]
    pub duration: Duration,
}

impl RunReport {
    fn count(&self, status: SuiteStatus) -> usize {
        self.suites.iter().filter(|s| s.status == status).count()
    }

    pub fn passed_count(&self) -> usize {
        self.count(SuiteStatus::Passed)
    }

    pub fn failed_count(&self) -> usize {
        self.count(SuiteStatus::Failed)
    }

    /// Suites that were disabled or never reached.
    pub fn skipped_count(&self) -> usize {
        self.count(SuiteStatus::Disabled) + self.count(SuiteStatus::NotRun)
    }

    /// First failing suite in input order.
    pub fn first_failure(&self) -> Option<&SuiteReport> {
        self.suites.iter().find(|s| s.status == SuiteStatus::Failed)
    }

    pub fn is_success(&self) -> bool {
        self.first_failure().is_none()
    }

    /// Process exit code: the first failing suite's code, or 0.
    pub fn exit_code(&self) -> u8 {
        self.first_failure().map(SuiteReport::exit_code).unwrap_or(0)
    }
}

/// Run a single suite, capturing its output.
pub fn run_suite(suite: &Suite, env: &dyn EnvSource) -> SuiteReport {
    if !suite.enabled {
        tracing::debug!("suite `{}` is disabled", suite.name);
        return SuiteReport::without_run(&suite.name, SuiteStatus::Disabled);
    }

    tracing::debug!("running suite `{}` ({} checks)", suite.name, suite.checks.len());

    let start = Instant::now();
    let mut buf = Vec::new();
    let result = suite.run(env, &mut buf);

    let status = if result.outcome.is_success() {
        SuiteStatus::Passed
    } else {
        SuiteStatus::Failed
    };

    SuiteReport {
        name: suite.name.clone(),
        status,
        outcome: Some(result.outcome),
        passed: result.passed,
        skipped: result.skipped,
        passes: result.passes,
        output: String::from_utf8_lossy(&buf).into_owned(),
        duration: start.elapsed(),
    }
}

/// Run suites and collect their reports in input order.
pub fn run_suites(
    suites: &[Suite],
    env: &dyn EnvSource,
    opts: &RunOptions,
) -> Result<RunReport> {
    let start = Instant::now();
    let env = Layered::new(env).with(opts.env.clone());

    let reports: Vec<SuiteReport> = if opts.fail_fast {
        run_fail_fast(suites, &env)
    } else {
        match opts.jobs {
            Some(jobs) if jobs > 1 && suites.len() > 1 => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .build()
                    .context("failed to start suite thread pool")?;
                pool.install(|| {
                    suites
                        .par_iter()
                        .map(|suite| run_suite(suite, &env))
                        .collect()
                })
            }
            _ => suites.iter().map(|suite| run_suite(suite, &env)).collect(),
        }
    };

    Ok(RunReport {
        suites: reports,
        duration: start.elapsed(),
    })
}

fn run_fail_fast(suites: &[Suite], env: &dyn EnvSource) -> Vec<SuiteReport> {
    let mut reports = Vec::with_capacity(suites.len());
    let mut failed = false;

    for suite in suites {
        if failed {
            reports.push(SuiteReport::without_run(&suite.name, SuiteStatus::NotRun));
            continue;
        }
        let report = run_suite(suite, env);
        failed = report.status == SuiteStatus::Failed;
        reports.push(report);
    }

    reports
}

/// A requested suite does not exist.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("no suite named `{name}`")]
#[diagnostic(code(demokit::run::unknown_suite))]
pub struct UnknownSuiteError {
    pub name: String,
    pub available: Vec<String>,
}

impl UnknownSuiteError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.to_string())
            .with_context(format!("available suites: {}", self.available.join(", ")))
            .with_suggestion(suggestions::SUITE_NOT_FOUND)
    }
}

/// Pick suites by name, in the order requested. No names selects all.
pub fn select_suites(
    available: Vec<Suite>,
    names: &[String],
) -> Result<Vec<Suite>, UnknownSuiteError> {
    if names.is_empty() {
        return Ok(available);
    }

    let mut selected = Vec::with_capacity(names.len());
    for name in names {
        match available.iter().find(|s| &s.name == name) {
            Some(suite) => selected.push(suite.clone()),
            None => {
                return Err(UnknownSuiteError {
                    name: name.clone(),
                    available: available.iter().map(|s| s.name.clone()).collect(),
                })
            }
        }
    }
    Ok(selected)
}

/// Combine built-in and manifest suites. A manifest suite replaces the
/// built-in suite of the same name in place; new ones are appended.
pub fn merge_suites(builtin: Vec<Suite>, manifest: Vec<Suite>) -> Vec<Suite> {
    let mut merged = builtin;
    for suite in manifest {
        match merged.iter_mut().find(|s| s.name == suite.name) {
            Some(existing) => {
                tracing::debug!("manifest suite `{}` replaces the built-in one", suite.name);
                *existing = suite;
            }
            None => merged.push(suite),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::check::Check;
    use crate::ops::builtin::{builtin_suites, BROKEN_TEST};
    use std::collections::HashMap;

    fn no_env() -> HashMap<String, String> {
        HashMap::new()
    }

    fn passing(name: &str) -> Suite {
        Suite::new(name).check(Check::value(1, 1))
    }

    fn failing(name: &str) -> Suite {
        Suite::new(name)
            .check(Check::value(1, 1))
            .check(Check::value(41, 42))
    }

    #[test]
    fn test_run_suite_captures_output() {
        let report = run_suite(&failing("f"), &no_env());
        assert_eq!(report.status, SuiteStatus::Failed);
        assert_eq!(report.exit_code(), 2);
        assert_eq!(report.passed, 1);
        assert_eq!(report.output, "41 is not equal to 42\n");
    }

    #[test]
    fn test_disabled_suite_not_run() {
        let report = run_suite(&failing("f").disabled(), &no_env());
        assert_eq!(report.status, SuiteStatus::Disabled);
        assert!(report.outcome.is_none());
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_run_report_exit_code_is_first_failure() {
        let suites = vec![
            passing("a"),
            Suite::new("b").check(Check::value(0, 1)),
            failing("c"),
        ];
        let report = run_suites(&suites, &no_env(), &RunOptions::default()).unwrap();

        assert_eq!(report.passed_count(), 1);
        assert_eq!(report.failed_count(), 2);
        assert_eq!(report.first_failure().unwrap().name, "b");
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_parallel_run_preserves_order() {
        let suites: Vec<Suite> = (0..16)
            .map(|i| {
                if i % 5 == 3 {
                    failing(&format!("s{}", i))
                } else {
                    passing(&format!("s{}", i))
                }
            })
            .collect();
        let opts = RunOptions {
            jobs: Some(4),
            ..RunOptions::default()
        };

        let report = run_suites(&suites, &no_env(), &opts).unwrap();
        let names: Vec<&str> = report.suites.iter().map(|s| s.name.as_str()).collect();
        let expected: Vec<String> = (0..16).map(|i| format!("s{}", i)).collect();
        assert_eq!(names, expected.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(report.first_failure().unwrap().name, "s3");
        assert_eq!(report.failed_count(), 3);
    }

    #[test]
    fn test_fail_fast_marks_rest_not_run() {
        let suites = vec![passing("a"), failing("b"), passing("c")];
        let opts = RunOptions {
            fail_fast: true,
            jobs: Some(4),
            ..RunOptions::default()
        };

        let report = run_suites(&suites, &no_env(), &opts).unwrap();
        let statuses: Vec<SuiteStatus> = report.suites.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![SuiteStatus::Passed, SuiteStatus::Failed, SuiteStatus::NotRun]
        );
        assert_eq!(report.skipped_count(), 1);
    }

    #[test]
    fn test_run_options_env_reaches_suites() {
        let mut opts = RunOptions::default();
        opts.env.insert(BROKEN_TEST.to_string(), "true".to_string());

        let suites = select_suites(builtin_suites().unwrap(), &["shlib".to_string()]).unwrap();
        let report = run_suites(&suites, &no_env(), &opts).unwrap();
        assert_eq!(report.exit_code(), 2);
    }

    #[test]
    fn test_empty_run_succeeds() {
        let report = run_suites(&[], &no_env(), &RunOptions::default()).unwrap();
        assert!(report.is_success());
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_select_suites() {
        let all = vec![passing("a"), passing("b"), passing("c")];

        let picked = select_suites(all.clone(), &["c".to_string(), "a".to_string()]).unwrap();
        let names: Vec<&str> = picked.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a"]);

        assert_eq!(select_suites(all.clone(), &[]).unwrap().len(), 3);

        let err = select_suites(all, &["zzz".to_string()]).unwrap_err();
        assert_eq!(err.name, "zzz");
        assert_eq!(err.available, vec!["a", "b", "c"]);
        assert!(err.to_diagnostic().format(false).contains("demokit list"));
    }

    #[test]
    fn test_merge_suites_replaces_by_name() {
        let merged = merge_suites(
            vec![passing("a"), passing("b")],
            vec![failing("b"), passing("z")],
        );
        let names: Vec<&str> = merged.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "z"]);
        assert_eq!(merged[1].checks.len(), 2);
    }

    #[test]
    fn test_report_serializes() {
        let report = run_suites(&[failing("f")], &no_env(), &RunOptions::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["suites"][0]["name"], "f");
        assert_eq!(json["suites"][0]["status"], "failed");
        assert_eq!(json["suites"][0]["outcome"]["code"], 2);
        assert!(json["duration_ms"].is_u64());
    }
}
