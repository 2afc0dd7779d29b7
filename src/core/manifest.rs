//! Checks.toml manifest parsing.
//!
//! A manifest declares suites of checks:
//!
//! ```toml
//! include = ["checks/*.toml"]
//!
//! [[suite]]
//! name = "shlib"
//! header = "Tests of shlib ..."
//! report_env = ["AZ", "BROKEN_TEST"]
//! env = { AZ = "111" }
//!
//! [[suite.check]]
//! call = "calc_sum3(1, 2, 3)"
//! expect = 6
//! code = 1
//! ```
//!
//! Included files are resolved relative to the manifest and may only
//! contain `[[suite]]` tables.

use std::collections::BTreeMap;
use std::num::NonZeroU8;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use miette::Diagnostic as MietteDiagnostic;
use serde::Deserialize;
use thiserror::Error;

use crate::core::call::{Call, CallError};
use crate::core::check::{Actual, Check, Gate};
use crate::core::suite::Suite;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// File name searched for when no manifest path is given.
pub const MANIFEST_NAME: &str = "Checks.toml";

/// Manifest validation errors.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ManifestError {
    #[error("could not find `Checks.toml` in `{}` or any parent directory", .dir.display())]
    #[diagnostic(
        code(demokit::manifest::not_found),
        help("run `demokit run --builtin` to use the built-in suites")
    )]
    NotFound { dir: PathBuf },

    #[error("suite `{name}` is defined more than once")]
    #[diagnostic(code(demokit::manifest::duplicate_suite))]
    DuplicateSuite {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("suite name must not be empty ({})", .path.display())]
    #[diagnostic(code(demokit::manifest::empty_name))]
    EmptySuiteName { path: PathBuf },

    #[error("check {index} of suite `{suite}`: {source}")]
    #[diagnostic(code(demokit::manifest::invalid_call))]
    InvalidCall {
        suite: String,
        index: usize,
        #[source]
        source: CallError,
    },

    #[error("check {index} of suite `{suite}` must set exactly one of `call` or `value`")]
    #[diagnostic(code(demokit::manifest::actual))]
    AmbiguousActual { suite: String, index: usize },

    #[error("check {index} of suite `{suite}` has exit code 0, which means success")]
    #[diagnostic(code(demokit::manifest::zero_code), help("use a code between 1 and 255"))]
    ZeroCode { suite: String, index: usize },

    #[error("invalid include pattern `{pattern}`")]
    #[diagnostic(code(demokit::manifest::include))]
    BadInclude {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl ManifestError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            ManifestError::NotFound { .. } => diag
                .with_suggestion(suggestions::NO_MANIFEST)
                .with_suggestion(suggestions::USE_BUILTIN),
            ManifestError::DuplicateSuite { first, second, .. } => diag
                .with_context(format!("first defined in {}", first.display()))
                .with_context(format!("defined again in {}", second.display()))
                .with_suggestion("Rename one of the suites"),
            ManifestError::InvalidCall { source, .. } => {
                let mut diag = diag;
                for s in source.to_diagnostic().suggestions {
                    diag = diag.with_suggestion(s);
                }
                diag
            }
            _ => diag,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    #[serde(default)]
    include: Vec<String>,

    #[serde(default)]
    suite: Vec<RawSuite>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSuite {
    name: String,

    #[serde(default)]
    header: Option<String>,

    #[serde(default)]
    report_env: Vec<String>,

    #[serde(default)]
    env: BTreeMap<String, String>,

    #[serde(default = "default_repeat")]
    repeat: u32,

    #[serde(default = "default_true")]
    enabled: bool,

    #[serde(default)]
    check: Vec<RawCheck>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCheck {
    #[serde(default)]
    call: Option<String>,

    #[serde(default)]
    value: Option<i64>,

    expect: i64,

    #[serde(default)]
    code: Option<u8>,

    #[serde(default)]
    when: Option<Gate>,
}

fn default_repeat() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

/// A loaded manifest and all the suites it declares.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    suites: Vec<Suite>,
}

impl Manifest {
    /// Load a manifest and its includes from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;
        let raw: RawManifest = toml::from_str(&content)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))?;

        let base = path.parent().unwrap_or(Path::new("."));
        let mut sources = vec![(path.to_path_buf(), raw.suite)];

        for pattern in &raw.include {
            for included in expand_include(base, pattern)? {
                tracing::debug!("including suites from {}", included.display());
                let content = std::fs::read_to_string(&included).with_context(|| {
                    format!("failed to read included file: {}", included.display())
                })?;
                let raw: RawManifest = toml::from_str(&content).with_context(|| {
                    format!("failed to parse included file: {}", included.display())
                })?;
                if !raw.include.is_empty() {
                    tracing::warn!("ignoring nested `include` in {}", included.display());
                }
                sources.push((included, raw.suite));
            }
        }

        let mut seen: BTreeMap<String, PathBuf> = BTreeMap::new();
        let mut suites = Vec::new();
        for (file, raw_suites) in sources {
            for raw in raw_suites {
                let suite = build_suite(raw, &file)?;
                if let Some(first) = seen.get(&suite.name) {
                    return Err(ManifestError::DuplicateSuite {
                        name: suite.name,
                        first: first.clone(),
                        second: file,
                    }
                    .into());
                }
                seen.insert(suite.name.clone(), file.clone());
                suites.push(suite);
            }
        }

        Ok(Manifest {
            path: path.to_path_buf(),
            suites,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn suites(&self) -> &[Suite] {
        &self.suites
    }

    pub fn into_suites(self) -> Vec<Suite> {
        self.suites
    }

    /// Find a suite by name.
    pub fn suite(&self, name: &str) -> Option<&Suite> {
        self.suites.iter().find(|s| s.name == name)
    }
}

fn expand_include(base: &Path, pattern: &str) -> Result<Vec<PathBuf>, ManifestError> {
    let full = base.join(pattern);
    let full = full.to_string_lossy();
    let paths = glob::glob(&full).map_err(|source| ManifestError::BadInclude {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => tracing::warn!("glob error: {}", e),
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn build_suite(raw: RawSuite, file: &Path) -> Result<Suite, ManifestError> {
    let name = raw.name.trim().to_string();
    if name.is_empty() {
        return Err(ManifestError::EmptySuiteName {
            path: file.to_path_buf(),
        });
    }

    let mut suite = Suite::new(name.clone()).with_repeat(raw.repeat);
    suite.header = raw.header;
    suite.report_env = raw.report_env;
    suite.env = raw.env;
    suite.enabled = raw.enabled;

    for (i, raw_check) in raw.check.into_iter().enumerate() {
        let index = i + 1;
        let actual = match (raw_check.call, raw_check.value) {
            (Some(text), None) => {
                let call: Call = text.parse().map_err(|source| ManifestError::InvalidCall {
                    suite: name.clone(),
                    index,
                    source,
                })?;
                Actual::Call(call)
            }
            (None, Some(value)) => Actual::Value(value),
            _ => {
                return Err(ManifestError::AmbiguousActual {
                    suite: name.clone(),
                    index,
                })
            }
        };

        let mut check = Check::new(actual, raw_check.expect);
        if let Some(code) = raw_check.code {
            let code = NonZeroU8::new(code).ok_or_else(|| ManifestError::ZeroCode {
                suite: name.clone(),
                index,
            })?;
            check = check.with_code(code);
        }
        check.gate = raw_check.when;
        suite.checks.push(check);
    }

    Ok(suite)
}

/// Find the manifest by searching `start` and its parents.
///
/// With a `ceiling`, the search stops after checking that directory. A
/// `start` outside the ceiling is searched all the way up.
pub fn find_manifest(start: &Path, ceiling: Option<&Path>) -> Result<PathBuf, ManifestError> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(MANIFEST_NAME);
        if candidate.is_file() {
            return Ok(candidate);
        }
        if ceiling.is_some_and(|c| current == c) || !current.pop() {
            return Err(ManifestError::NotFound {
                dir: start.to_path_buf(),
            });
        }
    }
}
