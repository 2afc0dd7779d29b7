//! `demokit list` command

use anyhow::Result;

use super::Session;
use crate::cli::{ListArgs, SourceArgs};
use demokit::core::Suite;
use demokit::ops::{discover_suites, DiscoverOptions};

pub(crate) fn discover_options(source: &SourceArgs) -> DiscoverOptions {
    DiscoverOptions {
        manifest: source.manifest.clone(),
        builtin_only: source.builtin,
    }
}

/// One listing line: `name  N check(s)` plus markers.
pub fn describe(suite: &Suite) -> String {
    let mut line = format!("{:<16} {} check(s)", suite.name, suite.checks.len());
    if suite.repeat > 1 {
        line.push_str(&format!(", repeat {}", suite.repeat));
    }
    if !suite.enabled {
        line.push_str(" [disabled]");
    }
    line
}

pub fn execute(args: ListArgs, session: &Session) -> Result<u8> {
    let discovered = discover_suites(&session.ctx, &discover_options(&args.source))?;

    if let Some(path) = &discovered.manifest {
        session.shell(false).note(format!("manifest: {}", path.display()));
    }

    for suite in &discovered.suites {
        println!("{}", describe(suite));
        if session.verbose {
            for check in &suite.checks {
                println!("    {}", check.describe());
            }
        }
    }

    Ok(0)
}
