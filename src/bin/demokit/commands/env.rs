//! `demokit env` command

use anyhow::Result;

use super::Session;
use crate::cli::EnvArgs;
use demokit::ops::builtin::{AZ, BROKEN_TEST};
use demokit::util::env::{EnvSource, Layered};
use demokit::util::ProcessEnv;

/// Names shown when none are given: the built-in suites' variables followed
/// by any configured in `[env]`.
pub fn default_vars(configured: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut names = vec![AZ.to_string(), BROKEN_TEST.to_string()];
    for name in configured {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

pub fn execute(args: EnvArgs, session: &Session) -> Result<u8> {
    let env = Layered::new(&ProcessEnv).with(session.config.env.vars.clone());

    let names = if args.vars.is_empty() {
        default_vars(session.config.env.vars.keys().cloned())
    } else {
        args.vars
    };

    for name in &names {
        println!("env var '{}' = {}", name, env.display(name));
    }

    Ok(0)
}
