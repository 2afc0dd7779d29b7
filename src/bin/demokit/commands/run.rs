//! `demokit run` command

use anyhow::Result;

use super::list::discover_options;
use super::Session;
use crate::cli::RunArgs;
use demokit::ops::builtin::BROKEN_TEST;
use demokit::ops::{discover_suites, render, run_suites, select_suites, MessageFormat, RunOptions};
use demokit::util::diagnostic::suggestions;
use demokit::util::shell::{format_duration, Status};
use demokit::util::{Config, ProcessEnv};

/// Build run options from flags over configuration.
///
/// Precedence for variables, lowest to highest: config `[env]`, `--broken`,
/// `--env`.
pub fn run_options(args: &RunArgs, config: &Config) -> RunOptions {
    let mut env = config.env.vars.clone();
    if args.broken {
        env.insert(BROKEN_TEST.to_string(), "true".to_string());
    }
    env.extend(args.env.iter().cloned());

    RunOptions {
        jobs: args.jobs.or(config.run.jobs),
        fail_fast: args.fail_fast || config.run.fail_fast.unwrap_or(false),
        env,
    }
}

pub fn execute(args: RunArgs, session: &Session) -> Result<u8> {
    let format = args
        .message_format
        .or_else(|| session.config.message_format())
        .unwrap_or_default();
    let shell = session.shell(format == MessageFormat::Json);

    let discovered = discover_suites(&session.ctx, &discover_options(&args.source))?;
    if let Some(path) = &discovered.manifest {
        shell.status(Status::Loading, path.display());
    }

    let suites = select_suites(discovered.suites, &args.suites)?;
    let opts = run_options(&args, &session.config);
    if opts.env.get(BROKEN_TEST).map(String::as_str) == Some("true") {
        shell.warn(format!("{}=true enables the deliberately failing checks", BROKEN_TEST));
    }

    shell.status(Status::Running, format!("{} suite(s)", suites.len()));
    let report = run_suites(&suites, &ProcessEnv, &opts)?;

    print!("{}", render(&report, format, session.verbose));

    if report.skipped_count() > 0 {
        shell.status(Status::Skipped, format!("{} suite(s) not run", report.skipped_count()));
    }

    if report.is_success() {
        shell.status(
            Status::Finished,
            format!("{} suite(s) in {}", suites.len(), format_duration(report.duration)),
        );
    } else {
        shell.status(
            Status::Failed,
            format!(
                "{} of {} suite(s) failed; exit code {}",
                report.failed_count(),
                suites.len(),
                report.exit_code()
            ),
        );
        shell.note(suggestions::RUN_FAILED);
    }

    Ok(report.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    /// Helper to parse RunArgs from command-line strings.
    fn parse_run_args(args: &[&str]) -> RunArgs {
        #[derive(Parser)]
        struct TestCli {
            #[command(flatten)]
            run: RunArgs,
        }
        TestCli::parse_from(args).run
    }

    #[test]
    fn test_run_args_defaults() {
        let args = parse_run_args(&["run"]);
        assert!(args.suites.is_empty());
        assert!(args.jobs.is_none());
        assert!(!args.fail_fast);
        assert!(!args.broken);
        assert!(args.env.is_empty());
        assert!(args.message_format.is_none());
        assert!(!args.source.builtin);
    }

    #[test]
    fn test_run_args_full() {
        let args = parse_run_args(&[
            "run",
            "-j",
            "4",
            "--fail-fast",
            "--broken",
            "-e",
            "AZ=111",
            "--env",
            "X=y",
            "--message-format",
            "json",
            "--builtin",
            "shlib",
            "extra",
        ]);

        assert_eq!(args.suites, vec!["shlib", "extra"]);
        assert_eq!(args.jobs, Some(4));
        assert!(args.fail_fast);
        assert!(args.broken);
        assert_eq!(
            args.env,
            vec![
                ("AZ".to_string(), "111".to_string()),
                ("X".to_string(), "y".to_string())
            ]
        );
        assert_eq!(args.message_format, Some(MessageFormat::Json));
        assert!(args.source.builtin);
    }

    #[test]
    fn test_run_args_rejects_bad_env() {
        #[derive(Parser)]
        struct TestCli {
            #[command(flatten)]
            run: RunArgs,
        }
        assert!(TestCli::try_parse_from(["run", "-e", "novalue"]).is_err());
    }

    #[test]
    fn test_run_options_precedence() {
        let mut config = Config::default();
        config.run.jobs = Some(2);
        config
            .env
            .vars
            .insert(BROKEN_TEST.to_string(), "false".to_string());
        config.env.vars.insert("AZ".to_string(), "1".to_string());

        let args = parse_run_args(&["run", "--broken", "-e", "AZ=2"]);
        let opts = run_options(&args, &config);

        assert_eq!(opts.jobs, Some(2));
        assert!(!opts.fail_fast);
        assert_eq!(opts.env[BROKEN_TEST], "true");
        assert_eq!(opts.env["AZ"], "2");
    }

    #[test]
    fn test_run_options_flag_overrides_jobs() {
        let mut config = Config::default();
        config.run.jobs = Some(2);
        config.run.fail_fast = Some(true);

        let args = parse_run_args(&["run", "-j", "8"]);
        let opts = run_options(&args, &config);
        assert_eq!(opts.jobs, Some(8));
        assert!(opts.fail_fast);
    }
}
