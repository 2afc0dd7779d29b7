//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use demokit::ops::MessageFormat;
use demokit::util::env::parse_assignment;
use demokit::util::shell::ColorChoice;

/// demokit - minimal assertion harness for build verification
#[derive(Parser)]
#[command(name = "demokit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN")]
    pub color: Option<ColorChoice>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List available suites
    List(ListArgs),

    /// Run suites of checks
    Run(RunArgs),

    /// Evaluate one call expression and compare it with a value
    Check(CheckArgs),

    /// Show how environment variables resolve
    Env(EnvArgs),

    /// Run a leaf-library demo program
    Demo(DemoArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Where suites come from; shared by `list` and `run`.
#[derive(Args, Clone, Default)]
pub struct SourceArgs {
    /// Path to a Checks.toml manifest (default: search upward from cwd)
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Use only the built-in suites
    #[arg(long, conflicts_with = "manifest")]
    pub builtin: bool,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args)]
pub struct RunArgs {
    /// Suites to run (defaults to all)
    pub suites: Vec<String>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Number of suites run in parallel
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Stop after the first failing suite
    #[arg(long)]
    pub fail_fast: bool,

    /// Enable the deliberately failing checks (BROKEN_TEST=true)
    #[arg(long)]
    pub broken: bool,

    /// Extra environment for this run
    #[arg(short, long = "env", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub env: Vec<(String, String)>,

    /// Output format: human, json
    #[arg(long, value_name = "FMT")]
    pub message_format: Option<MessageFormat>,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Call expression, e.g. "calc_sum3(1, 2, 3)"
    pub call: String,

    /// Expected value
    #[arg(allow_negative_numbers = true)]
    pub expected: i64,
}

#[derive(Args)]
pub struct EnvArgs {
    /// Variables to show (defaults to AZ, BROKEN_TEST and configured variables)
    pub vars: Vec<String>,
}

#[derive(Args)]
pub struct DemoArgs {
    #[command(subcommand)]
    pub program: DemoProgram,
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DemoProgram {
    /// Print sums through the engine library
    Engine,

    /// Print a factorial
    Factorial {
        #[arg(default_value_t = 6)]
        n: u32,
    },

    /// Print the sum of two integers
    Sum {
        #[arg(allow_negative_numbers = true)]
        a: i32,
        #[arg(allow_negative_numbers = true)]
        b: i32,
    },

    /// Print the engine's computed value
    Something,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
