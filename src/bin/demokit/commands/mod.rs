//! Command implementations

pub mod check;
pub mod completions;
pub mod demo;
pub mod env;
pub mod list;
pub mod run;

use anyhow::Result;

use crate::cli::Cli;
use demokit::util::shell::{ColorChoice, Shell};
use demokit::util::{Config, GlobalContext};

/// State shared by every command: working directory, merged config and the
/// global output flags.
pub struct Session {
    pub ctx: GlobalContext,
    pub config: Config,
    pub quiet: bool,
    pub verbose: bool,
    pub color: ColorChoice,
}

impl Session {
    pub fn new(cli: &Cli) -> Result<Self> {
        let ctx = GlobalContext::new()?;
        let config = ctx.load_config();
        let color = cli.color.or_else(|| config.color()).unwrap_or_default();

        Ok(Session {
            ctx,
            config,
            quiet: cli.quiet,
            verbose: cli.verbose,
            color,
        })
    }

    /// A shell for this session's flags.
    pub fn shell(&self, json: bool) -> Shell {
        Shell::from_flags(self.quiet, self.verbose, self.color, json)
    }
}
