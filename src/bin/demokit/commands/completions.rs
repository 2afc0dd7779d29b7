//! `demokit completions` command

use std::io;

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::generate;

use crate::cli::{Cli, CompletionsArgs};

pub fn execute(args: CompletionsArgs) -> Result<u8> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "demokit", &mut io::stdout());
    Ok(0)
}
