//! `demokit check` command

use anyhow::Result;

use super::Session;
use crate::cli::CheckArgs;
use demokit::core::Call;
use demokit::expect_eq_stdout;
use demokit::util::shell::Status;

pub fn execute(args: CheckArgs, session: &Session) -> Result<u8> {
    let call: Call = args.call.parse()?;
    let actual = call.evaluate();
    tracing::debug!("{} evaluated to {}", call, actual);

    let shell = session.shell(false);
    if expect_eq_stdout(actual, args.expected) {
        shell.status(Status::Passed, format!("{} == {}", call, args.expected));
        Ok(0)
    } else {
        shell.status(Status::Failed, format!("{} != {}", call, args.expected));
        Ok(1)
    }
}
