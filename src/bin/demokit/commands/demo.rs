//! `demokit demo` command
//!
//! Small programs that drive the leaf libraries and print their results.

use std::io::{self, Write};

use anyhow::Result;

use crate::cli::{DemoArgs, DemoProgram};
use demokit::leaf::{calc_something, calc_sum_and_print, factorial_report, run_engine};

/// Write a demo program's output to `out`.
pub fn run_program<W: Write>(program: DemoProgram, out: &mut W) -> io::Result<()> {
    match program {
        DemoProgram::Engine => run_engine(out),
        DemoProgram::Factorial { n } => factorial_report(n, out),
        DemoProgram::Sum { a, b } => calc_sum_and_print(a, b, out).map(|_| ()),
        DemoProgram::Something => writeln!(out, "{}", calc_something()),
    }
}

pub fn execute(args: DemoArgs) -> Result<u8> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_program(args.program, &mut out)?;
    out.flush()?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(program: DemoProgram) -> String {
        let mut buf = Vec::new();
        run_program(program, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_engine_demo() {
        let out = output(DemoProgram::Engine);
        assert!(out.starts_with("Hello there!\n"));
        assert!(out.contains("Sum of 66 and 33 is equal to 99"));
    }

    #[test]
    fn test_factorial_demo() {
        assert_eq!(
            output(DemoProgram::Factorial { n: 6 }),
            "factorial of 6 is 720\ntest passed\n"
        );
    }

    #[test]
    fn test_sum_demo() {
        assert_eq!(
            output(DemoProgram::Sum { a: -2, b: 5 }),
            "Sum of -2 and 5 is equal to 3\n"
        );
    }

    #[test]
    fn test_something_demo() {
        assert_eq!(output(DemoProgram::Something), "42\n");
    }
}
