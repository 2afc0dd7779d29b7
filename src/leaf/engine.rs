//! The "engine" library: compositions of the leaf functions that print as
//! they go, as the multi-library demos do.

use std::io::{self, Write};

use super::{calc_sum, calc_sum3, double_sum, factorial};

/// Compute the engine's canonical value.
///
/// `calc_sum3(2, 10, double_sum(5, 10))`, which is 42.
pub fn calc_something() -> i32 {
    calc_sum3(2, 10, double_sum(5, 10))
}

/// Write `Sum of {a} and {b} is equal to {sum}` and return the sum.
pub fn calc_sum_and_print<W: Write>(a: i32, b: i32, out: &mut W) -> io::Result<i32> {
    let sum = calc_sum(a, b);
    writeln!(out, "Sum of {} and {} is equal to {}", a, b, sum)?;
    Ok(sum)
}

/// Run the engine demo program.
pub fn run_engine<W: Write>(out: &mut W) -> io::Result<()> {
    let (a, b, c) = (11, 22, 33);

    writeln!(out, "Hello there!")?;

    calc_sum_and_print(a, b, out)?;
    calc_sum_and_print(b, c, out)?;

    let sum = calc_sum3(a, b, c);
    calc_sum_and_print(sum, c, out)?;

    Ok(())
}

/// Run the factorial demo program for `n`.
pub fn factorial_report<W: Write>(n: u32, out: &mut W) -> io::Result<()> {
    writeln!(out, "factorial of {} is {}", n, factorial(n))?;
    writeln!(out, "test passed")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_calc_something() {
        assert_eq!(calc_something(), 42);
    }

    #[test]
    fn test_calc_sum_and_print() {
        let mut buf = Vec::new();
        let sum = calc_sum_and_print(11, 22, &mut buf).unwrap();
        assert_eq!(sum, 33);
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Sum of 11 and 22 is equal to 33\n"
        );
    }

    #[test]
    fn test_run_engine_output() {
        let output = captured(|buf| run_engine(buf));
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Hello there!",
                "Sum of 11 and 22 is equal to 33",
                "Sum of 22 and 33 is equal to 55",
                "Sum of 66 and 33 is equal to 99",
            ]
        );
    }

    #[test]
    fn test_factorial_report() {
        let output = captured(|buf| factorial_report(6, buf));
        assert_eq!(output, "factorial of 6 is 720\ntest passed\n");
    }
}
