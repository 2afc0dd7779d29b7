//! Leaf libraries.
//!
//! Pure integer functions that stand in for the tiny static and shared
//! libraries of a build demo. Integer arithmetic wraps on overflow.

pub mod engine;

pub use engine::{calc_something, calc_sum_and_print, factorial_report, run_engine};

/// Sum of two integers.
pub fn calc_sum(a: i32, b: i32) -> i32 {
    a.wrapping_add(b)
}

/// Sum of three integers.
pub fn calc_sum3(a: i32, b: i32, c: i32) -> i32 {
    a.wrapping_add(b).wrapping_add(c)
}

/// Twice the sum of two integers.
pub fn double_sum(a: i32, b: i32) -> i32 {
    calc_sum(a, b).wrapping_mul(2)
}

/// Factorial with the demo library's base case.
///
/// `number <= 1` returns `number` itself, so `factorial(0) == 0` rather than
/// the conventional `0! == 1`. Large inputs wrap.
pub fn factorial(number: u32) -> u32 {
    if number <= 1 {
        number
    } else {
        factorial(number - 1).wrapping_mul(number)
    }
}
