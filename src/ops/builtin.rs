//! Built-in suites mirroring the demo projects' test executables.

use std::num::NonZeroU8;

use crate::core::call::CallError;
use crate::core::check::{Check, Gate};
use crate::core::suite::Suite;

/// Variable that switches on the deliberately failing checks.
pub const BROKEN_TEST: &str = "BROKEN_TEST";

/// Informational variable printed by the library suites.
pub const AZ: &str = "AZ";

const ONE: NonZeroU8 = NonZeroU8::MIN;
const TWO: NonZeroU8 = match NonZeroU8::new(2) {
    Some(n) => n,
    None => unreachable!(),
};

fn broken() -> Gate {
    Gate::new(BROKEN_TEST, "true")
}

/// All built-in suites, in listing order.
pub fn builtin_suites() -> Result<Vec<Suite>, CallError> {
    Ok(vec![
        Suite::new("stlib")
            .with_header("Tests of stlib ...")
            .check(Check::call("calc_sum(1, 3)".parse()?, 4).with_code(ONE))
            .check(Check::call("calc_sum(11, 30)".parse()?, 41).with_code(ONE)),
        Suite::new("shlib")
            .with_header("Tests of shlib ...")
            .reporting_env([AZ, BROKEN_TEST])
            .check(Check::call("calc_sum3(1, 2, 3)".parse()?, 6).with_code(ONE))
            .check(Check::call("calc_sum3(-11, -30, 42)".parse()?, 1).with_code(ONE))
            .check(
                Check::call("calc_sum3(-11, -30, 42)".parse()?, 2)
                    .with_code(TWO)
                    .when(broken()),
            ),
        Suite::new("extra")
            .with_header("Tests of lib 'extra'...")
            .reporting_env([AZ, BROKEN_TEST])
            .check(Check::call("double_sum(1, 2)".parse()?, 6).with_code(ONE))
            .check(
                Check::call("double_sum(1, 2)".parse()?, 7)
                    .with_code(TWO)
                    .when(broken()),
            ),
        Suite::new("engine")
            .with_header("Tests of engine ...")
            .check(Check::call("calc_something()".parse()?, 42)),
        Suite::new("factorial")
            .with_header("Tests of factorial ...")
            .check(Check::call("factorial(6)".parse()?, 720))
            .check(Check::call("factorial(1)".parse()?, 1))
            .check(Check::call("factorial(0)".parse()?, 0)),
    ])
}
