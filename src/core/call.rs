//! Call expressions naming a leaf function and its arguments.
//!
//! Manifest checks describe their actual value as text, e.g.
//! `calc_sum3(-11, -30, 42)`. A [`Call`] is validated when it is parsed, so
//! evaluating it cannot fail.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use miette::Diagnostic as MietteDiagnostic;
use regex::Regex;
use thiserror::Error;

use crate::leaf;
use crate::util::diagnostic::Diagnostic;

static CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*\(([^()]*)\)\s*$").expect("call regex is valid")
});

/// A function exported by the leaf libraries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafFn {
    CalcSum,
    CalcSum3,
    DoubleSum,
    Factorial,
    CalcSomething,
}

impl LeafFn {
    /// Every callable leaf function.
    pub const ALL: [LeafFn; 5] = [
        LeafFn::CalcSum,
        LeafFn::CalcSum3,
        LeafFn::DoubleSum,
        LeafFn::Factorial,
        LeafFn::CalcSomething,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LeafFn::CalcSum => "calc_sum",
            LeafFn::CalcSum3 => "calc_sum3",
            LeafFn::DoubleSum => "double_sum",
            LeafFn::Factorial => "factorial",
            LeafFn::CalcSomething => "calc_something",
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            LeafFn::CalcSum | LeafFn::DoubleSum => 2,
            LeafFn::CalcSum3 => 3,
            LeafFn::Factorial => 1,
            LeafFn::CalcSomething => 0,
        }
    }

    /// Look up a function by name. The camelCase names of the demo libraries
    /// (`calcSum3`, `doubleSum`, ...) are accepted too.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "calc_sum" | "calcSum" => Some(LeafFn::CalcSum),
            "calc_sum3" | "calcSum3" => Some(LeafFn::CalcSum3),
            "double_sum" | "doubleSum" => Some(LeafFn::DoubleSum),
            "factorial" => Some(LeafFn::Factorial),
            "calc_something" | "calcSomething" => Some(LeafFn::CalcSomething),
            _ => None,
        }
    }

    fn check_arg(&self, index: usize, value: i64) -> Result<(), CallError> {
        let in_range = match self {
            LeafFn::Factorial => u32::try_from(value).is_ok(),
            _ => i32::try_from(value).is_ok(),
        };
        if in_range {
            Ok(())
        } else {
            Err(CallError::ArgumentOutOfRange {
                function: self.name().to_string(),
                index,
                value,
            })
        }
    }
}

impl fmt::Display for LeafFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error building or parsing a call expression.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum CallError {
    #[error("malformed call expression `{0}`")]
    #[diagnostic(
        code(demokit::call::malformed),
        help("write calls as `name(arg, ...)`, e.g. `calc_sum3(1, 2, 3)`")
    )]
    Malformed(String),

    #[error("unknown function `{0}`")]
    #[diagnostic(code(demokit::call::unknown_function))]
    UnknownFunction(String),

    #[error("`{function}` takes {expected} argument(s), got {found}")]
    #[diagnostic(code(demokit::call::arity))]
    Arity {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("argument {index} of `{function}` is not an integer: `{text}`")]
    #[diagnostic(code(demokit::call::bad_argument))]
    BadArgument {
        function: String,
        index: usize,
        text: String,
    },

    #[error("argument {index} of `{function}` is out of range: {value}")]
    #[diagnostic(code(demokit::call::out_of_range))]
    ArgumentOutOfRange {
        function: String,
        index: usize,
        value: i64,
    },
}

impl CallError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            CallError::Malformed(_) => {
                diag.with_suggestion("Write calls as `name(arg, ...)`, e.g. `calc_sum3(1, 2, 3)`")
            }
            CallError::UnknownFunction(_) => {
                let names: Vec<&str> = LeafFn::ALL.iter().map(|f| f.name()).collect();
                diag.with_context(format!("known functions: {}", names.join(", ")))
            }
            CallError::Arity { .. } => diag,
            CallError::BadArgument { .. } => {
                diag.with_suggestion("Arguments must be decimal integer literals")
            }
            CallError::ArgumentOutOfRange { function, .. } => {
                let range = if function == LeafFn::Factorial.name() {
                    "0..=4294967295"
                } else {
                    "-2147483648..=2147483647"
                };
                diag.with_context(format!("`{}` accepts values in {}", function, range))
            }
        }
    }
}

/// A validated call of a leaf function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    func: LeafFn,
    args: Vec<i64>,
}

impl Call {
    /// Build a call, checking arity and argument ranges.
    pub fn new(func: LeafFn, args: Vec<i64>) -> Result<Self, CallError> {
        if args.len() != func.arity() {
            return Err(CallError::Arity {
                function: func.name().to_string(),
                expected: func.arity(),
                found: args.len(),
            });
        }
        for (i, value) in args.iter().enumerate() {
            func.check_arg(i + 1, *value)?;
        }
        Ok(Call { func, args })
    }

    pub fn func(&self) -> LeafFn {
        self.func
    }

    pub fn args(&self) -> &[i64] {
        &self.args
    }

    /// Evaluate the call.
    pub fn evaluate(&self) -> i64 {
        // Ranges were checked in `Call::new`.
        let int = |i: usize| self.args[i] as i32;
        match self.func {
            LeafFn::CalcSum => leaf::calc_sum(int(0), int(1)).into(),
            LeafFn::CalcSum3 => leaf::calc_sum3(int(0), int(1), int(2)).into(),
            LeafFn::DoubleSum => leaf::double_sum(int(0), int(1)).into(),
            LeafFn::Factorial => leaf::factorial(self.args[0] as u32).into(),
            LeafFn::CalcSomething => leaf::calc_something().into(),
        }
    }
}

impl FromStr for Call {
    type Err = CallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = CALL_RE
            .captures(s)
            .ok_or_else(|| CallError::Malformed(s.trim().to_string()))?;

        let name = &caps[1];
        let func =
            LeafFn::from_name(name).ok_or_else(|| CallError::UnknownFunction(name.to_string()))?;

        let raw_args = caps[2].trim();
        let mut args = Vec::new();
        if !raw_args.is_empty() {
            for (i, text) in raw_args.split(',').enumerate() {
                let text = text.trim();
                let value = text.parse::<i64>().map_err(|_| CallError::BadArgument {
                    function: func.name().to_string(),
                    index: i + 1,
                    text: text.to_string(),
                })?;
                args.push(value);
            }
        }

        Call::new(func, args)
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
        write!(f, "{}({})", self.func, args.join(", "))
    }
}
