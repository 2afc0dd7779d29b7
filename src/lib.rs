//! demokit - a minimal assertion harness for build verification
//!
//! This crate provides the leaf libraries of a build demo, an equality
//! assertion helper, and suites of checks that report a structured outcome
//! instead of an ad-hoc process exit code.

pub mod core;
pub mod leaf;
pub mod ops;
pub mod util;

pub use crate::core::{
    call::Call,
    check::{expect_eq, expect_eq_stdout, Check},
    manifest::Manifest,
    outcome::Outcome,
    suite::Suite,
};

pub use ops::{run_suites, RunOptions, RunReport};
pub use util::context::GlobalContext;
