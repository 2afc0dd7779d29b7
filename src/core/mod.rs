//! Core types: checks, suites, outcomes and the suite manifest.

pub mod call;
pub mod check;
pub mod manifest;
pub mod outcome;
pub mod suite;

pub use call::{Call, CallError, LeafFn};
pub use check::{Actual, Check, CheckStatus, Gate};
pub use manifest::{Manifest, ManifestError};
pub use outcome::Outcome;
pub use suite::{Suite, SuiteRun};
