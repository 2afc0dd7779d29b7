//! High-level operations.
//!
//! This module contains the implementation of demokit commands.

pub mod builtin;
pub mod discover;
pub mod format;
pub mod run;

pub use builtin::builtin_suites;
pub use discover::{discover_suites, DiscoverOptions, Discovered};
pub use format::{format_report, format_report_json, render, MessageFormat};
pub use run::{
    merge_suites, run_suite, run_suites, select_suites, RunOptions, RunReport, SuiteReport,
    SuiteStatus, UnknownSuiteError,
};
