//! Status lines on stderr.
//!
//! Every command reports progress through [`Shell`]: a right-aligned verb,
//! colored when stderr is a terminal, followed by a message.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: failures only
    Quiet,
    #[default]
    Normal,
    /// --verbose: extra detail
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success statuses (green)
    Passed,
    Finished,

    // In-progress statuses (cyan)
    Running,
    Loading,

    // Info statuses (blue)
    Info,

    // Warning statuses (yellow)
    Skipped,
    Warning,

    // Error statuses (red)
    Failed,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Passed => "Passed",
            Status::Finished => "Finished",
            Status::Running => "Running",
            Status::Loading => "Loading",
            Status::Info => "Info",
            Status::Skipped => "Skipped",
            Status::Warning => "Warning",
            Status::Failed => "Failed",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Passed | Status::Finished => "\x1b[1;32m",
            Status::Running | Status::Loading => "\x1b[1;36m",
            Status::Info => "\x1b[1;34m",
            Status::Skipped | Status::Warning => "\x1b[1;33m",
            Status::Failed => "\x1b[1;31m",
        }
    }

    fn is_failure(&self) -> bool {
        matches!(self, Status::Failed)
    }
}

/// Width status verbs are right-aligned to.
const STATUS_WIDTH: usize = 12;

/// Status output for one command.
///
/// A JSON-mode shell prints nothing: the report on stdout is the only output.
#[derive(Debug, Clone, Copy)]
pub struct Shell {
    verbosity: Verbosity,
    json: bool,
    use_color: bool,
}

impl Shell {
    pub fn new(verbosity: Verbosity, color: ColorChoice) -> Self {
        let use_color = match color {
            ColorChoice::Auto => io::stderr().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };

        Shell {
            verbosity,
            json: false,
            use_color,
        }
    }

    /// A shell that stays silent for JSON output.
    pub fn json() -> Self {
        Shell {
            verbosity: Verbosity::Normal,
            json: true,
            use_color: false,
        }
    }

    /// Create a shell from CLI flags. JSON wins over quiet/verbose.
    pub fn from_flags(quiet: bool, verbose: bool, color: ColorChoice, json: bool) -> Self {
        if json {
            return Shell::json();
        }

        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        Shell::new(verbosity, color)
    }

    pub fn is_quiet(&self) -> bool {
        !self.json && self.verbosity == Verbosity::Quiet
    }

    pub fn is_verbose(&self) -> bool {
        !self.json && self.verbosity == Verbosity::Verbose
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Print a status line to stderr.
    ///
    /// Quiet shells print only failures; JSON shells print nothing.
    pub fn status(&self, status: Status, msg: impl Display) {
        if let Some(line) = self.status_line(status, msg) {
            let _ = writeln!(io::stderr().lock(), "{}", line);
        }
    }

    pub fn note(&self, msg: impl Display) {
        self.status(Status::Info, msg);
    }

    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    /// The line [`Shell::status`] would print, if any.
    fn status_line(&self, status: Status, msg: impl Display) -> Option<String> {
        if self.json || (self.is_quiet() && !status.is_failure()) {
            return None;
        }
        Some(format!("{} {}", self.format_status(status), msg))
    }

    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();

        if self.use_color {
            format!(
                "{}{:>width$}\x1b[0m",
                status.color_code(),
                text,
                width = STATUS_WIDTH
            )
        } else {
            format!("{:>width$}", text, width = STATUS_WIDTH)
        }
    }
}

/// Format a duration in a human-readable way.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}
