//! User-friendly diagnostic messages.
//!
//! Every error shown to a user names the root cause and, where there is
//! one, a concrete next step.

use std::fmt::{self, Write as _};
use std::io::{self, IsTerminal};

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when no manifest file is found.
    pub const NO_MANIFEST: &str = "Create a Checks.toml with one or more [[suite]] tables";

    /// Suggestion for running without a manifest.
    pub const USE_BUILTIN: &str = "Run `demokit run --builtin` to use the built-in suites";

    /// Suggestion when a suite name is unknown.
    pub const SUITE_NOT_FOUND: &str = "Run `demokit list` to see available suites";

    /// Suggestion when a run fails.
    pub const RUN_FAILED: &str = "Run `demokit run --verbose <suite>` to see every check";
}

const RED: &str = "\x1b[1;31m";
const GREEN: &str = "\x1b[1;32m";
const RESET: &str = "\x1b[0m";

/// An error message with context lines and suggested fixes.
#[derive(Debug, Clone, Default)]
pub struct Diagnostic {
    pub message: String,
    pub context: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let paint = |code: &str, text: &str| {
            if color {
                format!("{}{}{}", code, text, RESET)
            } else {
                text.to_string()
            }
        };

        let mut output = format!("{}: {}\n", paint(RED, "error"), self.message);

        for ctx in &self.context {
            let _ = writeln!(output, "  = {}", ctx);
        }

        if !self.suggestions.is_empty() {
            let _ = writeln!(output, "\n{}: consider:", paint(GREEN, "help"));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                let _ = writeln!(output, "  {}. {}", i + 1, suggestion);
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}

/// Print a diagnostic to stderr, colored when stderr is a terminal.
pub fn emit(diagnostic: &Diagnostic) {
    eprint!("{}", diagnostic.format(io::stderr().is_terminal()));
}
