//! Structured suite outcomes.

use std::fmt;
use std::num::NonZeroU8;

use serde::Serialize;

/// Result of running a suite: success, or the first failing check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed {
        /// 0-based position of the first failing check.
        index: usize,
        /// Exit code for the failure.
        code: NonZeroU8,
    },
}

impl Outcome {
    /// Failure at `index` with the default code, the 1-based ordinal.
    /// Ordinals above 255 saturate.
    pub fn failed_at(index: usize) -> Self {
        let ordinal = u8::try_from(index.saturating_add(1)).unwrap_or(u8::MAX);
        Outcome::Failed {
            index,
            code: NonZeroU8::new(ordinal).unwrap_or(NonZeroU8::MAX),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    /// Process exit code: 0 on success.
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Passed => 0,
            Outcome::Failed { code, .. } => code.get(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Passed => write!(f, "ok"),
            Outcome::Failed { code, .. } => write!(f, "FAILED (code {})", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passed_exit_code() {
        assert!(Outcome::Passed.is_success());
        assert_eq!(Outcome::Passed.exit_code(), 0);
    }

    #[test]
    fn test_failed_at_uses_ordinal() {
        let outcome = Outcome::failed_at(1);
        assert!(!outcome.is_success());
        assert_eq!(outcome.exit_code(), 2);
        assert_eq!(
            outcome,
            Outcome::Failed {
                index: 1,
                code: NonZeroU8::new(2).unwrap()
            }
        );
    }

    #[test]
    fn test_failed_at_saturates() {
        assert_eq!(Outcome::failed_at(254).exit_code(), 255);
        assert_eq!(Outcome::failed_at(1000).exit_code(), 255);
        assert_eq!(Outcome::failed_at(usize::MAX).exit_code(), 255);
    }

    #[test]
    fn test_display() {
        assert_eq!(Outcome::Passed.to_string(), "ok");
        assert_eq!(Outcome::failed_at(0).to_string(), "FAILED (code 1)");
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_value(Outcome::failed_at(2)).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["index"], 2);
        assert_eq!(json["code"], 3);
    }
}
