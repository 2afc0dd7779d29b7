//! Environment variable lookup.
//!
//! Lookups return `Option<String>`: an unset variable is an explicit `None`,
//! never an implicit empty string.

use std::collections::{BTreeMap, HashMap};

/// Text shown for a variable that is not set.
pub const UNSET: &str = "NULL";

/// A source of environment variables.
pub trait EnvSource: Sync {
    /// Look up a variable. Unset variables and values that are not valid
    /// Unicode both yield `None`.
    fn var(&self, name: &str) -> Option<String>;

    /// The value for display, with [`UNSET`] for a missing variable.
    fn display(&self, name: &str) -> String {
        self.var(name).unwrap_or_else(|| UNSET.to_string())
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Variables layered over another source.
///
/// Lookups hit the overrides first and fall back to the base source.
pub struct Layered<'a, E: EnvSource + ?Sized> {
    base: &'a E,
    overrides: BTreeMap<String, String>,
}

impl<'a, E: EnvSource + ?Sized> Layered<'a, E> {
    pub fn new(base: &'a E) -> Self {
        Layered {
            base,
            overrides: BTreeMap::new(),
        }
    }

    /// Add overrides. Later calls win over earlier ones.
    pub fn with<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in vars {
            self.overrides.insert(k.into(), v.into());
        }
        self
    }

    pub fn overrides(&self) -> &BTreeMap<String, String> {
        &self.overrides
    }
}

impl<E: EnvSource + ?Sized> EnvSource for Layered<'_, E> {
    fn var(&self, name: &str) -> Option<String> {
        self.overrides
            .get(name)
            .cloned()
            .or_else(|| self.base.var(name))
    }
}

/// Parse a `KEY=VALUE` assignment.
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("invalid assignment '{}'; expected KEY=VALUE", s)),
    }
}
