//! Collecting the suites a command operates on.

use std::path::PathBuf;

use anyhow::Result;

use super::builtin::builtin_suites;
use super::run::merge_suites;
use crate::core::manifest::{Manifest, ManifestError};
use crate::core::suite::Suite;
use crate::util::context::GlobalContext;

/// Where suites are taken from.
#[derive(Debug, Clone, Default)]
pub struct DiscoverOptions {
    /// Explicit manifest path. Skips discovery.
    pub manifest: Option<PathBuf>,

    /// Ignore any manifest and use only the built-in suites.
    pub builtin_only: bool,
}

/// Suites found for a command.
#[derive(Debug, Clone)]
pub struct Discovered {
    pub suites: Vec<Suite>,
    /// The manifest that contributed suites, if any.
    pub manifest: Option<PathBuf>,
}

/// Built-in suites, with a manifest's suites merged over them.
///
/// Without an explicit path the manifest is searched for upward from the
/// context's working directory; not finding one is not an error.
pub fn discover_suites(ctx: &GlobalContext, opts: &DiscoverOptions) -> Result<Discovered> {
    let builtin = builtin_suites()?;

    if opts.builtin_only {
        return Ok(Discovered {
            suites: builtin,
            manifest: None,
        });
    }

    let path = match &opts.manifest {
        Some(path) => path.clone(),
        None => match ctx.find_manifest() {
            Ok(path) => path,
            Err(ManifestError::NotFound { dir }) => {
                tracing::debug!("no manifest above {}, using built-in suites", dir.display());
                return Ok(Discovered {
                    suites: builtin,
                    manifest: None,
                });
            }
            Err(e) => return Err(e.into()),
        },
    };

    let manifest = Manifest::load(&path)?;
    tracing::debug!(
        "loaded {} suite(s) from {}",
        manifest.suites().len(),
        path.display()
    );

    Ok(Discovered {
        suites: merge_suites(builtin, manifest.into_suites()),
        manifest: Some(path),
    })
}
