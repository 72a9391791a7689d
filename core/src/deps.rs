//! Preflight checks for the external collaborators.

use std::path::{Path, PathBuf};

use fanmap_common::error::RunError;
use tracing::debug;

/// The stylesheet processor used for HTML reports.
pub const RENDERER_BIN: &str = "xsltproc";

/// Resolves the scanner binary, bare name through PATH or explicit path.
///
/// Nothing can run without it, so failure here aborts the run before any
/// job is dispatched.
pub fn check_scanner(scanner: &Path) -> Result<PathBuf, RunError> {
    match which::which(scanner) {
        Ok(resolved) => {
            debug!("scanner binary resolved to {}", resolved.display());
            Ok(resolved)
        }
        Err(_) => Err(RunError::MissingDependency(
            scanner.display().to_string(),
        )),
    }
}

/// Whether the HTML renderer is around. Its absence only costs the HTML
/// report, never the run.
pub fn renderer_available() -> bool {
    which::which(RENDERER_BIN).is_ok()
}
