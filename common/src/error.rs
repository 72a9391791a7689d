use std::path::PathBuf;

use thiserror::Error;

/// Failures that end a run or one of its phases.
///
/// Per-job and per-document trouble never shows up here. A timed-out scan
/// or a corrupt partial document is logged and absorbed where it happens;
/// only total losses surface through this type.
#[derive(Debug, Error)]
pub enum RunError {
    /// The scanner binary could not be resolved. Nothing can run without it.
    #[error("{0} is not installed or not in PATH")]
    MissingDependency(String),

    /// Partial documents existed but none of them parsed.
    #[error("no valid scan results to merge")]
    NoValidResults,

    /// The private directory for partial results could not be created or
    /// read back.
    #[error("scan scratch directory unavailable: {0}")]
    ScratchDir(#[source] std::io::Error),

    /// The merged document could not be written out.
    #[error("failed to write {}: {source}", .path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The merged document could not be serialized.
    #[error("failed to serialize merged results: {0}")]
    Serialize(String),
}
