//! Shared building blocks for the scan orchestrator: target resolution,
//! scan profiles, run configuration and the error taxonomy.

pub mod config;
pub mod error;
pub mod profile;
pub mod target;

pub use tracing;

/// Success-grade log line, rendered with its own marker by the CLI formatter.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "fanmap::success", $($arg)*)
    };
}
