use std::path::PathBuf;
use std::time::Duration;

use crate::profile::ScanProfile;

/// Everything a single orchestration run operates under.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Number of scan workers running concurrently.
    pub workers: usize,
    /// Hard deadline for each individual scan invocation.
    ///
    /// A job past its deadline gets its scanner process killed, not
    /// abandoned.
    pub job_timeout: Duration,
    /// Argument profile applied to every invocation of this run.
    pub profile: ScanProfile,
    /// Scanner binary, a bare name resolved through PATH or a full path.
    pub scanner: PathBuf,
    /// Where the merged document ends up.
    pub output: PathBuf,
    /// Drop the merged XML after an HTML report was rendered from it.
    pub discard_xml: bool,
}
