//! Builds and executes one scanner invocation per job.
//!
//! This is the only place scan processes are spawned. The per-job deadline
//! is enforced here too: a scanner past it is killed, never abandoned.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use fanmap_common::config::RunConfig;
use fanmap_common::profile::ScanProfile;
use tokio::process::Command;
use tokio::time;
use tracing::{debug, info, warn};

use super::{Job, JobRunner, Outcome};

/// Production [`JobRunner`]: one external scanner process per job.
pub struct NmapRunner {
    scanner: PathBuf,
    profile: ScanProfile,
    timeout: Duration,
}

impl NmapRunner {
    pub fn new(scanner: PathBuf, profile: ScanProfile, timeout: Duration) -> Self {
        NmapRunner {
            scanner,
            profile,
            timeout,
        }
    }

    pub fn from_config(cfg: &RunConfig) -> Self {
        Self::new(cfg.scanner.clone(), cfg.profile.clone(), cfg.job_timeout)
    }

    /// Full argv for one job: profile template, forced XML output to the
    /// job's private path, the port list when one was requested, then the
    /// host. Port order is the resolver's first-appearance order.
    fn build_args(&self, job: &Job) -> Option<Vec<OsString>> {
        let mut args: Vec<OsString> = self.profile.args()?.into_iter().map(Into::into).collect();

        args.push("-oX".into());
        args.push(job.output_path.clone().into_os_string());
        args.push("--webxml".into());

        if !job.target.ports.is_empty() {
            args.push("-p".into());
            args.push(job.target.ports.join(",").into());
        }

        args.push(job.target.host.clone().into());
        Some(args)
    }

    async fn run_scan(&self, job: &Job) -> Outcome {
        let Some(args) = self.build_args(job) else {
            return Outcome::Failure("scan flags failed to tokenize".into());
        };
        debug!("{} argv: {:?}", job.target.host, args);

        let mut command = Command::new(&self.scanner);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => return Outcome::Failure(format!("failed to launch scanner: {e}")),
        };

        match time::timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) if status.success() => Outcome::Success,
            Ok(Ok(status)) => match status.code() {
                Some(code) => Outcome::Failure(format!("scanner exited with code {code}")),
                None => Outcome::Failure("scanner terminated by signal".into()),
            },
            Ok(Err(e)) => Outcome::Failure(format!("failed to reap scanner: {e}")),
            Err(_) => {
                if let Err(e) = child.kill().await {
                    warn!("could not kill timed-out scanner for {}: {e}", job.target.host);
                }
                Outcome::Timeout
            }
        }
    }
}

#[async_trait]
impl JobRunner for NmapRunner {
    async fn run_job(&self, job: &Job) -> Outcome {
        if job.target.ports.is_empty() {
            info!("scanning {}", job.target.host);
        } else {
            info!(
                "scanning {} on ports {}",
                job.target.host,
                job.target.ports.join(",")
            );
        }
        self.run_scan(job).await
    }
}
