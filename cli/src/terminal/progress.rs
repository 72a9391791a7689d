//! Scan progress bar, plus the writer that keeps log lines above it.

use std::io;
use std::sync::OnceLock;

use indicatif::{ProgressBar, ProgressStyle};

static BAR: OnceLock<ProgressBar> = OnceLock::new();

/// Starts the per-job progress bar. Call once, before the pool spins up;
/// silent runs simply never call it.
pub fn start(total_jobs: u64) {
    let bar = ProgressBar::new(total_jobs);
    let style = ProgressStyle::with_template("{bar:32.green/white} {pos}/{len} scans {msg}")
        .unwrap()
        .progress_chars("■■·");
    bar.set_style(style);
    let _ = BAR.set(bar);
}

/// Advances the bar after one job finished, whatever its outcome.
pub fn job_done(host: &str) {
    if let Some(bar) = BAR.get() {
        bar.inc(1);
        bar.set_message(host.to_string());
    }
}

pub fn finish() {
    if let Some(bar) = BAR.get() {
        bar.finish_and_clear();
    }
}

/// Log writer that prints above the bar while it is drawing and falls
/// back to stdout otherwise.
pub struct LogWriter;

impl io::Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match BAR.get() {
            Some(bar) if !bar.is_finished() => {
                let msg = String::from_utf8_lossy(buf);
                bar.println(msg.trim_end());
                Ok(buf.len())
            }
            _ => io::stdout().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match BAR.get() {
            Some(bar) if !bar.is_finished() => Ok(()),
            _ => io::stdout().flush(),
        }
    }
}
