mod commands;
mod input;
mod render;
mod terminal;

use std::time::Duration;

use commands::CommandLine;
use fanmap_common::config::RunConfig;
use fanmap_common::profile::ScanProfile;
use fanmap_common::success;
use fanmap_common::target;
use fanmap_core::deps;
use fanmap_core::runner::{self, JobObserver};
use terminal::{logging, print, progress, summary};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CommandLine::parse_args();

    logging::init(args.silent);
    if !args.silent {
        print::banner();
    }

    let scanner = deps::check_scanner(&args.nmap_path)?;
    let renderer = deps::renderer_available();
    if !renderer {
        warn!(
            "{} is not installed, HTML reports are disabled",
            deps::RENDERER_BIN
        );
    }

    let lines = input::gather(&args);
    if lines.is_empty() {
        warn!("nothing to scan, pass --list, --target or pipe targets in");
        return Ok(());
    }

    let set = target::resolve(&lines);
    if set.is_empty() {
        warn!("no usable targets in {} input lines", lines.len());
        return Ok(());
    }
    info!(
        "resolved {} unique targets from {} input lines",
        set.len(),
        lines.len()
    );

    let plan = render::plan_outputs(&args.output, renderer);
    let profile = ScanProfile::from_flags(args.deep, args.fast, args.nmap_flags.clone());
    info!("using the {} scan profile", profile.label());

    let cfg = RunConfig {
        workers: args.threads,
        job_timeout: Duration::from_secs(args.timeout * 60),
        profile,
        scanner,
        output: plan.xml.clone(),
        discard_xml: args.discard_xml,
    };

    let targets = set.into_targets();
    let observer: Option<JobObserver> = if args.silent {
        None
    } else {
        progress::start(targets.len() as u64);
        Some(Box::new(|job: &runner::Job, _: &runner::Outcome| {
            progress::job_done(&job.target.host)
        }))
    };

    let result = runner::execute(&cfg, targets, observer).await;
    progress::finish();
    let report = result?;

    let Some(merged) = report.merged else {
        return Ok(());
    };

    summary::scan_summary(&merged);

    if let Some(html) = &plan.html {
        match render::render_html(&cfg.output, html).await {
            Ok(()) => {
                if cfg.discard_xml {
                    match std::fs::remove_file(&cfg.output) {
                        Ok(()) => info!("discarded the raw XML at {}", cfg.output.display()),
                        Err(e) => warn!("could not remove {}: {e}", cfg.output.display()),
                    }
                } else {
                    info!(
                        "keeping the raw XML at {} for other tooling",
                        cfg.output.display()
                    );
                }
            }
            Err(e) => error!("HTML report failed: {e:#}"),
        }
    }

    success!(
        "run complete: {} succeeded, {} timed out, {} failed",
        report.tally.succeeded,
        report.tally.timed_out,
        report.tally.failed
    );

    Ok(())
}
