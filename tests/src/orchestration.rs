use std::path::PathBuf;
use std::time::Duration;

use fanmap_common::config::RunConfig;
use fanmap_common::profile::ScanProfile;
use fanmap_common::target::{self, Target};
use fanmap_core::merge;
use fanmap_core::runner::{self, Job, JobRunner, NmapRunner, Outcome};

use crate::util;

fn config(scanner: PathBuf, output: PathBuf) -> RunConfig {
    RunConfig {
        workers: 4,
        job_timeout: Duration::from_secs(1),
        profile: ScanProfile::Default,
        scanner,
        output,
        discard_xml: false,
    }
}

#[tokio::test]
async fn full_run_merges_every_partial() {
    let dir = tempfile::tempdir().expect("tempdir");
    let scanner = util::install_fake_scanner(dir.path());
    let output = dir.path().join("report.xml");

    let set = target::resolve(["10.0.0.1:80", "10.0.0.2", "10.0.0.3:22", "10.0.0.3:443"]);
    let cfg = config(scanner, output.clone());

    let report = runner::execute(&cfg, set.into_targets(), None)
        .await
        .expect("run failed");

    assert_eq!(report.tally.succeeded, 3, "one job per unique host");
    assert_eq!(report.tally.total(), 3);

    let merged = report.merged.expect("run produced no merged document");
    assert_eq!(merged.hosts.len(), 3);
    assert_eq!(merged.runstats.hosts.up, 3);
    assert_eq!(merged.runstats.hosts.total, 3);
    assert!(
        (merged.runstats.finished.elapsed - 1.5).abs() < 1e-9,
        "elapsed must be the sum over partials, got {}",
        merged.runstats.finished.elapsed
    );

    let addrs: Vec<_> = merged
        .hosts
        .iter()
        .filter_map(|h| h.primary_address())
        .collect();
    assert_eq!(
        addrs,
        vec!["10.0.0.1", "10.0.0.2", "10.0.0.3"],
        "merged host order must follow target order"
    );

    let reread = merge::load_document(&output).expect("merged file must parse back");
    assert_eq!(reread.hosts.len(), 3);

    let raw = std::fs::read_to_string(&output).unwrap();
    assert!(raw.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(raw.contains("nmap.xsl"), "stylesheet reference missing");
}

#[tokio::test]
async fn deadline_kills_the_slow_scan_and_spares_the_rest() {
    let dir = tempfile::tempdir().expect("tempdir");
    let scanner = util::install_fake_scanner(dir.path());
    let output = dir.path().join("report.xml");

    let set = target::resolve(["10.1.0.1", "slow.example", "10.1.0.2"]);
    let cfg = config(scanner, output.clone());

    let report = runner::execute(&cfg, set.into_targets(), None)
        .await
        .expect("run failed");

    assert_eq!(report.tally.timed_out, 1, "the slow scan must hit the deadline");
    assert_eq!(report.tally.succeeded, 2);

    let merged = report.merged.expect("sibling results must still merge");
    let addrs: Vec<_> = merged
        .hosts
        .iter()
        .filter_map(|h| h.primary_address())
        .collect();
    assert_eq!(addrs, vec!["10.1.0.1", "10.1.0.2"]);
    assert!(output.exists());
}

#[tokio::test]
async fn run_with_no_partials_skips_the_merge() {
    let dir = tempfile::tempdir().expect("tempdir");
    let scanner = util::install_fake_scanner(dir.path());
    let output = dir.path().join("report.xml");

    let set = target::resolve(["broken.example"]);
    let cfg = config(scanner, output.clone());

    let report = runner::execute(&cfg, set.into_targets(), None)
        .await
        .expect("engine must survive a run where every job fails");

    assert_eq!(report.tally.failed, 1);
    assert!(report.merged.is_none());
    assert!(!output.exists(), "no output file for an empty run");
}

#[tokio::test]
async fn corrupt_partial_is_left_out_of_the_merge() {
    let dir = tempfile::tempdir().expect("tempdir");
    let scanner = util::install_fake_scanner(dir.path());
    let output = dir.path().join("report.xml");

    let set = target::resolve(["10.4.0.1", "garbled.example", "10.4.0.2"]);
    let cfg = config(scanner, output);

    let report = runner::execute(&cfg, set.into_targets(), None)
        .await
        .expect("run failed");

    // the scanner exited zero, so the job itself counts as a success
    assert_eq!(report.tally.succeeded, 3);

    let merged = report.merged.expect("valid partials must still merge");
    assert_eq!(merged.hosts.len(), 2);
    assert_eq!(merged.runstats.hosts.total, 2);
    assert!(
        (merged.runstats.finished.elapsed - 1.0).abs() < 1e-9,
        "the garbled document must not contribute to the totals"
    );

    let addrs: Vec<_> = merged
        .hosts
        .iter()
        .filter_map(|h| h.primary_address())
        .collect();
    assert_eq!(addrs, vec!["10.4.0.1", "10.4.0.2"]);
}

#[tokio::test]
async fn unlaunchable_scanner_is_a_job_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let runner = NmapRunner::new(
        PathBuf::from("/nonexistent/fanmap-missing"),
        ScanProfile::Default,
        Duration::from_secs(5),
    );
    let job = Job {
        target: Target {
            host: "10.2.0.1".into(),
            ports: Vec::new(),
        },
        output_path: dir.path().join("out.xml"),
    };

    match runner.run_job(&job).await {
        Outcome::Failure(cause) => {
            assert!(cause.contains("launch"), "unexpected cause: {cause}")
        }
        other => panic!("expected a failure, got {other:?}"),
    }
}

#[tokio::test]
async fn observer_fires_once_per_job() {
    use std::sync::{Arc, Mutex};

    let dir = tempfile::tempdir().expect("tempdir");
    let scanner = util::install_fake_scanner(dir.path());
    let output = dir.path().join("report.xml");

    let set = target::resolve(["10.3.0.1", "10.3.0.2", "broken.example"]);
    let cfg = config(scanner, output);

    let finished: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&finished);
    let observer: runner::JobObserver = Box::new(move |job, _| {
        sink.lock().unwrap().push(job.target.host.clone());
    });

    let report = runner::execute(&cfg, set.into_targets(), Some(observer))
        .await
        .expect("run failed");

    assert_eq!(report.tally.total(), 3);
    let mut seen = finished.lock().unwrap().clone();
    seen.sort();
    assert_eq!(seen, vec!["10.3.0.1", "10.3.0.2", "broken.example"]);
}
