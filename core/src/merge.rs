//! Merges the per-host partial documents into one report.
//!
//! The first document that parses seeds the accumulator; every later one
//! contributes its host sub-trees and its statistics. A document that does
//! not parse costs a warning and nothing else.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use fanmap_common::error::RunError;
use serde::Serialize;
use tracing::{debug, warn};

use crate::nmap::NmapRun;

/// Matches the stylesheet reference the HTML renderer works with.
const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<?xml-stylesheet href=\"nmap.xsl\" type=\"text/xsl\"?>\n";

/// Lists the partial documents under `dir` in stable lexicographic order.
///
/// Job output naming makes that order the target order, independent of
/// which scans finished first.
pub fn collect_partials(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "xml"))
        .collect();
    paths.sort();
    Ok(paths)
}

/// Reads and parses one scan document.
pub fn load_document(path: &Path) -> anyhow::Result<NmapRun> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    let run = quick_xml::de::from_str(&text)
        .with_context(|| format!("parse {}", path.display()))?;
    Ok(run)
}

/// Folds the partial documents at `paths` into one merged document.
///
/// Host sub-trees are concatenated in path order; the three host counters
/// and the elapsed duration are summed. The merged elapsed figure is the
/// total across all documents, not the last one's. Unreadable or corrupt
/// documents are skipped with a warning; only a complete washout is an
/// error.
pub fn merge(paths: &[PathBuf]) -> Result<NmapRun, RunError> {
    let mut merged: Option<NmapRun> = None;
    let mut total_elapsed = 0.0_f64;

    for path in paths {
        let doc = match load_document(path) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("skipping partial result: {e:#}");
                continue;
            }
        };

        total_elapsed += doc.runstats.finished.elapsed;
        match merged.as_mut() {
            None => merged = Some(doc),
            Some(acc) => {
                acc.hosts.extend(doc.hosts);
                acc.runstats.hosts.up += doc.runstats.hosts.up;
                acc.runstats.hosts.down += doc.runstats.hosts.down;
                acc.runstats.hosts.total += doc.runstats.hosts.total;
            }
        }
    }

    let mut merged = merged.ok_or(RunError::NoValidResults)?;
    merged.runstats.finished.elapsed = total_elapsed;
    debug!(
        "merged {} hosts, {:.2}s of scanning",
        merged.hosts.len(),
        total_elapsed
    );
    Ok(merged)
}

/// Serializes the merged document and writes it to `path`.
pub fn write_merged(run: &NmapRun, path: &Path) -> Result<(), RunError> {
    let mut body = String::new();
    let mut serializer = quick_xml::se::Serializer::with_root(&mut body, Some("nmaprun"))
        .map_err(|e| RunError::Serialize(e.to_string()))?;
    serializer.indent(' ', 2);
    run.serialize(serializer)
        .map_err(|e| RunError::Serialize(e.to_string()))?;

    fs::write(path, format!("{XML_HEADER}{body}\n")).map_err(|source| RunError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })
}
