//! Gathers raw target lines from the run's input surfaces.

use std::fs::File;
use std::io::{BufRead, BufReader, IsTerminal};
use std::path::Path;

use tracing::{debug, error};

use crate::commands::CommandLine;

/// Collects lines in fixed priority order: list file, literal target,
/// then piped standard input. Normalization and dedup happen later, in
/// the resolver.
///
/// An unreadable list file costs an error log, not the run; the other
/// surfaces may still carry targets.
pub fn gather(args: &CommandLine) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(list) = &args.list {
        match read_lines(list) {
            Ok(mut from_file) => {
                debug!("{} lines from {}", from_file.len(), list.display());
                lines.append(&mut from_file);
            }
            Err(e) => error!("could not read target list {}: {e}", list.display()),
        }
    }

    if let Some(target) = &args.target {
        lines.push(target.clone());
    }

    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        for line in stdin.lock().lines().map_while(Result::ok) {
            lines.push(line);
        }
    }

    lines
}

fn read_lines(path: &Path) -> std::io::Result<Vec<String>> {
    let file = File::open(path)?;
    BufReader::new(file).lines().collect()
}
