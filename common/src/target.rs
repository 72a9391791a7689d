//! # Target Resolution
//!
//! Turns raw input lines into a deduplicated set of scan targets.
//!
//! Accepted line shapes:
//! * A bare host (`10.0.0.5`, `example.com`, `2001:db8::1`).
//! * A `host:port` pair (`10.0.0.5:443`, `[::1]:8080`).
//! * Blank lines, which are skipped.
//!
//! No address syntax validation happens here. Unrecognized tokens pass
//! through untouched and the scanner fails them one by one later.

use std::collections::{HashMap, HashSet};

/// A single host to scan, with the ports requested for it.
///
/// An empty port list means "let the scanner pick its default ports".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    /// Requested ports in first-appearance order, no repeats.
    pub ports: Vec<String>,
}

/// Deduplicated collection of targets, hosts kept in insertion order.
///
/// Each host appears at most once; feeding the same `host:port` line twice
/// changes nothing. A bare host line registers the host with an empty port
/// set, which later port-bearing lines for that host fill in.
#[derive(Debug, Default)]
pub struct TargetSet {
    order: Vec<String>,
    ports: HashMap<String, PortSet>,
}

/// Port list with set semantics: `order` is what callers see, `seen`
/// guards against duplicates without rescanning the list.
#[derive(Debug, Default)]
struct PortSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl PortSet {
    fn insert(&mut self, port: String) {
        if self.seen.insert(port.clone()) {
            self.order.push(port);
        }
    }
}

impl TargetSet {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn entry(&mut self, host: &str) -> &mut PortSet {
        if !self.ports.contains_key(host) {
            self.order.push(host.to_string());
        }
        self.ports.entry(host.to_string()).or_default()
    }

    fn add_host(&mut self, host: &str) {
        self.entry(host);
    }

    fn add_port(&mut self, host: &str, port: &str) {
        self.entry(host).insert(port.to_string());
    }

    /// Hands the targets out in host insertion order.
    pub fn into_targets(self) -> Vec<Target> {
        let TargetSet { order, mut ports } = self;
        order
            .into_iter()
            .map(|host| {
                let set = ports.remove(&host).unwrap_or_default();
                Target {
                    host,
                    ports: set.order,
                }
            })
            .collect()
    }
}

/// Builds the deduplicated target set from raw input lines.
pub fn resolve<I, S>(lines: I) -> TargetSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = TargetSet::default();

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }

        match split_host_port(line) {
            Some((host, port)) if !port.is_empty() => set.add_port(host, port),
            Some((host, _)) => set.add_host(host),
            None => set.add_host(line),
        }
    }

    set
}

/// Splits `host:port` along the scanner's own address syntax: exactly one
/// colon separates host and port, `[v6]:port` carries the address in
/// brackets, and anything else (bare IPv6 included) is a plain host.
fn split_host_port(line: &str) -> Option<(&str, &str)> {
    if let Some(rest) = line.strip_prefix('[') {
        let (host, tail) = rest.split_once(']')?;
        let port = tail.strip_prefix(':')?;
        return Some((host, port));
    }

    let (host, port) = line.rsplit_once(':')?;
    if host.contains(':') {
        // the colons belong to a bare IPv6 address
        return None;
    }
    Some((host, port))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
