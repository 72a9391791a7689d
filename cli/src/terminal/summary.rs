//! The findings readout printed after aggregation.

use colored::*;
use fanmap_core::nmap::{NmapRun, Port};

use crate::terminal::print;

/// Prints one line per open service across the merged document.
pub fn scan_summary(run: &NmapRun) {
    print::header("scan summary");

    let mut findings = 0usize;
    for host in &run.hosts {
        let Some(addr) = host.primary_address() else {
            continue;
        };
        let Some(ports) = &host.ports else {
            continue;
        };
        for port in &ports.ports {
            if !port.is_open() {
                continue;
            }
            print::print(&format_finding(addr, port));
            findings += 1;
        }
    }

    if findings == 0 {
        print::print(&format!("{}", "no open services found".dimmed()));
    }
    print::fat_separator();
}

/// `<host> <port>/<protocol> -> <service> (<product> <version>)`
fn format_finding(addr: &str, port: &Port) -> String {
    let service = port.service.as_ref();
    let name = service
        .map(|s| s.name.as_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("unknown");

    let mut line = format!(
        "{} {} -> {}",
        addr.green(),
        format!("{}/{}", port.portid, port.protocol).yellow(),
        name
    );

    if let Some(s) = service {
        if !s.product.is_empty() {
            let mut product = s.product.clone();
            if !s.version.is_empty() {
                product.push(' ');
                product.push_str(&s.version);
            }
            line.push_str(&format!(" ({product})"));
        }
    }
    line
}
