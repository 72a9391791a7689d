//! Engine crate: dependency preflight, the scan worker pool, the scanner
//! invocation builder and the result aggregator.

pub mod deps;
pub mod merge;
pub mod nmap;
pub mod runner;
