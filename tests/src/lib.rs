//! End-to-end tests for the scan engine, driven with a stub scanner
//! binary instead of a real nmap install.

#[cfg(all(test, unix))]
mod orchestration;
#[cfg(all(test, unix))]
mod util;
