use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "fanmap")]
#[command(version)]
#[command(about = "Fans nmap out over many targets and folds the results into one report.")]
pub struct CommandLine {
    /// Newline-delimited targets file, host or host:port per line
    #[arg(short = 'l', long = "list", value_name = "FILE")]
    pub list: Option<PathBuf>,

    /// Single target, host or host:port
    #[arg(short = 't', long = "target", value_name = "TARGET")]
    pub target: Option<String>,

    /// Number of concurrent scan workers
    #[arg(short = 'c', long = "threads", default_value_t = 5, value_name = "N")]
    pub threads: usize,

    /// Per-scan timeout in minutes
    #[arg(short = 'T', long = "timeout", default_value_t = 10, value_name = "MINUTES")]
    pub timeout: u64,

    /// Custom nmap flags, quoted as one string
    #[arg(short = 'n', long = "nmap-flags", value_name = "FLAGS")]
    pub nmap_flags: Option<String>,

    /// Fast profile: sweep the most common ports
    #[arg(long = "fast")]
    pub fast: bool,

    /// Deep profile: full service and vulnerability enumeration
    #[arg(long = "deep")]
    pub deep: bool,

    /// Merged report path; an .html extension makes HTML the primary output
    #[arg(
        short = 'o',
        long = "output",
        default_value = "results.xml",
        value_name = "PATH"
    )]
    pub output: PathBuf,

    /// Scanner binary to invoke, bare name or path
    #[arg(long = "nmap-path", default_value = "nmap", value_name = "PATH")]
    pub nmap_path: PathBuf,

    /// Remove the merged XML once the HTML report is rendered
    #[arg(long = "discard-xml")]
    pub discard_xml: bool,

    /// Only warnings, errors and the final summary
    #[arg(short = 's', long = "silent")]
    pub silent: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
