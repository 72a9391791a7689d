//! Scan intensity profiles and their argument templates.

const DEEP_ARGS: &str =
    "-sS -sV -sC --script vulners --reason --version-all -T4 -Pn -n --host-timeout 5m";
const FAST_ARGS: &str = "-sS -sV -T4 --top-ports 1000 -n -Pn --open --host-timeout 5m";
const DEFAULT_ARGS: &str = "-sV -sS -T3 -Pn -n --host-timeout 5m";

/// The argument template applied to every scan invocation of a run.
///
/// Resolved once per run, never per job. Precedence when several are
/// requested at once: deep beats fast, both beat custom user flags, and a
/// run with nothing selected falls back to the balanced default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanProfile {
    /// Aggressive service and vulnerability enumeration.
    Deep,
    /// Quick sweep over the most common ports.
    Fast,
    /// Verbatim user-supplied scanner flags.
    Custom(String),
    /// Balanced service detection used when nothing else was requested.
    Default,
}

impl ScanProfile {
    /// Applies the fixed precedence to the raw flag selection.
    pub fn from_flags(deep: bool, fast: bool, custom: Option<String>) -> Self {
        if deep {
            ScanProfile::Deep
        } else if fast {
            ScanProfile::Fast
        } else if let Some(flags) = custom.filter(|f| !f.trim().is_empty()) {
            ScanProfile::Custom(flags)
        } else {
            ScanProfile::Default
        }
    }

    /// The template tokenized into argv form.
    ///
    /// `None` only happens for custom flag strings that fail shell-style
    /// tokenization (an unclosed quote, say). The builtin templates always
    /// tokenize.
    pub fn args(&self) -> Option<Vec<String>> {
        let template = match self {
            ScanProfile::Deep => DEEP_ARGS,
            ScanProfile::Fast => FAST_ARGS,
            ScanProfile::Custom(flags) => flags.as_str(),
            ScanProfile::Default => DEFAULT_ARGS,
        };
        shlex::split(template)
    }

    /// SYN scans want raw sockets. Without root the scanner degrades on
    /// its own, so this only ever drives a warning.
    pub fn wants_privilege(&self) -> bool {
        matches!(self, ScanProfile::Deep | ScanProfile::Fast)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScanProfile::Deep => "deep",
            ScanProfile::Fast => "fast",
            ScanProfile::Custom(_) => "custom",
            ScanProfile::Default => "default",
        }
    }
}
