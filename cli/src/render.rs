//! Output naming policy and HTML rendering through the external
//! stylesheet processor.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use fanmap_common::success;
use fanmap_core::deps;
use tokio::process::Command;
use tracing::warn;

const STYLESHEET: &str = include_str!("../assets/nmap.xsl");
const STYLESHEET_NAME: &str = "nmap.xsl";

/// Where the run's artifacts go, derived from the requested output path.
#[derive(Debug, PartialEq, Eq)]
pub struct OutputPlan {
    /// The merged XML document.
    pub xml: PathBuf,
    /// The rendered report, when the renderer can produce one.
    pub html: Option<PathBuf>,
}

/// Applies the output naming policy.
///
/// An `.html` output makes HTML the primary artifact and puts the merged
/// XML beside it with the extension swapped; anything else is an XML
/// output that gets a sidecar report whenever the renderer exists.
pub fn plan_outputs(output: &Path, renderer: bool) -> OutputPlan {
    let wants_html = output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"));

    if wants_html {
        let xml = output.with_extension("xml");
        if renderer {
            OutputPlan {
                xml,
                html: Some(output.to_path_buf()),
            }
        } else {
            warn!(
                "{} is not installed, falling back to XML output {}",
                deps::RENDERER_BIN,
                xml.display()
            );
            OutputPlan { xml, html: None }
        }
    } else if renderer {
        OutputPlan {
            xml: output.to_path_buf(),
            html: Some(output.with_extension("html")),
        }
    } else {
        OutputPlan {
            xml: output.to_path_buf(),
            html: None,
        }
    }
}

/// Renders `xml` into `html` with the embedded stylesheet.
///
/// The stylesheet is materialized next to the merged document for the
/// duration of the invocation, matching the stylesheet reference the
/// document itself carries, and removed afterwards.
pub async fn render_html(xml: &Path, html: &Path) -> anyhow::Result<()> {
    let sheet = match xml.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(STYLESHEET_NAME),
        _ => PathBuf::from(STYLESHEET_NAME),
    };
    std::fs::write(&sheet, STYLESHEET)
        .with_context(|| format!("write stylesheet {}", sheet.display()))?;

    let status = Command::new(deps::RENDERER_BIN)
        .arg("-o")
        .arg(html)
        .arg(&sheet)
        .arg(xml)
        .status()
        .await;

    if let Err(e) = std::fs::remove_file(&sheet) {
        warn!("could not remove {}: {e}", sheet.display());
    }

    let status = status.with_context(|| format!("launch {}", deps::RENDERER_BIN))?;
    if !status.success() {
        bail!("{} exited with {status}", deps::RENDERER_BIN);
    }

    success!("HTML report written to {}", html.display());
    Ok(())
}
