//! External layout engine invocation.
//!
//! The layout and rasterization of graph descriptions is delegated to an
//! external engine behind [`LayoutEngine`]. The default implementation
//! pipes DOT text into the graphviz `dot` executable; the layout
//! algorithm itself (`sfdp`, `dot`, ...) is picked by the graph's own
//! `layout` attribute. Calls block the pipeline; there are no timeouts or
//! retries.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::dot::DotGraph;
use crate::error::{GrapherError, Result};

pub trait LayoutEngine {
    /// Lay out and rasterize a graph description into `output` with the
    /// given format ("svg", "png", "pdf", ...).
    fn render(&self, graph: &DotGraph, format: &str, output: &Path) -> Result<()>;
}

/// Graphviz subprocess engine.
pub struct GraphvizEngine {
    command: String,
}

impl GraphvizEngine {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl LayoutEngine for GraphvizEngine {
    fn render(&self, graph: &DotGraph, format: &str, output: &Path) -> Result<()> {
        debug!(format, output = %output.display(), "invoking layout engine");
        let mut child = Command::new(&self.command)
            // The cairo renderer handles embedded SVG images.
            .arg(format!("-T{format}:cairo"))
            .arg("-o")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| GrapherError::Layout(format!("cannot start {:?}: {e}", self.command)))?;

        child
            .stdin
            .take()
            .expect("stdin was piped")
            .write_all(graph.to_dot().as_bytes())?;

        let result = child
            .wait_with_output()
            .map_err(|e| GrapherError::Layout(format!("{:?} did not run: {e}", self.command)))?;
        if !result.status.success() {
            return Err(GrapherError::Layout(format!(
                "{:?} exited with {}: {}",
                self.command,
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }
        Ok(())
    }
}
