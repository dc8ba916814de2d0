//! Artifact export
//!
//! The artifact is rendered completely in memory before anything touches the
//! destination, then written through a temporary file in the same directory
//! and renamed into place. A failed run never leaves a partial artifact.

use std::io::Write;
use std::path::{Path, PathBuf};

use dietflow_core::config::{DiagramConfig, OutputFormat};
use dietflow_core::graph::FlowGraph;

use crate::error::{Error, Result};
use crate::figure::SankeyFigure;
use crate::html::HtmlRenderer;

/// Turns a figure into artifact text
pub trait Renderer {
    /// Render the whole artifact
    fn render(&self, figure: &SankeyFigure) -> Result<String>;

    /// Conventional file extension
    fn extension(&self) -> &'static str;
}

/// Renders the pretty-printed Plotly figure JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, figure: &SankeyFigure) -> Result<String> {
        let mut json = serde_json::to_string_pretty(figure)?;
        json.push('\n');
        Ok(json)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

/// Renderer for a configured output format
pub fn renderer_for(format: OutputFormat) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Html => Box::new(HtmlRenderer::default()),
        OutputFormat::Json => Box::new(JsonRenderer),
    }
}

/// Render `graph` and write it to `path`.
///
/// Returns the path written.
pub fn export(
    graph: &FlowGraph,
    diagram: &DiagramConfig,
    format: OutputFormat,
    path: &Path,
) -> Result<PathBuf> {
    let figure = SankeyFigure::new(graph, diagram)?;
    let renderer = renderer_for(format);
    let contents = renderer.render(&figure)?;

    if path.extension().is_none_or(|ext| ext != renderer.extension()) {
        tracing::warn!(
            "Writing {} output to {} (expected a .{} extension)",
            format,
            path.display(),
            renderer.extension()
        );
    }

    write_atomic(path, contents.as_bytes())?;
    tracing::info!(
        "Wrote {} ({} bytes, {} nodes, {} links)",
        path.display(),
        contents.len(),
        graph.labels().len(),
        graph.edge_count()
    );
    Ok(path.to_path_buf())
}

/// Write `contents` to `path` via a temporary file and rename
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let write_err = |source: std::io::Error| Error::Write {
        path: path.display().to_string(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    file.write_all(contents).map_err(write_err)?;
    file.as_file().sync_all().map_err(write_err)?;
    file.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
