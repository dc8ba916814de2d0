//! Build the diagram and write the artifact

use anyhow::{Context, Result};
use dietflow_core::pipeline;

use super::{Overrides, load_config};

/// Run the pipeline end to end
pub fn run(config_path: Option<&str>, overrides: Overrides) -> Result<()> {
    let config = load_config(config_path, overrides)?;
    tracing::info!("Project: {}", config.project.name);

    let input = config.input();
    let output = pipeline::run(&input)
        .with_context(|| format!("Failed to build flow graph from {}", input.path))?;

    let destination = config.output_path();
    let written = dietflow_render::export(
        &output.graph,
        &config.project.diagram,
        config.project.output.format,
        &destination,
    )
    .with_context(|| format!("Failed to export diagram to {}", destination.display()))?;

    tracing::info!(
        "✓ {} of {} records charted",
        output.report.retained,
        output.report.rows_read
    );
    tracing::info!("✓ Sankey diagram written to {}", written.display());
    Ok(())
}
