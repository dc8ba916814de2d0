//! Validate configuration and dataset without writing an artifact

use anyhow::{Context, Result};
use dietflow_core::loader::PARTICIPANTS_COLUMN;
use dietflow_core::normalize::DEGENERATE_VALUE;
use dietflow_core::{Indicator, pipeline};

use super::{Overrides, load_config};

/// Run the validate command
pub fn run(config_path: Option<&str>, overrides: Overrides, json: bool) -> Result<()> {
    let config = load_config(config_path, overrides)?;
    let input = config.input();
    tracing::info!("Validating dataset: {}", input.path);

    let output = pipeline::run(&input)
        .with_context(|| format!("Failed to build flow graph from {}", input.path))?;
    let report = &output.report;

    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("✓ Project: {}", config.project.name);
    println!("✓ Rows read: {}", report.rows_read);
    println!("✓ Dropped (missing fields): {}", report.dropped_missing);
    println!("✓ Dropped (unclassified diet): {}", report.dropped_unclassified);
    println!("✓ Records retained: {}", report.retained);
    println!("✓ Nodes: {}", report.labels);
    println!("✓ Links: {}", report.links);
    let columns = std::iter::once((PARTICIPANTS_COLUMN, report.stats.participants)).chain(
        Indicator::ALL
            .iter()
            .map(|i| (i.column(), report.stats.indicators[i.index()])),
    );
    for (name, column) in columns {
        if column.is_degenerate() {
            println!(
                "! {}: single value {}, normalized to {}",
                name, column.min, DEGENERATE_VALUE
            );
        } else {
            println!("✓ {}: {} to {}", name, column.min, column.max);
        }
    }
    println!(
        "✓ Output would be written to {} ({})",
        config.output_path().display(),
        config.project.output.format
    );
    Ok(())
}
