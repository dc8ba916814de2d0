//! Pipeline orchestration
//!
//! Runs load → classify → normalize → build once, front to back. Every stage
//! fails fast; nothing is retried.

use serde::Serialize;

use crate::config::InputConfig;
use crate::diet::classify_records;
use crate::error::Result;
use crate::graph::FlowGraph;
use crate::loader::load_records;
use crate::normalize::{NormalizationStats, Record, normalize_records};

/// Counters describing one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PipelineReport {
    /// Data rows read from the dataset
    pub rows_read: usize,
    /// Rows dropped for a missing sex, age group or diet code
    pub dropped_missing: usize,
    /// Rows dropped for an unclassifiable diet code
    pub dropped_unclassified: usize,
    /// Records that made it into the graph
    pub retained: usize,
    /// Node count
    pub labels: usize,
    /// Link count
    pub links: usize,
    /// Observed ranges of the normalized columns
    pub stats: NormalizationStats,
}

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Prepared records
    pub records: Vec<Record>,
    /// The flow graph
    pub graph: FlowGraph,
    /// Run counters
    pub report: PipelineReport,
}

/// Run every stage up to graph construction
pub fn run(input: &InputConfig) -> Result<PipelineOutput> {
    let (raw, load_report) = load_records(input)?;
    let (classified, dropped_unclassified) = classify_records(raw)?;
    let (records, stats) = normalize_records(classified)?;
    let graph = FlowGraph::build(&records)?;

    let report = PipelineReport {
        rows_read: load_report.rows_read,
        dropped_missing: load_report.dropped_missing,
        dropped_unclassified,
        retained: records.len(),
        labels: graph.labels().len(),
        links: graph.edge_count(),
        stats,
    };
    tracing::debug!(?report, "pipeline finished");

    Ok(PipelineOutput {
        records,
        graph,
        report,
    })
}
