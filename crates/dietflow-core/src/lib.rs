//! Dietflow Core Library
//!
//! This crate provides the data side of dietflow:
//! - Configuration parsing and validation
//! - Dataset loading and record cleaning
//! - Diet classification against a fixed taxonomy
//! - Min-max normalization of environmental indicators
//! - Flow graph construction (sex → age group → diet → indicator)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐    ┌────────────┐    ┌────────────┐    ┌──────────┐
//! │  Loader  │───▶│ Classifier │───▶│ Normalizer │───▶│  Graph   │
//! │  (CSV)   │    │   (diet)   │    │ (min-max)  │    │ Builder  │
//! └──────────┘    └────────────┘    └────────────┘    └──────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use dietflow_core::{Config, pipeline};
//!
//! let config = Config::load("./dietflow.yaml")?;
//! let output = pipeline::run(&config.input())?;
//! println!("{} labels, {} links", output.graph.labels().len(), output.graph.edge_count());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod diet;
pub mod error;
pub mod graph;
pub mod indicator;
pub mod loader;
pub mod normalize;
pub mod pipeline;

pub use config::{Config, DiagramConfig, InputConfig, OutputConfig, OutputFormat, ProjectConfig};
pub use diet::DietCategory;
pub use error::{Error, Result};
pub use graph::{EdgeFamily, FlowEdge, FlowGraph, LabelSpace, Tier};
pub use indicator::Indicator;
pub use pipeline::{PipelineOutput, PipelineReport};
