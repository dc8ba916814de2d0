//! Dietflow Rendering
//!
//! This crate turns a [`FlowGraph`](dietflow_core::FlowGraph) into a shareable
//! Sankey diagram artifact.
//!
//! # Pipeline Overview
//!
//! ```text
//! ┌───────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐
//! │ FlowGraph │────▶│  Figure  │────▶│ Renderer │────▶│ Artifact │
//! │  (core)   │     │ (Plotly) │     │html/json │     │ (atomic) │
//! └───────────┘     └──────────┘     └──────────┘     └──────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use dietflow_render::export;
//!
//! let output = dietflow_core::pipeline::run(&config.input())?;
//! let path = export(&output.graph, &config.project.diagram, config.project.output.format, &config.output_path())?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod export;
pub mod figure;
pub mod html;

pub use error::{Error, Result};
pub use export::{JsonRenderer, Renderer, export, renderer_for, write_atomic};
pub use figure::SankeyFigure;
pub use html::HtmlRenderer;
