//! Plotly Sankey figure model
//!
//! The structs here serialize to the figure JSON Plotly's `newPlot` accepts:
//! one `sankey` trace plus a layout.

use serde::Serialize;

use dietflow_core::config::{DiagramConfig, Margin};
use dietflow_core::graph::{FlowGraph, LinkColumns};

use crate::error::{Error, Result};

/// Complete figure: one Sankey trace and its layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyFigure {
    /// Traces (always exactly one)
    pub data: [SankeyTrace; 1],
    /// Page layout
    pub layout: Layout,
}

/// The Sankey trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyTrace {
    /// Plotly trace type
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Node settings and labels
    pub node: Nodes,
    /// Parallel link columns
    pub link: LinkColumns,
}

/// Node settings and per-node attributes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Nodes {
    /// Vertical gap between nodes
    pub pad: u32,
    /// Node bar thickness
    pub thickness: u32,
    /// Node border
    pub line: Line,
    /// Labels in index order
    pub label: Vec<String>,
    /// Fill colors in index order
    pub color: Vec<&'static str>,
}

/// Border style
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    /// Border color
    pub color: String,
    /// Border width
    pub width: f64,
}

/// Figure layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// Title block
    pub title: Title,
    /// Global font
    pub font: Font,
    /// Canvas width
    pub width: u32,
    /// Canvas height
    pub height: u32,
    /// Canvas margins
    pub margin: Margin,
}

/// Title block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    /// Title text
    pub text: String,
}

/// Font settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    /// Font size
    pub size: u32,
}

impl SankeyFigure {
    /// Build the figure for `graph` styled by `diagram`.
    ///
    /// Fails with [`Error::InconsistentGraph`] if the link columns differ in
    /// length or reference a node that does not exist.
    pub fn new(graph: &FlowGraph, diagram: &DiagramConfig) -> Result<Self> {
        let labels = graph.labels();
        let link = graph.links();
        check_links(&link, labels.len())?;

        let node = Nodes {
            pad: diagram.node.pad,
            thickness: diagram.node.thickness,
            line: Line {
                color: diagram.node.line_color.clone(),
                width: diagram.node.line_width,
            },
            label: labels.labels().to_vec(),
            color: labels.node_colors(),
        };

        Ok(Self {
            data: [SankeyTrace {
                kind: "sankey",
                node,
                link,
            }],
            layout: Layout {
                title: Title {
                    text: diagram.title.clone(),
                },
                font: Font {
                    size: diagram.font_size,
                },
                width: diagram.width,
                height: diagram.height,
                margin: diagram.margin,
            },
        })
    }

    /// The Sankey trace
    pub fn trace(&self) -> &SankeyTrace {
        &self.data[0]
    }
}

fn check_links(link: &LinkColumns, nodes: usize) -> Result<()> {
    let len = link.source.len();
    if link.target.len() != len || link.value.len() != len || link.color.len() != len {
        return Err(Error::InconsistentGraph {
            message: format!(
                "link columns differ in length (source {}, target {}, value {}, color {})",
                len,
                link.target.len(),
                link.value.len(),
                link.color.len()
            ),
        });
    }
    if let Some(&index) = link
        .source
        .iter()
        .chain(&link.target)
        .find(|&&index| index >= nodes)
    {
        return Err(Error::InconsistentGraph {
            message: format!("link references node {} but only {} nodes exist", index, nodes),
        });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use dietflow_core::diet::DietCategory;
    use dietflow_core::normalize::{Measures, NormalizedMeasures, Record};

    pub(crate) fn sample_graph() -> FlowGraph {
        let record = |sex: &str, age: &str, diet: DietCategory, value: f64| Record {
            line: 2,
            sex: sex.to_string(),
            age_group: age.to_string(),
            diet_group: diet.code().to_string(),
            diet_level: diet,
            raw: Measures {
                n_participants: 1,
                indicators: [value; 4],
            },
            normalized: NormalizedMeasures {
                participants: value,
                indicators: [value; 4],
            },
        };
        FlowGraph::build(&[
            record("female", "20-29", DietCategory::Vegan, 0.0),
            record("male", "30-39", DietCategory::HighMeat, 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_figure_json_shape() {
        let figure = SankeyFigure::new(&sample_graph(), &DiagramConfig::default()).unwrap();
        let json = serde_json::to_value(&figure).unwrap();

        let trace = &json["data"][0];
        assert_eq!(trace["type"], "sankey");
        assert_eq!(trace["node"]["pad"], 20);
        assert_eq!(trace["node"]["thickness"], 22);
        assert_eq!(trace["node"]["line"]["color"], "black");
        assert_eq!(trace["node"]["line"]["width"], 0.5);
        assert_eq!(trace["node"]["label"].as_array().unwrap().len(), 14);
        assert_eq!(trace["node"]["label"][0], "female");
        assert_eq!(trace["node"]["color"][0], "#aec6cf");
        assert_eq!(trace["link"]["source"].as_array().unwrap().len(), 12);
        assert_eq!(trace["link"]["color"][11], "rgba(200, 50, 50, 0.5)");

        let layout = &json["layout"];
        assert_eq!(layout["font"]["size"], 13);
        assert_eq!(layout["width"], 1300);
        assert_eq!(layout["height"], 700);
        assert_eq!(
            layout["margin"],
            serde_json::json!({"l": 10, "r": 10, "t": 50, "b": 10})
        );
        assert!(
            layout["title"]["text"]
                .as_str()
                .unwrap()
                .contains("Sex → Age → Diet")
        );
    }

    #[test]
    fn test_figure_uses_diagram_settings() {
        let mut diagram = DiagramConfig::default();
        diagram.title = "Custom".to_string();
        diagram.width = 640;
        diagram.node.pad = 4;

        let figure = SankeyFigure::new(&sample_graph(), &diagram).unwrap();
        assert_eq!(figure.layout.title.text, "Custom");
        assert_eq!(figure.layout.width, 640);
        assert_eq!(figure.trace().node.pad, 4);
    }

    #[test]
    fn test_check_links_rejects_mismatched_lengths() {
        let link = LinkColumns {
            source: vec![0, 1],
            target: vec![2],
            value: vec![1.0, 1.0],
            color: vec!["a", "b"],
        };
        assert!(matches!(
            check_links(&link, 4),
            Err(Error::InconsistentGraph { .. })
        ));
    }

    #[test]
    fn test_check_links_rejects_out_of_bounds() {
        let link = LinkColumns {
            source: vec![0],
            target: vec![4],
            value: vec![1.0],
            color: vec!["a"],
        };
        assert!(matches!(
            check_links(&link, 4),
            Err(Error::InconsistentGraph { .. })
        ));
        assert!(check_links(&link, 5).is_ok());
    }
}
