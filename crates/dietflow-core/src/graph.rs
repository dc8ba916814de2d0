//! Flow graph construction
//!
//! Nodes are labels drawn from four tiers in fixed order: sexes, age groups,
//! diet categories, indicators. Links come in three families and are never
//! aggregated; every record contributes its own links, so parallel links
//! between the same pair of nodes are expected.
//!
//! ```text
//!  sex ──▶ age group ──▶ diet ──▶ indicator (×4)
//!   N links        N links      4N links
//! ```
//!
//! The renderer layers links by submission order, so [`FlowGraph::edges`]
//! always yields every sex→age link first, then age→diet, then
//! diet→indicator.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::diet::DietCategory;
use crate::error::{Error, Result};
use crate::indicator::Indicator;
use crate::normalize::Record;

/// Node tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tier {
    /// Participant sex
    Sex,
    /// Age bucket
    AgeGroup,
    /// Diet category
    Diet,
    /// Environmental indicator
    Indicator,
}

impl Tier {
    /// Fill color of nodes in this tier
    pub fn node_color(self) -> &'static str {
        match self {
            Self::Sex => "#aec6cf",
            Self::AgeGroup => "#b2d8b2",
            Self::Diet => "#ffb347",
            Self::Indicator => "#d3d3d3",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sex => "sex",
            Self::AgeGroup => "age group",
            Self::Diet => "diet",
            Self::Indicator => "indicator",
        };
        f.write_str(name)
    }
}

/// Ordered, duplicate-free label sequence with a label → index map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelSpace {
    labels: Vec<String>,
    tiers: Vec<Tier>,
    index: HashMap<String, usize>,
}

impl LabelSpace {
    /// Build the label space for a set of prepared records
    pub fn build(records: &[Record]) -> Result<Self> {
        let sexes: BTreeSet<&str> = records.iter().map(|r| r.sex.as_str()).collect();
        let ages: BTreeSet<&str> = records.iter().map(|r| r.age_group.as_str()).collect();

        let mut space = Self::default();
        for sex in sexes {
            space.push(sex, Tier::Sex)?;
        }
        for age in ages {
            space.push(age, Tier::AgeGroup)?;
        }
        for diet in DietCategory::ALL {
            space.push(diet.label(), Tier::Diet)?;
        }
        for indicator in Indicator::ALL {
            space.push(indicator.label(), Tier::Indicator)?;
        }
        Ok(space)
    }

    fn push(&mut self, label: &str, tier: Tier) -> Result<()> {
        if let Some(&existing) = self.index.get(label) {
            return Err(Error::graph(format!(
                "label '{}' appears in both the {} and {} tiers",
                label, self.tiers[existing], tier
            )));
        }
        self.index.insert(label.to_string(), self.labels.len());
        self.labels.push(label.to_string());
        self.tiers.push(tier);
        Ok(())
    }

    /// All labels in index order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether there are no labels
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Index of a label, in any tier
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Index of a label, only if it belongs to `tier`
    pub fn index_in(&self, tier: Tier, label: &str) -> Option<usize> {
        self.index_of(label).filter(|&i| self.tiers[i] == tier)
    }

    /// Label at an index
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Tier of the label at an index
    pub fn tier(&self, index: usize) -> Option<Tier> {
        self.tiers.get(index).copied()
    }

    /// Node fill colors in index order
    pub fn node_colors(&self) -> Vec<&'static str> {
        self.tiers.iter().map(|t| t.node_color()).collect()
    }
}

/// Link family; determines link color and submission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EdgeFamily {
    /// Sex → age group, weighted by participants
    SexToAge,
    /// Age group → diet, weighted by participants
    AgeToDiet,
    /// Diet → indicator, weighted by the indicator value
    DietToIndicator,
}

impl EdgeFamily {
    /// All families in submission order
    pub const ALL: [EdgeFamily; 3] = [
        EdgeFamily::SexToAge,
        EdgeFamily::AgeToDiet,
        EdgeFamily::DietToIndicator,
    ];

    /// Link color for this family
    pub fn color(self) -> &'static str {
        match self {
            Self::SexToAge => "rgba(100, 100, 255, 0.3)",
            Self::AgeToDiet => "rgba(255, 165, 0, 0.4)",
            Self::DietToIndicator => "rgba(200, 50, 50, 0.5)",
        }
    }

    fn tiers(self) -> (Tier, Tier) {
        match self {
            Self::SexToAge => (Tier::Sex, Tier::AgeGroup),
            Self::AgeToDiet => (Tier::AgeGroup, Tier::Diet),
            Self::DietToIndicator => (Tier::Diet, Tier::Indicator),
        }
    }
}

/// One weighted link
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlowEdge {
    /// Source label index
    pub source: usize,
    /// Target label index
    pub target: usize,
    /// Normalized weight
    pub value: f64,
    /// Family the link belongs to
    pub family: EdgeFamily,
}

/// Links flattened into the parallel columns a Sankey renderer consumes
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkColumns {
    /// Source indices
    pub source: Vec<usize>,
    /// Target indices
    pub target: Vec<usize>,
    /// Weights
    pub value: Vec<f64>,
    /// Colors
    pub color: Vec<&'static str>,
}

impl LinkColumns {
    /// Number of links
    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// Whether there are no links
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }
}

/// Accumulates links per family; [`FlowGraphBuilder::finish`] concatenates
/// them in family order.
#[derive(Debug)]
pub struct FlowGraphBuilder {
    labels: LabelSpace,
    families: [Vec<FlowEdge>; 3],
}

impl FlowGraphBuilder {
    /// Start a graph over the given labels
    pub fn new(labels: LabelSpace) -> Self {
        Self {
            labels,
            families: Default::default(),
        }
    }

    /// Append a link between two labels of the family's tiers
    pub fn add(&mut self, family: EdgeFamily, source: &str, target: &str, value: f64) -> Result<()> {
        let (source_tier, target_tier) = family.tiers();
        let lookup = |tier: Tier, label: &str| {
            self.labels.index_in(tier, label).ok_or_else(|| {
                Error::graph(format!("label '{}' is not a known {} node", label, tier))
            })
        };
        let edge = FlowEdge {
            source: lookup(source_tier, source)?,
            target: lookup(target_tier, target)?,
            value,
            family,
        };
        self.families[family as usize].push(edge);
        Ok(())
    }

    /// Add the sex→age, age→diet and diet→indicator links of one record
    pub fn add_record(&mut self, record: &Record) -> Result<()> {
        let weight = record.normalized.participants;
        let diet = record.diet_level.label();
        self.add(EdgeFamily::SexToAge, &record.sex, &record.age_group, weight)?;
        self.add(EdgeFamily::AgeToDiet, &record.age_group, diet, weight)?;
        for indicator in Indicator::ALL {
            self.add(
                EdgeFamily::DietToIndicator,
                diet,
                indicator.label(),
                record.indicator(indicator),
            )?;
        }
        Ok(())
    }

    /// Flatten the families into one ordered link list
    pub fn finish(self) -> FlowGraph {
        let edges = self.families.into_iter().flatten().collect();
        FlowGraph {
            labels: self.labels,
            edges,
        }
    }
}

/// Labels plus ordered links
#[derive(Debug, Clone, PartialEq)]
pub struct FlowGraph {
    labels: LabelSpace,
    edges: Vec<FlowEdge>,
}

impl FlowGraph {
    /// Build the graph for a set of prepared records
    pub fn build(records: &[Record]) -> Result<Self> {
        let mut builder = FlowGraphBuilder::new(LabelSpace::build(records)?);
        for record in records {
            builder.add_record(record)?;
        }
        let graph = builder.finish();
        graph.validate()?;

        tracing::info!(
            "Built flow graph: {} nodes, {} links",
            graph.labels.len(),
            graph.edges.len()
        );
        Ok(graph)
    }

    /// Node labels
    pub fn labels(&self) -> &LabelSpace {
        &self.labels
    }

    /// All links in submission order
    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    /// Number of links
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Links of one family
    pub fn edges_in(&self, family: EdgeFamily) -> impl Iterator<Item = &FlowEdge> {
        self.edges.iter().filter(move |e| e.family == family)
    }

    /// Check index bounds, finite weights and family grouping
    pub fn validate(&self) -> Result<()> {
        let nodes = self.labels.len();
        let mut last_family = 0;
        for (i, edge) in self.edges.iter().enumerate() {
            if edge.source >= nodes || edge.target >= nodes {
                return Err(Error::graph(format!(
                    "link {} references node {}→{} but only {} nodes exist",
                    i, edge.source, edge.target, nodes
                )));
            }
            if !edge.value.is_finite() {
                return Err(Error::graph(format!("link {} has non-finite weight", i)));
            }
            let family = edge.family as usize;
            if family < last_family {
                return Err(Error::graph(format!(
                    "link {} ({:?}) is out of family order",
                    i, edge.family
                )));
            }
            last_family = family;
        }
        Ok(())
    }

    /// Flatten links into parallel source/target/value/color columns
    pub fn links(&self) -> LinkColumns {
        let mut columns = LinkColumns {
            source: Vec::with_capacity(self.edges.len()),
            target: Vec::with_capacity(self.edges.len()),
            value: Vec::with_capacity(self.edges.len()),
            color: Vec::with_capacity(self.edges.len()),
        };
        for edge in &self.edges {
            columns.source.push(edge.source);
            columns.target.push(edge.target);
            columns.value.push(edge.value);
            columns.color.push(edge.family.color());
        }
        columns
    }
}
