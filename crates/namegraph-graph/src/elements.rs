//! Diagram element descriptors
//!
//! Serialized in the `{ nodes: [{ data }], edges: [{ data }] }` shape that
//! Cytoscape.js accepts directly as `elements`.

use serde::{Deserialize, Serialize};

use crate::WeightedEdge;

/// Wrapper matching the widget's `{ "data": ... }` element shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element<T> {
    pub data: T,
}

impl<T> Element<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Node identity and display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: String,
    pub label: String,
}

impl NodeData {
    /// A node labelled with its own identity
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            id: name,
        }
    }
}

/// Endpoint pair and co-occurrence weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeData {
    pub source: String,
    pub target: String,
    pub weight: u32,
}

impl From<WeightedEdge> for EdgeData {
    fn from(edge: WeightedEdge) -> Self {
        Self {
            source: edge.source,
            target: edge.target,
            weight: edge.weight,
        }
    }
}

/// All elements of one diagram
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphElements {
    pub nodes: Vec<Element<NodeData>>,
    pub edges: Vec<Element<EdgeData>>,
}

impl GraphElements {
    pub fn len(&self) -> usize {
        self.nodes.len() + self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}
