//! namegraph Graph - Weighted undirected co-occurrence graphs
//!
//! `PairCounts` accumulates how many segments each unordered name pair shares.
//! `CooccurrenceGraph` freezes those counts into a petgraph `UnGraph` whose
//! nodes are the names that appear on at least one edge.

pub mod elements;

pub use elements::{EdgeData, Element, GraphElements, NodeData};

use std::collections::{BTreeMap, BTreeSet, HashMap};

use namegraph_core::SegmentLevel;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

// ============================================================================
// Pair counting
// ============================================================================

/// Per-pair segment counts, keyed by the pair in lexical order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairCounts {
    counts: BTreeMap<(String, String), u32>,
}

impl PairCounts {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }

    /// Count one segment: every unordered pair of distinct names gains one
    pub fn record_segment<'a, I>(&mut self, names: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: Vec<&str> = names.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        for (i, first) in names.iter().enumerate() {
            for second in &names[i + 1..] {
                self.increment(first, second);
            }
        }
    }

    /// Add one to a pair; self-pairs are ignored
    pub fn increment(&mut self, a: &str, b: &str) {
        if a == b {
            return;
        }
        *self.counts.entry(Self::key(a, b)).or_insert(0) += 1;
    }

    /// Count for a pair, in either order
    pub fn get(&self, a: &str, b: &str) -> u32 {
        self.counts.get(&Self::key(a, b)).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Pairs in lexical order with their counts
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, u32)> {
        self.counts
            .iter()
            .map(|((a, b), count)| (a.as_str(), b.as_str(), *count))
    }
}

// ============================================================================
// Graph
// ============================================================================

/// An edge with both endpoints resolved to names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedEdge {
    pub source: String,
    pub target: String,
    pub weight: u32,
}

/// Graph statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub max_weight: u32,
    pub total_weight: u64,
}

/// Read-only co-occurrence graph for one segment level
#[derive(Debug, Clone)]
pub struct CooccurrenceGraph {
    level: SegmentLevel,
    graph: UnGraph<String, u32>,
    index: HashMap<String, NodeIndex>,
}

impl CooccurrenceGraph {
    /// Build from pair counts; pairs with a zero count are skipped
    pub fn from_counts(level: SegmentLevel, counts: &PairCounts) -> Self {
        let mut built = Self {
            level,
            graph: UnGraph::new_undirected(),
            index: HashMap::new(),
        };

        for (a, b, count) in counts.iter() {
            if count == 0 {
                continue;
            }
            let from = built.node(a);
            let to = built.node(b);
            built.graph.add_edge(from, to, count);
        }

        built
    }

    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    pub fn level(&self) -> SegmentLevel {
        self.level
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Node names in insertion order
    pub fn nodes(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].as_str())
            .collect()
    }

    /// Edges in insertion order (lexical by pair)
    pub fn edges(&self) -> Vec<WeightedEdge> {
        self.graph
            .edge_references()
            .map(|edge| WeightedEdge {
                source: self.graph[edge.source()].clone(),
                target: self.graph[edge.target()].clone(),
                weight: *edge.weight(),
            })
            .collect()
    }

    /// Weight between two names, in either order
    pub fn weight(&self, a: &str, b: &str) -> Option<u32> {
        let from = *self.index.get(a)?;
        let to = *self.index.get(b)?;
        self.graph
            .find_edge(from, to)
            .and_then(|edge| self.graph.edge_weight(edge))
            .copied()
    }

    /// Neighbours of a name, heaviest first
    pub fn neighbors(&self, name: &str) -> Vec<(&str, u32)> {
        let Some(&idx) = self.index.get(name) else {
            return Vec::new();
        };
        let mut neighbors: Vec<(&str, u32)> = self
            .graph
            .edges(idx)
            .map(|edge| {
                let other = if edge.source() == idx {
                    edge.target()
                } else {
                    edge.source()
                };
                (self.graph[other].as_str(), *edge.weight())
            })
            .collect();
        neighbors.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        neighbors
    }

    pub fn max_weight(&self) -> u32 {
        self.graph.edge_weights().copied().max().unwrap_or(0)
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            max_weight: self.max_weight(),
            total_weight: self.graph.edge_weights().map(|w| u64::from(*w)).sum(),
        }
    }

    /// Node and edge descriptors for the diagram widget
    pub fn to_elements(&self) -> GraphElements {
        GraphElements {
            nodes: self
                .nodes()
                .into_iter()
                .map(|name| Element::new(NodeData::new(name)))
                .collect(),
            edges: self
                .edges()
                .into_iter()
                .map(|edge| Element::new(EdgeData::from(edge)))
                .collect(),
        }
    }
}
