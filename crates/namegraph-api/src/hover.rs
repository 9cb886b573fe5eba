//! Hover readout
//!
//! Each page keeps its own latest node event and latest edge event, from
//! whichever diagram fired, and sends them with a sequence number. The server
//! formats them without keeping any state; the page drops replies older than
//! the one it already shows.

use namegraph_core::SegmentLevel;
use serde::{Deserialize, Serialize};

pub const NODE_PLACEHOLDER: &str = "Hover over a node to see details.";
pub const EDGE_PLACEHOLDER: &str = "Hover over an edge to see co-occurrence weight.";

/// Which kind of diagram element an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Node,
    Edge,
}

/// A pointer event from one of the diagrams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HoverEvent {
    /// Pointer entered a node
    Node { level: SegmentLevel, label: String },
    /// Pointer entered an edge
    Edge {
        level: SegmentLevel,
        source: String,
        target: String,
        #[serde(default)]
        weight: Option<u32>,
    },
    /// Pointer left an element
    Leave { element: ElementKind },
}

/// A page's current hover state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverRequest {
    /// Page-local sequence number, echoed in the reply
    pub seq: u64,
    /// Latest events, applied in order
    #[serde(default)]
    pub events: Vec<HoverEvent>,
}

/// Formatted readout for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverResponse {
    pub seq: u64,
    pub readout: HoverReadout,
}

/// The two readout lines under the diagrams
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverReadout {
    pub node_info: String,
    pub edge_info: String,
}

impl Default for HoverReadout {
    fn default() -> Self {
        Self {
            node_info: NODE_PLACEHOLDER.to_string(),
            edge_info: EDGE_PLACEHOLDER.to_string(),
        }
    }
}

impl HoverReadout {
    /// Placeholders with `events` applied in order
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a HoverEvent>) -> Self {
        let mut readout = Self::default();
        for event in events {
            readout.apply(event);
        }
        readout
    }

    /// Replace the line the event refers to
    pub fn apply(&mut self, event: &HoverEvent) {
        match event {
            HoverEvent::Node { level, label } => {
                self.node_info = format!("[{}] Name: {}", level.display_name(), label);
            }
            HoverEvent::Edge {
                level,
                source,
                target,
                weight,
            } => {
                let weight = weight.map_or_else(|| "N/A".to_string(), |w| w.to_string());
                self.edge_info = format!(
                    "[{}] {} ↔ {} (Weight: {})",
                    level.display_name(),
                    source,
                    target,
                    weight
                );
            }
            HoverEvent::Leave {
                element: ElementKind::Node,
            } => self.node_info = NODE_PLACEHOLDER.to_string(),
            HoverEvent::Leave {
                element: ElementKind::Edge,
            } => self.edge_info = EDGE_PLACEHOLDER.to_string(),
        }
    }
}
