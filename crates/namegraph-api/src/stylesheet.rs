//! Diagram stylesheet
//!
//! Rules are emitted in the `[{ selector, style }]` form Cytoscape.js takes.
//! Later rules override earlier ones, so highlight rules follow the default
//! node rule.

use std::collections::BTreeSet;

use namegraph_core::DashboardConfig;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
    pub selector: String,
    pub style: Value,
}

impl StyleRule {
    pub fn new(selector: impl Into<String>, style: Value) -> Self {
        Self {
            selector: selector.into(),
            style,
        }
    }
}

/// Stylesheet for one diagram.
///
/// `max_weight` is the heaviest edge in that diagram; edge width is mapped
/// linearly from `[1, max_weight]` onto the configured width range.
pub fn build_stylesheet(
    dashboard: &DashboardConfig,
    highlight: &BTreeSet<String>,
    max_weight: u32,
) -> Vec<StyleRule> {
    let mut rules = vec![StyleRule::new(
        "node",
        json!({
            "content": "data(label)",
            "color": "black",
            "background-color": dashboard.node_color,
            "width": "180px",
            "height": "50px",
            "text-halign": "center",
            "text-valign": "center",
        }),
    )];

    rules.extend(highlight.iter().map(|name| {
        StyleRule::new(
            id_selector(name),
            json!({ "background-color": dashboard.highlight_color }),
        )
    }));

    let width = if max_weight > 1 {
        json!(format!(
            "mapData(weight, 1, {}, {}, {})",
            max_weight, dashboard.min_edge_width, dashboard.max_edge_width
        ))
    } else {
        json!(dashboard.min_edge_width)
    };
    rules.push(StyleRule::new(
        "edge",
        json!({ "line-color": "gray", "width": width }),
    ));

    rules
}

/// Selector matching the node whose id is `name`
fn id_selector(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
    format!("node[id = \"{escaped}\"]")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highlight() -> BTreeSet<String> {
        ["Walt Whitman", "T. S. Eliot"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_rule_order_and_colours() {
        let rules = build_stylesheet(&DashboardConfig::default(), &highlight(), 5);
        assert_eq!(rules.len(), 4);
        assert_eq!(rules[0].selector, "node");
        assert_eq!(rules[0].style["background-color"], "lightblue");
        assert_eq!(rules[0].style["content"], "data(label)");
        assert_eq!(rules[1].selector, "node[id = \"T. S. Eliot\"]");
        assert_eq!(rules[2].style["background-color"], "#ff9999");
        assert_eq!(rules[3].selector, "edge");
        assert_eq!(rules[3].style["width"], "mapData(weight, 1, 5, 1, 12)");
    }

    #[test]
    fn test_flat_edge_width_when_all_weights_are_one() {
        let rules = build_stylesheet(&DashboardConfig::default(), &BTreeSet::new(), 1);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[1].style["width"], 1.0);
    }

    #[test]
    fn test_selector_escapes_quotes() {
        assert_eq!(id_selector("Neal \"Dean\" Cassady"), "node[id = \"Neal \\\"Dean\\\" Cassady\"]");
    }
}
