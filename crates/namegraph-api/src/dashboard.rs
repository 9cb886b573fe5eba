//! Dashboard page
//!
//! A single HTML page with one Cytoscape.js panel per segment level and the
//! hover readout below them. Graph data is fetched from the JSON endpoints.
//! The page owns its hover state; the server only formats it.

use namegraph_core::{DashboardConfig, SegmentLevel};

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{TITLE}}</title>
<script src="{{SCRIPT_SRC}}"></script>
<style>
  body { font-family: sans-serif; margin: 0 20px; }
  h1, h3 { text-align: center; }
  h1 { padding: 10px; }
  .network { width: 100%; height: 500px; border: 1px solid #ddd; }
  .panel { margin-bottom: 30px; }
  #hover-data, #edge-hover-data { padding: 10px; font-size: 16px; }
  #edge-hover-data { color: gray; }
</style>
</head>
<body>
<h1>{{TITLE}}</h1>
{{PANELS}}
<div id="hover-data"></div>
<div id="edge-hover-data"></div>
<script>
const hoverState = { node: null, edge: null };
let hoverSeq = 0;
let shownSeq = 0;

function showReadout(readout) {
  document.getElementById("hover-data").textContent = readout.node_info;
  document.getElementById("edge-hover-data").textContent = readout.edge_info;
}

// Requests carry the whole state; only the newest reply is shown.
function sendHover(element, event) {
  hoverState[element] = event;
  const seq = ++hoverSeq;
  const events = [hoverState.node, hoverState.edge].filter((e) => e !== null);
  fetch("/api/v1/hover", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify({ seq: seq, events: events }),
  })
    .then((response) => response.json())
    .then((reply) => {
      if (reply.seq < shownSeq) {
        return;
      }
      shownSeq = reply.seq;
      showReadout(reply.readout);
    });
}

function mount(level) {
  fetch("/api/v1/graphs/" + level)
    .then((response) => response.json())
    .then((graph) => {
      const cy = cytoscape({
        container: document.getElementById("cytoscape-" + level + "-network"),
        elements: graph.elements,
        style: graph.stylesheet,
        layout: { name: "cose" },
      });
      cy.on("mouseover", "node", (evt) =>
        sendHover("node", { kind: "node", level: level, label: evt.target.data("label") }));
      cy.on("mouseover", "edge", (evt) =>
        sendHover("edge", {
          kind: "edge",
          level: level,
          source: evt.target.data("source"),
          target: evt.target.data("target"),
          weight: evt.target.data("weight"),
        }));
      cy.on("mouseout", "node", () => sendHover("node", { kind: "leave", element: "node" }));
      cy.on("mouseout", "edge", () => sendHover("edge", { kind: "leave", element: "edge" }));
    });
}

fetch("/api/v1/hover").then((response) => response.json()).then(showReadout);
{{MOUNTS}}
</script>
</body>
</html>
"##;

/// Panel heading for a level
pub fn heading(level: SegmentLevel) -> &'static str {
    match level {
        SegmentLevel::Sentence => "Sentence-Level Co-Occurrence",
        SegmentLevel::Paragraph => "Paragraph-Level Co-Occurrence Network",
    }
}

/// Render the page
pub fn render_dashboard(dashboard: &DashboardConfig) -> String {
    let panels: String = SegmentLevel::ALL
        .iter()
        .map(|level| {
            format!(
                "<div class=\"panel\">\n<h3>{}</h3>\n<div id=\"cytoscape-{}-network\" class=\"network\"></div>\n</div>\n",
                heading(*level),
                level.as_str()
            )
        })
        .collect();
    let mounts: String = SegmentLevel::ALL
        .iter()
        .map(|level| format!("mount(\"{}\");\n", level.as_str()))
        .collect();

    TEMPLATE
        .replace("{{TITLE}}", &escape_html(&dashboard.title))
        .replace("{{SCRIPT_SRC}}", &escape_html(&dashboard.script_src))
        .replace("{{PANELS}}", &panels)
        .replace("{{MOUNTS}}", &mounts)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
