//! Interactive HTML rendering of a knowledge graph.
//!
//! Serializes nodes and edges into a vis-network page (CDN resources,
//! directed arrows). When the data cannot be rendered into the
//! template, a minimal static HTML listing is written instead of
//! returning an error.

use std::path::{Path, PathBuf};

use petgraph::visit::EdgeRef;
use serde::Serialize;

use trellis_core::error::TrellisResult;

use crate::graph::KnowledgeGraph;

const DEFAULT_FILE_NAME: &str = "knowledge_graph.html";

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8"/>
<title>Knowledge Graph</title>
<script src="https://unpkg.com/vis-network/standalone/umd/vis-network.min.js"></script>
<style>
  #graph { width: 100%; height: 750px; border: 1px solid #ddd; }
</style>
</head>
<body>
<div id="graph"></div>
<script>
  const nodes = new vis.DataSet(__NODES__);
  const edges = new vis.DataSet(__EDGES__);
  const container = document.getElementById("graph");
  new vis.Network(container, { nodes: nodes, edges: edges }, {
    edges: { arrows: "to", font: { align: "middle" } },
    physics: { stabilization: true }
  });
</script>
</body>
</html>
"#;

#[derive(Debug, Serialize)]
struct VisNode {
    id: String,
    label: String,
    title: String,
}

#[derive(Debug, Serialize)]
struct VisEdge {
    from: String,
    to: String,
    label: String,
}

/// Render a knowledge graph to an interactive HTML file.
///
/// Writes to `output_file` when given, otherwise to
/// `knowledge_graph.html` in the system temp directory. Returns the
/// path to the written file.
pub fn render_html(kg: &KnowledgeGraph, output_file: Option<&Path>) -> TrellisResult<PathBuf> {
    let path = output_file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_FILE_NAME));

    let html = match render_template(kg) {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!("template rendering failed, using fallback HTML: {}", e);
            fallback_html(kg)
        }
    };

    std::fs::write(&path, html)?;
    Ok(path)
}

/// Render the vis-network template.
fn render_template(kg: &KnowledgeGraph) -> TrellisResult<String> {
    let graph = kg.graph();

    let nodes: Vec<VisNode> = graph
        .node_weights()
        .map(|node| VisNode {
            id: node.name.clone(),
            label: node.name.clone(),
            title: node.properties.to_string(),
        })
        .collect();

    let edges: Vec<VisEdge> = graph
        .edge_references()
        .map(|edge| VisEdge {
            from: graph[edge.source()].name.clone(),
            to: graph[edge.target()].name.clone(),
            label: edge.weight().relation.clone(),
        })
        .collect();

    let html = TEMPLATE
        .replace("__NODES__", &serde_json::to_string(&nodes)?)
        .replace("__EDGES__", &serde_json::to_string(&edges)?);
    Ok(html)
}

/// Minimal static HTML used when the template path fails.
fn fallback_html(kg: &KnowledgeGraph) -> String {
    let mut out = String::from(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"/>\
         <title>Knowledge Graph</title></head><body>\n<h1>Knowledge Graph</h1>\n<ul>\n",
    );
    for name in kg.node_names() {
        out.push_str(&format!("<li>{}</li>\n", html_escape(&name)));
    }
    out.push_str("</ul>\n<ul>\n");
    for triple in kg.edge_triples() {
        out.push_str(&format!(
            "<li>{} &rarr; {} ({})</li>\n",
            html_escape(&triple.source),
            html_escape(&triple.target),
            html_escape(&triple.relation)
        ));
    }
    out.push_str("</ul>\n</body></html>\n");
    out
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::types::{EntityProperties, RelationTriple};

    fn sample_graph() -> KnowledgeGraph {
        let mut entities = EntityProperties::new();
        entities.insert(
            "Apple Inc.".to_string(),
            serde_json::json!({"type": "ORG"}),
        );
        entities.insert("iPhone".to_string(), serde_json::json!({"type": "PRODUCT"}));
        let mut kg = KnowledgeGraph::new();
        kg.rebuild(
            &entities,
            &[RelationTriple::new("Apple Inc.", "iPhone", "manufactures")],
        );
        kg
    }

    #[test]
    fn test_render_writes_html_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.html");

        let written = render_html(&sample_graph(), Some(&path)).unwrap();
        assert_eq!(written, path);

        let html = std::fs::read_to_string(&written).unwrap();
        assert!(html.contains("vis-network"));
        assert!(html.contains("Apple Inc."));
        assert!(html.contains("iPhone"));
        assert!(html.contains("manufactures"));
    }

    #[test]
    fn test_render_defaults_to_temp_dir() {
        let written = render_html(&sample_graph(), None).unwrap();
        assert!(written.starts_with(std::env::temp_dir()));
        assert!(written.ends_with(DEFAULT_FILE_NAME));
        std::fs::remove_file(written).ok();
    }

    #[test]
    fn test_render_empty_graph() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.html");
        render_html(&KnowledgeGraph::new(), Some(&path)).unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("vis.DataSet([])"));
    }

    #[test]
    fn test_fallback_lists_nodes_and_edges() {
        let html = fallback_html(&sample_graph());
        assert!(html.contains("<li>Apple Inc.</li>"));
        assert!(html.contains("iPhone"));
        assert!(html.contains("manufactures"));
    }

    #[test]
    fn test_fallback_escapes_markup() {
        let mut entities = EntityProperties::new();
        entities.insert("<script>".to_string(), serde_json::json!({}));
        let mut kg = KnowledgeGraph::new();
        kg.rebuild(&entities, &[]);

        let html = fallback_html(&kg);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert"));
    }
}
