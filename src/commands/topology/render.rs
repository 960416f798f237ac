use anyhow::Result;
use std::fmt::Write as _;
use std::str::FromStr;

use super::graph::Graph;
use super::grid::{Grid, ROAD_TOKEN};
use super::models::{Cell, Node, NodeKind};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum OutputFormat {
    #[default]
    Dot,
    Json,
    Text,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dot" | "graphviz" => Ok(OutputFormat::Dot),
            "json" => Ok(OutputFormat::Json),
            "text" | "txt" => Ok(OutputFormat::Text),
            other => Err(format!("unknown format {:?} (expected dot|json|text)", other)),
        }
    }
}

pub fn render(graph: &Graph, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Dot => Ok(render_dot(graph)),
        OutputFormat::Json => render_json(graph),
        OutputFormat::Text => Ok(render_text(graph)),
    }
}

/// Space separated rows, the way the grid is written by hand.
pub fn render_grid(grid: &Grid) -> String {
    let mut out = String::new();
    for row in grid.rows() {
        let line: Vec<&str> = row
            .iter()
            .map(|c| match c {
                Cell::Road => ROAD_TOKEN,
                Cell::Building(id) => id.as_str(),
            })
            .collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn dot_attrs(node: &Node) -> (String, Vec<(&'static str, &'static str)>) {
    let pos = node.anchor.to_string();
    match &node.kind {
        NodeKind::Building { id, is_warehouse } => {
            let mut label = format!("Building {}", id);
            let mut attrs = vec![("shape", "box")];
            if *is_warehouse {
                attrs.push(("style", "filled"));
                attrs.push(("fillcolor", "lightblue"));
                label.push_str("\n(Warehouse)");
            }
            (label, attrs)
        }
        NodeKind::Intersection => (
            format!("{}\nIntersection", pos),
            vec![("style", "filled"), ("fillcolor", "yellow")],
        ),
        NodeKind::WidthChange { width } => (
            format!("{}\nWidth: {}", pos, width),
            vec![("style", "filled"), ("fillcolor", "lightgreen")],
        ),
        NodeKind::End => (format!("{}\nEnd", pos), vec![("style", "filled"), ("fillcolor", "pink")]),
    }
}

/// Undirected Graphviz source. Entrances of one building share a vertex name,
/// so Graphviz merges them into a single box.
pub fn render_dot(graph: &Graph) -> String {
    let mut out = String::new();
    out.push_str("// Grid Graph\n");
    out.push_str("graph {\n");
    out.push_str("\tnode [shape=circle]\n");
    for node in graph.nodes() {
        let (label, attrs) = dot_attrs(&node);
        let _ = write!(out, "\t\"{}\" [label=\"{}\"", dot_escape(&node.id.to_string()), dot_escape(&label));
        for (k, v) in attrs {
            let _ = write!(out, " {}={}", k, v);
        }
        out.push_str("]\n");
    }
    for e in graph.edges() {
        let _ = writeln!(
            out,
            "\t\"{}\" -- \"{}\" [label=\"W:{}, D:{}\"]",
            dot_escape(&e.source.to_string()),
            dot_escape(&e.target.to_string()),
            e.width,
            e.distance
        );
    }
    out.push_str("}\n");
    out
}

pub fn render_json(graph: &Graph) -> Result<String> {
    Ok(serde_json::to_string_pretty(&graph.export())?)
}

/// Plain listing for terminals.
pub fn render_text(graph: &Graph) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "nodes ({}):", graph.nodes.len());
    for node in graph.nodes() {
        let detail = match &node.kind {
            NodeKind::Building { id, is_warehouse: true } => format!("building {} (warehouse)", id),
            NodeKind::Building { id, .. } => format!("building {}", id),
            NodeKind::WidthChange { width } => format!("width_change {}", width),
            other => other.label().to_string(),
        };
        let _ = writeln!(out, "  {:<8} {:<14} {}", node.anchor.to_string(), node.id.to_string(), detail);
    }
    let _ = writeln!(out, "edges ({}):", graph.edges.len());
    for e in graph.edges() {
        let _ = writeln!(
            out,
            "  {} {} -> {} {}  W:{} D:{}",
            e.source, e.source_anchor, e.target, e.target_anchor, e.width, e.distance
        );
    }
    out
}
