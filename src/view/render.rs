use super::density::{clamp_density, visible};
use super::highlight::highlight;
use crate::model::{EdgeStyle, Graph, NodeData, NodeKind, Position};
use serde::Serialize;

const ACCENT: &str = "#6366f1";
const MUTED: &str = "#3f3f46";
const COMMENT_STROKE: &str = "#a1a1aa";
const AUGMENT_STROKE: &str = "#10b981";
const DIMMED: f64 = 0.1;

/// Graph as the viewer draws it: visible elements with derived styling.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedGraph {
    pub nodes: Vec<RenderedNode>,
    pub edges: Vec<RenderedEdge>,
    pub selected: Option<String>,
    pub density: u8,
    pub hidden_comments: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub data: NodeData,
    pub position: Position,
    pub opacity: f64,
    pub highlighted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub animated: bool,
    pub stroke: &'static str,
    pub stroke_width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<&'static str>,
    pub opacity: f64,
}

fn base_stroke(style: EdgeStyle) -> (&'static str, f64, Option<&'static str>) {
    match style {
        EdgeStyle::Primary => (ACCENT, 2.0, None),
        EdgeStyle::Plain => (COMMENT_STROKE, 1.0, None),
        EdgeStyle::Dashed => (AUGMENT_STROKE, 1.0, Some("5,5")),
    }
}

pub fn render(graph: &Graph, selected: Option<&str>, density: u8) -> RenderedGraph {
    let density = clamp_density(density);
    let view = visible(graph, density);
    let focus = highlight(graph, selected);
    let has_focus = selected.is_some();

    let nodes = view
        .nodes
        .iter()
        .map(|n| {
            let highlighted = focus.nodes.contains(&n.id);
            RenderedNode {
                id: n.id.clone(),
                kind: n.kind,
                data: n.data.clone(),
                position: n.position,
                opacity: if has_focus && !highlighted { DIMMED } else { 1.0 },
                highlighted,
            }
        })
        .collect::<Vec<_>>();

    let edges = view
        .edges
        .iter()
        .map(|e| {
            let (stroke, stroke_width, dash) = base_stroke(e.style);
            if !has_focus {
                return RenderedEdge {
                    id: e.id.clone(),
                    source: e.source.clone(),
                    target: e.target.clone(),
                    animated: e.animated,
                    stroke,
                    stroke_width,
                    dash,
                    opacity: 1.0,
                };
            }
            let lit = focus.edges.contains(&e.id);
            RenderedEdge {
                id: e.id.clone(),
                source: e.source.clone(),
                target: e.target.clone(),
                animated: lit,
                stroke: if lit { ACCENT } else { MUTED },
                stroke_width: if lit { 3.0 } else { 1.0 },
                dash,
                opacity: if lit { 1.0 } else { DIMMED },
            }
        })
        .collect();

    let shown_comments = nodes.iter().filter(|n| n.kind == NodeKind::Comment).count();

    RenderedGraph {
        hidden_comments: graph.count(NodeKind::Comment) - shown_comments,
        nodes,
        edges,
        selected: selected.map(str::to_string),
        density,
    }
}
