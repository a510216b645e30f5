use crate::model::Graph;
use serde::Serialize;
use std::collections::HashSet;

/// Nodes and edges emphasized around a selected node.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Highlight {
    pub nodes: HashSet<String>,
    pub edges: HashSet<String>,
}

impl Highlight {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// One-hop neighbourhood of `selected`, ignoring edge direction.
pub fn highlight(graph: &Graph, selected: Option<&str>) -> Highlight {
    let Some(selected) = selected else {
        return Highlight::default();
    };

    let mut result = Highlight::default();
    result.nodes.insert(selected.to_string());

    for edge in &graph.edges {
        if edge.source == selected {
            result.nodes.insert(edge.target.clone());
            result.edges.insert(edge.id.clone());
        } else if edge.target == selected {
            result.nodes.insert(edge.source.clone());
            result.edges.insert(edge.id.clone());
        }
    }

    result
}
