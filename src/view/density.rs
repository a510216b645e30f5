use crate::model::{Edge, Graph, ThreadNode};
use std::collections::HashSet;

pub const MIN_DENSITY: u8 = 10;
pub const MAX_DENSITY: u8 = 100;

/// Subset of a graph shown at a given density.
#[derive(Debug, Clone)]
pub struct VisibleGraph<'a> {
    pub nodes: Vec<&'a ThreadNode>,
    pub edges: Vec<&'a Edge>,
}

pub fn clamp_density(density: u8) -> u8 {
    density.clamp(MIN_DENSITY, MAX_DENSITY)
}

/// Keep every non-comment node and the first `floor(comments * density / 100)`
/// comments in graph order, plus the edges between kept nodes.
pub fn visible(graph: &Graph, density: u8) -> VisibleGraph<'_> {
    let density = clamp_density(density) as usize;
    let comment_total = graph.nodes.iter().filter(|n| n.is_comment()).count();
    let mut budget = comment_total * density / 100;

    let nodes: Vec<&ThreadNode> = graph
        .nodes
        .iter()
        .filter(|n| {
            if !n.is_comment() {
                return true;
            }
            if budget == 0 {
                return false;
            }
            budget -= 1;
            true
        })
        .collect();

    let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let edges = graph
        .edges
        .iter()
        .filter(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()))
        .collect();

    VisibleGraph { nodes, edges }
}
