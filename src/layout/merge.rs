use crate::model::{Edge, EdgeStyle, Graph, NodeData, NodeKind, Position, RawNode, ThreadNode};
use rand::Rng;
use std::collections::HashSet;

/// Half-width of the square around the origin where augmented nodes land.
pub const SCATTER_EXTENT: f64 = 250.0;

/// Append chat-proposed nodes to `graph`.
///
/// Every new node becomes a comment with a fresh id, scattered at random near
/// the origin and linked from the root with a dashed edge. Existing nodes and
/// edges are left untouched; any `topic_id` on the input is ignored.
pub fn merge_nodes(graph: &Graph, new_nodes: &[RawNode]) -> Graph {
    merge_nodes_with_rng(graph, new_nodes, &mut rand::thread_rng())
}

pub fn merge_nodes_with_rng<R: Rng>(
    graph: &Graph,
    new_nodes: &[RawNode],
    rng: &mut R,
) -> Graph {
    let mut merged = graph.clone();
    let mut taken: HashSet<String> = graph
        .nodes
        .iter()
        .map(|n| n.id.clone())
        .chain(graph.edges.iter().map(|e| e.id.clone()))
        .collect();
    let root_id = graph.root().map(|r| r.id.clone());

    for raw in new_nodes {
        let id = fresh_id(&mut taken);
        let position = Position::new(
            rng.gen_range(-SCATTER_EXTENT..=SCATTER_EXTENT),
            rng.gen_range(-SCATTER_EXTENT..=SCATTER_EXTENT),
        );

        merged.nodes.push(ThreadNode {
            id: id.clone(),
            kind: NodeKind::Comment,
            data: NodeData {
                label: raw.author.clone().unwrap_or_else(|| "AI Insight".to_string()),
                content: Some(raw.content.clone()),
                author: raw.author.clone(),
                link: raw.link.clone(),
                sentiment: raw.sentiment,
                score: None,
            },
            position,
        });

        // A graph without a root keeps the node unlinked rather than dangling.
        if let Some(root) = &root_id {
            merged.edges.push(Edge {
                id: format!("e-{}", id),
                source: root.clone(),
                target: id,
                animated: true,
                style: EdgeStyle::Dashed,
            });
        }
    }

    merged
}

fn fresh_id(taken: &mut HashSet<String>) -> String {
    loop {
        let candidate = format!("chat-node-{}", uuid::Uuid::new_v4().simple());
        let edge_id = format!("e-{}", candidate);
        if !taken.contains(&candidate) && !taken.contains(&edge_id) {
            taken.insert(candidate.clone());
            taken.insert(edge_id);
            return candidate;
        }
    }
}
