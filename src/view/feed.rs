use crate::model::{Graph, NodeKind, ThreadNode};
use serde::Serialize;
use std::collections::HashSet;

/// A topic (or the root) with the comments it links to.
#[derive(Debug, Clone, Serialize)]
pub struct FeedSection<'a> {
    pub head: &'a ThreadNode,
    pub comments: Vec<&'a ThreadNode>,
}

/// Group comments under their parents by following outgoing edges.
/// Comments hanging off the root are the chat-augmented ones.
pub fn feed(graph: &Graph) -> Vec<FeedSection<'_>> {
    graph
        .nodes
        .iter()
        .filter(|n| matches!(n.kind, NodeKind::Root | NodeKind::Topic))
        .map(|head| {
            let targets: HashSet<&str> = graph
                .edges
                .iter()
                .filter(|e| e.source == head.id)
                .map(|e| e.target.as_str())
                .collect();
            let comments = graph
                .nodes
                .iter()
                .filter(|n| n.is_comment() && targets.contains(n.id.as_str()))
                .collect();
            FeedSection { head, comments }
        })
        .collect()
}
