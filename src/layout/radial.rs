use crate::model::{
    Edge, EdgeStyle, Graph, NodeData, NodeKind, Position, ROOT_ID, RawNode, ThreadNode, Topic,
};
use std::collections::HashSet;
use std::f64::consts::PI;

pub const DEFAULT_TOPIC_RADIUS: f64 = 600.0;
pub const DEFAULT_CHILD_RADIUS: f64 = 500.0;
pub const DEFAULT_STAGGER: f64 = 180.0;
/// Total angular width of a topic's comment fan.
pub const FAN_SPREAD: f64 = PI / 1.5;

/// Deterministic mind-map layout: root at the origin, topics on a ring,
/// comments fanned outward from their topic.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialLayout {
    pub topic_radius: f64,
    pub child_radius: f64,
    pub stagger: f64,
    pub root_label: String,
}

impl Default for RadialLayout {
    fn default() -> Self {
        Self {
            topic_radius: DEFAULT_TOPIC_RADIUS,
            child_radius: DEFAULT_CHILD_RADIUS,
            stagger: DEFAULT_STAGGER,
            root_label: "Thread Root".to_string(),
        }
    }
}

impl RadialLayout {
    pub fn with_root_label(mut self, label: impl Into<String>) -> Self {
        self.root_label = label.into();
        self
    }

    /// Angle of topic `index` out of `count` on the ring.
    pub fn topic_angle(index: usize, count: usize) -> f64 {
        index as f64 * (2.0 * PI / count.max(1) as f64)
    }

    /// Angle and distance (from the topic) of comment `index` out of `siblings`.
    pub fn comment_polar(&self, topic_angle: f64, index: usize, siblings: usize) -> (f64, f64) {
        let start = topic_angle - FAN_SPREAD / 2.0;
        let angle = start + (index + 1) as f64 * (FAN_SPREAD / (siblings + 1) as f64);
        let distance = if index % 2 == 0 {
            self.child_radius
        } else {
            self.child_radius + self.stagger
        };
        (angle, distance)
    }

    pub fn build(&self, topics: &[Topic], nodes: &[RawNode]) -> Graph {
        let mut graph = Graph::default();
        let origin = Position::default();

        graph.nodes.push(ThreadNode {
            id: ROOT_ID.to_string(),
            kind: NodeKind::Root,
            data: NodeData {
                label: self.root_label.clone(),
                content: Some("Central Topic".to_string()),
                ..Default::default()
            },
            position: origin,
        });

        for (i, topic) in topics.iter().enumerate() {
            let angle = Self::topic_angle(i, topics.len());
            let topic_pos = origin.offset(angle, self.topic_radius);
            let topic_id = format!("topic-{}", i);

            graph.nodes.push(ThreadNode {
                id: topic_id.clone(),
                kind: NodeKind::Topic,
                data: NodeData {
                    label: topic.title.clone(),
                    content: Some(topic.summary.clone()),
                    ..Default::default()
                },
                position: topic_pos,
            });
            graph.edges.push(Edge {
                id: format!("e-center-{}", i),
                source: ROOT_ID.to_string(),
                target: topic_id.clone(),
                animated: true,
                style: EdgeStyle::Primary,
            });

            let related: Vec<&RawNode> = nodes
                .iter()
                .filter(|n| n.topic_id.as_deref() == Some(topic.id.as_str()))
                .collect();

            for (j, raw) in related.iter().enumerate() {
                let (child_angle, distance) = self.comment_polar(angle, j, related.len());
                let comment_id = format!("node-{}-{}", i, j);

                graph.nodes.push(ThreadNode {
                    id: comment_id.clone(),
                    kind: NodeKind::Comment,
                    data: comment_data(raw),
                    position: topic_pos.offset(child_angle, distance),
                });
                graph.edges.push(Edge {
                    id: format!("e-{}-{}", i, j),
                    source: topic_id.clone(),
                    target: comment_id,
                    animated: true,
                    style: EdgeStyle::Plain,
                });
            }
        }

        graph
    }

    /// Raw nodes that `build` leaves out because no topic claims them.
    pub fn unplaced<'a>(topics: &[Topic], nodes: &'a [RawNode]) -> Vec<&'a RawNode> {
        let ids: HashSet<&str> = topics.iter().map(|t| t.id.as_str()).collect();
        nodes
            .iter()
            .filter(|n| n.topic_id.as_deref().is_none_or(|id| !ids.contains(id)))
            .collect()
    }
}

fn comment_data(raw: &RawNode) -> NodeData {
    NodeData {
        label: raw.author.clone().unwrap_or_else(|| "anon".to_string()),
        content: Some(raw.content.clone()),
        author: raw.author.clone(),
        link: raw.link.clone(),
        sentiment: raw.sentiment,
        score: None,
    }
}

/// Build a graph with the default layout.
pub fn build_graph(topics: &[Topic], nodes: &[RawNode]) -> Graph {
    RadialLayout::default().build(topics, nodes)
}
