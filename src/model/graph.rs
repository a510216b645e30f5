use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Id of the single root node every woven graph starts from.
pub const ROOT_ID: &str = "center-root";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Root,
    Topic,
    Comment,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Insightful,
    Controversial,
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            "insightful" => Ok(Sentiment::Insightful),
            "controversial" => Ok(Sentiment::Controversial),
            other => Err(format!("unknown sentiment: {}", other)),
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Insightful => "insightful",
            Sentiment::Controversial => "controversial",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodeData {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `distance` from `self` in direction `angle` (radians).
    pub fn offset(self, angle: f64, distance: f64) -> Self {
        Self {
            x: self.x + angle.cos() * distance,
            y: self.y + angle.sin() * distance,
        }
    }
}

/// A node of the mind-map. Position is fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThreadNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub data: NodeData,
    pub position: Position,
}

impl ThreadNode {
    pub fn is_comment(&self) -> bool {
        self.kind == NodeKind::Comment
    }
}

/// Visual role of an edge; the viewer maps each to a stroke.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    /// Root to topic.
    Primary,
    /// Topic to comment.
    #[default]
    Plain,
    /// Root to a chat-augmented node.
    Dashed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub animated: bool,
    #[serde(default)]
    pub style: EdgeStyle,
}

impl Edge {
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Graph {
    pub nodes: Vec<ThreadNode>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn node(&self, id: &str) -> Option<&ThreadNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn root(&self) -> Option<&ThreadNode> {
        self.nodes.iter().find(|n| n.kind == NodeKind::Root)
    }

    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }

    /// Edges whose source or target does not name a node of this graph.
    pub fn dangling_edges(&self) -> Vec<&Edge> {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        self.edges
            .iter()
            .filter(|e| !ids.contains(e.source.as_str()) || !ids.contains(e.target.as_str()))
            .collect()
    }

    /// Compact `[{id, label}]` listing handed to the model as chat context.
    pub fn snapshot_json(&self) -> String {
        let entries: Vec<_> = self
            .nodes
            .iter()
            .map(|n| serde_json::json!({ "id": n.id, "label": n.data.label }))
            .collect();
        serde_json::Value::Array(entries).to_string()
    }

    /// Node contents as `[author]: content` lines, used when the raw thread text is gone.
    pub fn context_text(&self) -> String {
        self.nodes
            .iter()
            .map(|n| {
                format!(
                    "[{}]: {}",
                    n.data.author.as_deref().unwrap_or("Author"),
                    n.data.content.as_deref().unwrap_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
