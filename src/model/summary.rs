use super::graph::Sentiment;
use serde::{Deserialize, Serialize};

/// A thematic cluster proposed by the model. Consumed once by the layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Topic {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
}

/// A comment or insight proposed by the model, tied to a topic by id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    pub id: String,
    #[serde(default)]
    pub topic_id: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    pub content: String,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
    #[serde(default)]
    pub link: Option<String>,
}

impl RawNode {
    pub fn new(
        id: impl Into<String>,
        topic_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            topic_id: Some(topic_id.into()),
            author: None,
            content: content.into(),
            sentiment: None,
            link: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// Validated summarization result.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub topics: Vec<Topic>,
    pub nodes: Vec<RawNode>,
}

/// Validated chat result.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub answer: String,
    pub new_nodes: Vec<RawNode>,
}
