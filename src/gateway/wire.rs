//! Loose shapes of model output, validated into [`Summary`] and [`ChatReply`].
//!
//! Models drift from the requested schema, so every field is optional here and
//! the conversion decides what is required.

use crate::model::{ChatReply, RawNode, Sentiment, Summary, Topic};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Default, Deserialize)]
struct WireSummary {
    topics: Option<Vec<WireTopic>>,
    nodes: Option<Vec<WireNode>>,
}

#[derive(Debug, Default, Deserialize)]
struct WireTopic {
    id: Option<Value>,
    title: Option<String>,
    summary: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireNode {
    id: Option<Value>,
    topic_id: Option<Value>,
    author: Option<String>,
    content: Option<String>,
    sentiment: Option<String>,
    link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireChat {
    answer: Option<String>,
    new_nodes: Option<Vec<WireNode>>,
}

/// Ids sometimes come back as numbers.
fn id_string(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty() && s != "null")
}

/// Strip a surrounding markdown code fence, if any.
pub fn strip_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map(|(_, b)| b).unwrap_or_default();
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

impl WireNode {
    fn validate(self, index: usize) -> Option<RawNode> {
        let Some(content) = non_empty(self.content) else {
            warn!(index, "dropping node without content");
            return None;
        };
        let sentiment = self
            .sentiment
            .and_then(|s| s.parse::<Sentiment>().ok());
        Some(RawNode {
            id: id_string(self.id).unwrap_or_else(|| format!("node-{}", index)),
            topic_id: id_string(self.topic_id),
            author: non_empty(self.author),
            content,
            sentiment,
            link: non_empty(self.link),
        })
    }
}

fn validate_nodes(nodes: Vec<WireNode>) -> Vec<RawNode> {
    nodes
        .into_iter()
        .enumerate()
        .filter_map(|(i, n)| n.validate(i))
        .collect()
}

/// Parse the summarize response body. `Err` carries a human-readable reason.
pub fn parse_summary(content: &str) -> Result<Summary, String> {
    let wire: WireSummary = serde_json::from_str(strip_fences(content))
        .map_err(|e| format!("response is not a JSON object: {}", e))?;

    if wire.topics.is_none() && wire.nodes.is_none() {
        return Err("response has neither topics nor nodes".to_string());
    }

    let topics = wire
        .topics
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(i, t)| {
            let (Some(id), Some(title)) = (id_string(t.id), non_empty(t.title)) else {
                warn!(index = i, "dropping topic without id or title");
                return None;
            };
            Some(Topic {
                id,
                title,
                summary: t.summary.unwrap_or_default(),
            })
        })
        .collect();

    Ok(Summary {
        topics,
        nodes: validate_nodes(wire.nodes.unwrap_or_default()),
    })
}

pub fn parse_chat(content: &str) -> Result<ChatReply, String> {
    let wire: WireChat = serde_json::from_str(strip_fences(content))
        .map_err(|e| format!("response is not a JSON object: {}", e))?;
    let answer = wire.answer.ok_or("response has no answer")?;

    Ok(ChatReply {
        answer,
        new_nodes: validate_nodes(wire.new_nodes.unwrap_or_default()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_summary_happy_path() {
        let summary = parse_summary(
            r#"{
                "topics": [{"id": "t1", "title": "A", "summary": "s"}],
                "nodes": [{"id": "n1", "topicId": "t1", "author": "u", "content": "c", "sentiment": "Insightful", "link": null}]
            }"#,
        )
        .unwrap();

        assert_eq!(summary.topics.len(), 1);
        assert_eq!(summary.nodes[0].topic_id.as_deref(), Some("t1"));
        assert_eq!(summary.nodes[0].sentiment, Some(Sentiment::Insightful));
        assert_eq!(summary.nodes[0].link, None);
    }

    #[test]
    fn test_parse_summary_tolerates_partial_entries() {
        let summary = parse_summary(
            r#"{
                "topics": [{"id": 3, "title": "Numeric"}, {"title": "No id"}],
                "nodes": [
                    {"topicId": 3, "content": "kept", "sentiment": "sarcastic"},
                    {"id": "n2", "topicId": "3"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(summary.topics.len(), 1);
        assert_eq!(summary.topics[0].id, "3");
        assert_eq!(summary.topics[0].summary, "");
        assert_eq!(summary.nodes.len(), 1);
        assert_eq!(summary.nodes[0].id, "node-0");
        assert_eq!(summary.nodes[0].topic_id.as_deref(), Some("3"));
        assert_eq!(summary.nodes[0].sentiment, None);
    }

    #[test]
    fn test_parse_summary_rejects_wrong_shapes() {
        assert!(parse_summary("not json").is_err());
        assert!(parse_summary("[1, 2]").is_err());
        assert!(parse_summary(r#"{"answer": "x"}"#).is_err());
    }

    #[test]
    fn test_parse_summary_accepts_nodes_without_topics() {
        let summary = parse_summary(r#"{"nodes": []}"#).unwrap();
        assert!(summary.topics.is_empty());
    }

    #[test]
    fn test_strip_fences() {
        assert_eq!(strip_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_fences("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn test_parse_chat() {
        let reply = parse_chat(r#"{"answer": "yes", "newNodes": [{"content": "new"}]}"#).unwrap();
        assert_eq!(reply.answer, "yes");
        assert_eq!(reply.new_nodes.len(), 1);

        let bare = parse_chat(r#"{"answer": "no"}"#).unwrap();
        assert!(bare.new_nodes.is_empty());

        assert!(parse_chat(r#"{"newNodes": []}"#).is_err());
    }
}
