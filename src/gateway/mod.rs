//! Chat-completion client that turns thread text into topics and nodes.

mod prompts;
mod wire;

pub use prompts::{
    CHAT_GRAPH_CHARS, CHAT_THREAD_CHARS, SUMMARY_INPUT_CHARS, chat_prompt, summarize_prompt,
    truncate_chars,
};
pub use wire::{parse_chat, parse_summary, strip_fences};

use crate::model::{ChatReply, Graph, Summary};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const OPENROUTER_API: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "anthropic/claude-3.5-haiku";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("LLM API error (HTTP {status}): {body}")]
    Auth { status: u16, body: String },

    #[error("LLM request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to parse LLM response: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub context_length: Option<u64>,
    #[serde(default)]
    pub pricing: Option<Pricing>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pricing {
    pub prompt: String,
    pub completion: String,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct Completion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LlmGateway {
    client: reqwest::Client,
    base_url: String,
    max_input_chars: usize,
}

impl Default for LlmGateway {
    fn default() -> Self {
        Self::new(OPENROUTER_API)
    }
}

impl LlmGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_input_chars: SUMMARY_INPUT_CHARS,
        }
    }

    pub fn with_max_input_chars(mut self, max_input_chars: usize) -> Self {
        self.max_input_chars = max_input_chars;
        self
    }

    /// Send one user message and return the model's raw text output.
    async fn complete(
        &self,
        api_key: &str,
        model_id: &str,
        prompt: String,
    ) -> Result<String, GatewayError> {
        debug!(model = model_id, prompt_chars = prompt.len(), "sending completion");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .header("HTTP-Referer", "https://github.com/threadweaver/threadweaver")
            .header("X-Title", "Thread Weaver")
            .json(&serde_json::json!({
                "model": model_id,
                "messages": [{ "role": "user", "content": prompt }],
                "response_format": { "type": "json_object" }
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "LLM API error: {}", body);
            return Err(GatewayError::Auth {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let completion: Completion = serde_json::from_str(&body)
            .map_err(|e| GatewayError::Parse(format!("invalid completion body: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| GatewayError::Parse("completion has no message content".to_string()))
    }

    /// Cluster a flattened thread into topics and nodes.
    ///
    /// Text beyond the input limit is cut off, not chunked.
    pub async fn summarize(
        &self,
        api_key: &str,
        model_id: &str,
        text: &str,
        source_label: &str,
    ) -> Result<Summary, GatewayError> {
        let content = truncate_chars(text, self.max_input_chars);
        if content.len() < text.len() {
            info!(limit = self.max_input_chars, "thread text truncated for summarization");
        }

        let output = self
            .complete(api_key, model_id, summarize_prompt(source_label, content))
            .await?;
        let summary = parse_summary(&output).map_err(GatewayError::Parse)?;

        info!(
            topics = summary.topics.len(),
            nodes = summary.nodes.len(),
            "summary received"
        );
        Ok(summary)
    }

    /// Answer a question about a thread, possibly proposing nodes missing from `graph`.
    pub async fn chat(
        &self,
        api_key: &str,
        model_id: &str,
        thread_text: &str,
        question: &str,
        graph: &Graph,
    ) -> Result<ChatReply, GatewayError> {
        let snapshot = graph.snapshot_json();
        let prompt = chat_prompt(
            truncate_chars(thread_text, CHAT_THREAD_CHARS),
            truncate_chars(&snapshot, CHAT_GRAPH_CHARS),
            question,
        );

        let output = self.complete(api_key, model_id, prompt).await?;
        let reply = parse_chat(&output).map_err(GatewayError::Parse)?;
        info!(new_nodes = reply.new_nodes.len(), "chat reply received");
        Ok(reply)
    }

    /// Models offered by the API.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, GatewayError> {
        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Auth {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        let list: ModelList = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(format!("invalid model list: {}", e)))?;
        Ok(list.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn completion(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
    }

    #[tokio::test]
    async fn test_summarize_sends_bearer_and_parses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(
                r#"{"topics":[{"id":"t1","title":"A","summary":"s"}],"nodes":[]}"#,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = LlmGateway::new(server.uri());
        let summary = gateway
            .summarize("sk-test", "m", "User: a", "hacker-news")
            .await
            .unwrap();
        assert_eq!(summary.topics[0].title, "A");
    }

    #[tokio::test]
    async fn test_non_success_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = LlmGateway::new(server.uri())
            .summarize("nope", "m", "text", "reddit")
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Auth { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_non_json_content_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("Sure! Here you go")))
            .mount(&server)
            .await;

        let err = LlmGateway::new(server.uri())
            .summarize("k", "m", "text", "reddit")
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Parse(_)));
    }

    #[tokio::test]
    async fn test_summarize_truncates_input() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(r#"{"nodes":[]}"#)))
            .mount(&server)
            .await;

        let gateway = LlmGateway::new(server.uri()).with_max_input_chars(10);
        gateway
            .summarize("k", "m", &"x".repeat(50), "bluesky")
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        let prompt = body["messages"][0]["content"].as_str().unwrap();
        assert!(prompt.contains(&"x".repeat(10)));
        assert!(!prompt.contains(&"x".repeat(11)));
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[tokio::test]
    async fn test_chat_returns_answer_and_nodes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(
                r#"{"answer":"Mostly positive.","newNodes":[{"author":"z","content":"late take"}]}"#,
            )))
            .mount(&server)
            .await;

        let reply = LlmGateway::new(server.uri())
            .chat("k", "m", "thread", "How did people feel?", &Graph::default())
            .await
            .unwrap();
        assert_eq!(reply.answer, "Mostly positive.");
        assert_eq!(reply.new_nodes[0].author.as_deref(), Some("z"));
    }

    #[tokio::test]
    async fn test_list_models() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "id": "a/b", "name": "B", "context_length": 8192,
                           "pricing": { "prompt": "0.1", "completion": "0.2" } }]
            })))
            .mount(&server)
            .await;

        let models = LlmGateway::new(server.uri()).list_models().await.unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].context_length, Some(8192));
    }
}
