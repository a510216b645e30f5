use super::assets::INDEX_HTML;
use crate::api;
use crate::app::{AppState, AppStateError};
use crate::config::Config;
use crate::fs::default_fs;
use crate::history::HistoryStore;
use crate::model::Graph;
use crate::style;
use crate::view::{ViewMode, feed};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Shared across handlers. The session lock is never held across a model call.
pub struct ServerState {
    app: Mutex<AppState>,
    config: Config,
    history_id: Option<String>,
}

impl ServerState {
    pub fn new(app: AppState, config: Config) -> Self {
        Self {
            app: Mutex::new(app),
            config,
            history_id: None,
        }
    }

    /// Write chat additions back to this history entry.
    pub fn with_history_id(mut self, id: impl Into<String>) -> Self {
        self.history_id = Some(id.into());
        self
    }
}

#[derive(Debug, Deserialize)]
struct GraphQuery {
    selected: Option<String>,
    density: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    question: String,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    answer: String,
    added: usize,
}

struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<AppStateError> for ApiError {
    fn from(e: AppStateError) -> Self {
        let status = match e {
            AppStateError::Busy(_) => StatusCode::CONFLICT,
            AppStateError::NoGraph => StatusCode::BAD_REQUEST,
        };
        Self::new(status, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

pub fn router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/graph", get(graph_handler))
        .route("/api/feed", get(feed_handler))
        .route("/api/status", get(status_handler))
        .route("/api/chat", post(chat_handler))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server for the viewer.
pub async fn serve(
    state: ServerState,
    port: u16,
    open_browser: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(Arc::new(state));

    let addr = format!("127.0.0.1:{}", port);
    let url = format!("http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    style::header("Thread Weaver viewer");
    style::status(&format!("Open in browser: {}", style::url(&url)));
    style::hint("Press Ctrl+C to stop");

    if open_browser {
        if let Err(e) = open::that(&url) {
            style::warning(&format!("Could not open browser: {}", e));
        }
    }

    axum::serve(listener, app).await?;
    Ok(())
}

async fn index_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}

async fn graph_handler(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<GraphQuery>,
) -> impl IntoResponse {
    let mut app = state.app.lock().await;
    app.set_view_mode(ViewMode::Map);
    if let Some(density) = query.density {
        app.set_density(density);
    }
    app.select(query.selected.as_deref());
    Json(app.render())
}

async fn feed_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut app = state.app.lock().await;
    app.set_view_mode(ViewMode::Feed);
    serde_json::to_value(feed(app.graph()))
        .map(Json)
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

async fn status_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(state.app.lock().await.report())
}

async fn chat_handler(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let question = request.question.trim();
    if question.is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Question is empty"));
    }
    if state.config.llm.api_key.is_none() {
        return Err(ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            api::WeaveError::MissingApiKey.to_string(),
        ));
    }

    let (graph, thread_text) = {
        let mut app = state.app.lock().await;
        app.begin_chat()?;
        (app.graph().clone(), app.thread_context())
    };

    info!(question, "chat request");
    // Runs to completion even if the client disconnects.
    let task = tokio::spawn(complete_chat(
        Arc::clone(&state),
        question.to_string(),
        thread_text,
        graph,
    ));
    let reply = match task.await {
        Ok(result) => result?,
        Err(e) => {
            state.app.lock().await.fail("chat was interrupted");
            return Err(ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    Ok(Json(reply))
}

/// Run the model call and settle the session state with its outcome.
async fn complete_chat(
    state: Arc<ServerState>,
    question: String,
    thread_text: String,
    graph: Graph,
) -> Result<ChatResponse, ApiError> {
    let result = api::chat(&question, &thread_text, &graph, &state.config).await;

    let mut app = state.app.lock().await;
    let reply = match result {
        Ok(reply) => reply,
        Err(e) => {
            warn!("chat failed: {}", e);
            app.fail(e.to_string());
            return Err(ApiError::new(StatusCode::BAD_GATEWAY, e.to_string()));
        }
    };
    let added = app.augment(&reply.new_nodes);
    let snapshot = (added > 0).then(|| app.graph().clone());
    drop(app);

    if let (Some(id), Some(graph)) = (state.history_id.clone(), snapshot) {
        persist_graph(&state.config, id, graph).await;
    }

    Ok(ChatResponse {
        answer: reply.answer,
        added,
    })
}

async fn persist_graph(config: &Config, id: String, graph: Graph) {
    let path = config.history.path.clone();
    let max_entries = config.history.max_entries;
    let written = tokio::task::spawn_blocking(move || {
        HistoryStore::new(default_fs(), path, max_entries).update_graph(&id, &graph)
    })
    .await;
    match written {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => warn!("could not persist chat nodes: {}", e),
        Err(e) => warn!("history write task failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::build_graph;
    use crate::model::{ROOT_ID, RawNode, Topic};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session() -> AppState {
        let topics = vec![Topic {
            id: "t".into(),
            title: "T".into(),
            summary: String::new(),
        }];
        let nodes: Vec<RawNode> = (0..4)
            .map(|i| RawNode::new(format!("n{}", i), "t", format!("c{}", i)))
            .collect();
        AppState::with_graph(build_graph(&topics, &nodes), None)
    }

    async fn spawn(state: ServerState) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(Arc::new(state))).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_graph_endpoint_applies_density_and_selection() {
        let base = spawn(ServerState::new(session(), Config::default())).await;

        let body: serde_json::Value = reqwest::get(format!(
            "{}/api/graph?density=50&selected={}",
            base, ROOT_ID
        ))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

        assert_eq!(body["density"], 50);
        assert_eq!(body["hidden_comments"], 2);
        assert_eq!(body["selected"], ROOT_ID);
        assert_eq!(body["nodes"].as_array().unwrap().len(), 4);

        let status: serde_json::Value = reqwest::get(format!("{}/api/status", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(status["density"], 50);
        assert_eq!(status["comments"], 4);
    }

    #[tokio::test]
    async fn test_chat_without_key_is_unavailable() {
        let base = spawn(ServerState::new(session(), Config::default())).await;
        let response = reqwest::Client::new()
            .post(format!("{}/api/chat", base))
            .json(&serde_json::json!({ "question": "why?" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 503);
    }

    #[tokio::test]
    async fn test_chat_merges_nodes() {
        let llm = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "content":
                    r#"{"answer":"Two camps.","newNodes":[{"author":"eve","content":"missed point"}]}"#
                } }]
            })))
            .mount(&llm)
            .await;

        let mut config = Config::default();
        config.llm.api_key = Some("k".into());
        config.llm.base_url = llm.uri();
        let base = spawn(ServerState::new(session(), config)).await;

        let body: serde_json::Value = reqwest::Client::new()
            .post(format!("{}/api/chat", base))
            .json(&serde_json::json!({ "question": "Who disagreed?" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["answer"], "Two camps.");
        assert_eq!(body["added"], 1);

        let feed: serde_json::Value = reqwest::get(format!("{}/api/feed", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(feed[0]["comments"][0]["data"]["author"], "eve");

        let status: serde_json::Value = reqwest::get(format!("{}/api/status", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(status["status"], "complete");
        assert_eq!(status["viewMode"], "feed");
        assert_eq!(status["comments"], 5);
    }

    #[tokio::test]
    async fn test_gateway_failure_is_bad_gateway() {
        let llm = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&llm)
            .await;

        let mut config = Config::default();
        config.llm.api_key = Some("k".into());
        config.llm.base_url = llm.uri();
        let base = spawn(ServerState::new(session(), config)).await;

        let response = reqwest::Client::new()
            .post(format!("{}/api/chat", base))
            .json(&serde_json::json!({ "question": "x" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 502);
    }

    fn chat_reply() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{ "message": { "content":
                r#"{"answer":"Late.","newNodes":[{"content":"slow insight"}]}"#
            } }]
        }))
    }

    #[tokio::test]
    async fn test_dropped_chat_request_still_settles_session() {
        let llm = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(chat_reply().set_delay(std::time::Duration::from_millis(800)))
            .mount(&llm)
            .await;

        let mut config = Config::default();
        config.llm.api_key = Some("k".into());
        config.llm.base_url = llm.uri();
        let base = spawn(ServerState::new(session(), config)).await;

        let impatient = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(100))
            .build()
            .unwrap();
        let dropped = impatient
            .post(format!("{}/api/chat", base))
            .json(&serde_json::json!({ "question": "first" }))
            .send()
            .await;
        assert!(dropped.is_err());

        let mut status = serde_json::Value::Null;
        for _ in 0..50 {
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            status = reqwest::get(format!("{}/api/status", base))
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            if status["status"] != "chatting" {
                break;
            }
        }
        assert_eq!(status["status"], "complete");
        assert_eq!(status["comments"], 5);

        let retry = reqwest::Client::new()
            .post(format!("{}/api/chat", base))
            .json(&serde_json::json!({ "question": "second" }))
            .send()
            .await
            .unwrap();
        assert_eq!(retry.status().as_u16(), 200);
    }

    #[tokio::test]
    async fn test_chat_nodes_are_written_to_history() {
        use crate::history::NewHistoryEntry;

        let dir = tempfile::tempdir().unwrap();
        let history_path = dir.path().join("history.json");
        let app = session();
        let entry = HistoryStore::new(default_fs(), history_path.clone(), 20)
            .save(NewHistoryEntry {
                url: "https://news.ycombinator.com/item?id=1".into(),
                title: "t".into(),
                source: crate::model::SourceKind::HackerNews,
                graph: app.graph().clone(),
                model_id: "m".into(),
            })
            .unwrap();

        let llm = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(chat_reply())
            .mount(&llm)
            .await;

        let mut config = Config::default();
        config.llm.api_key = Some("k".into());
        config.llm.base_url = llm.uri();
        config.history.path = history_path.clone();
        let base = spawn(ServerState::new(app, config).with_history_id(entry.id.clone())).await;

        let response = reqwest::Client::new()
            .post(format!("{}/api/chat", base))
            .json(&serde_json::json!({ "question": "anything new?" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);

        let saved = HistoryStore::new(default_fs(), history_path, 20)
            .get(&entry.id)
            .unwrap();
        assert_eq!(saved.flow_data.nodes.len(), entry.flow_data.nodes.len() + 1);
    }
}
