//! Library API for threadweaver.
//!
//! These functions run the whole pipeline (fetch, summarize, lay out, chat)
//! and return `Result`s, unlike the CLI commands which print and return exit
//! codes.
//!
//! # Example
//!
//! ```no_run
//! use threadweaver::{Config, weave};
//!
//! # async fn run() -> Result<(), threadweaver::WeaveError> {
//! let config = Config::default();
//! let woven = weave("https://news.ycombinator.com/item?id=8863", &config).await?;
//! println!("{} nodes", woven.document.graph.nodes.len());
//! # Ok(())
//! # }
//! ```

use crate::app::AppStateError;
use crate::config::{Config, ConfigError};
use crate::fs::FileSystem;
use crate::gateway::{GatewayError, LlmGateway};
use crate::history::{HistoryError, HistoryStore};
use crate::layout::{RadialLayout, merge_nodes};
use crate::model::{ChatReply, Graph, Summary, ThreadContent};
use crate::output::GraphDocument;
use crate::source::{SourceError, ThreadFetcher};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum WeaveError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("History error: {0}")]
    History(#[from] HistoryError),

    #[error(transparent)]
    State(#[from] AppStateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid graph document: {0}")]
    Document(#[from] serde_json::Error),

    /// No API key in the config file or environment.
    #[error("No API key configured (set THREADWEAVER_API_KEY or [llm] api_key)")]
    MissingApiKey,

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Result of [`weave`].
#[derive(Debug, Clone)]
pub struct Woven {
    pub document: GraphDocument,
    pub thread: ThreadContent,
    /// Summary nodes that named no known topic and were left out of the graph.
    pub unplaced: usize,
}

/// Result of [`ask`].
#[derive(Debug, Clone)]
pub struct Answer {
    pub answer: String,
    pub added: usize,
    pub graph: Graph,
}

pub fn api_key(config: &Config) -> Result<&str, WeaveError> {
    config
        .llm
        .api_key
        .as_deref()
        .ok_or(WeaveError::MissingApiKey)
}

pub fn fetcher(config: &Config) -> ThreadFetcher {
    ThreadFetcher::new(config.sources.endpoints.clone(), config.sources.limits)
}

pub fn gateway(config: &Config) -> LlmGateway {
    LlmGateway::new(&config.llm.base_url).with_max_input_chars(config.llm.max_input_chars)
}

/// Fetch and flatten a thread from any supported platform.
pub async fn fetch_thread(input: &str, config: &Config) -> Result<ThreadContent, WeaveError> {
    Ok(fetcher(config).fetch(input).await?)
}

/// Ask the configured model to cluster a thread into topics and nodes.
pub async fn summarize_thread(
    thread: &ThreadContent,
    config: &Config,
) -> Result<Summary, WeaveError> {
    let key = api_key(config)?;
    let summary = gateway(config)
        .summarize(key, &config.llm.model, &thread.text, thread.source.as_str())
        .await?;
    Ok(summary)
}

/// Lay out a summary with the configured radial geometry.
pub fn layout_summary(summary: &Summary, layout: &RadialLayout) -> (Graph, usize) {
    let unplaced = RadialLayout::unplaced(&summary.topics, &summary.nodes).len();
    if unplaced > 0 {
        warn!(unplaced, "summary nodes reference unknown topics and were dropped");
    }
    (layout.build(&summary.topics, &summary.nodes), unplaced)
}

/// Fetch, summarize and lay out a thread in one go.
pub async fn weave(input: &str, config: &Config) -> Result<Woven, WeaveError> {
    // Fail before any network call when the model cannot be reached anyway.
    api_key(config)?;

    let thread = fetch_thread(input, config).await?;
    let summary = summarize_thread(&thread, config).await?;
    let (graph, unplaced) = layout_summary(&summary, &config.layout);

    info!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "graph built"
    );

    Ok(Woven {
        document: GraphDocument {
            title: thread.title.clone(),
            source: thread.source,
            url: input.to_string(),
            model: config.llm.model.clone(),
            graph,
        },
        thread,
        unplaced,
    })
}

/// One chat round-trip without touching the graph.
pub async fn chat(
    question: &str,
    thread_text: &str,
    graph: &Graph,
    config: &Config,
) -> Result<ChatReply, WeaveError> {
    let key = api_key(config)?;
    let reply = gateway(config)
        .chat(key, &config.llm.model, thread_text, question, graph)
        .await?;
    Ok(reply)
}

/// Ask a question and merge any nodes the model proposes into a copy of `graph`.
pub async fn ask(
    question: &str,
    thread_text: &str,
    graph: &Graph,
    config: &Config,
) -> Result<Answer, WeaveError> {
    let reply = chat(question, thread_text, graph, config).await?;
    let merged = merge_nodes(graph, &reply.new_nodes);
    Ok(Answer {
        answer: reply.answer,
        added: merged.nodes.len() - graph.nodes.len(),
        graph: merged,
    })
}

/// Where a previously woven graph came from.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentOrigin {
    File(PathBuf),
    History(String),
}

/// Load a graph document from a JSON file, or else from a history entry id.
pub fn open_document(
    from: &str,
    fs: &dyn FileSystem,
    history: &HistoryStore<'_>,
) -> Result<(GraphDocument, DocumentOrigin), WeaveError> {
    let path = Path::new(from);
    if fs.exists(path) {
        let content = fs.read_to_string(path)?;
        let document = serde_json::from_str(&content)?;
        return Ok((document, DocumentOrigin::File(path.to_path_buf())));
    }

    let entry = history
        .get(from)
        .ok_or_else(|| WeaveError::PathNotFound(path.to_path_buf()))?;
    let id = entry.id.clone();
    Ok((entry.into(), DocumentOrigin::History(id)))
}
