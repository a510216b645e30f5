//! The live session: current thread, its graph and the viewer's selection.
//!
//! All mutation goes through transition methods. Network work happens outside
//! this type; callers mark the start with a `begin_*` method, release any lock,
//! and report the outcome with [`AppState::complete`], [`AppState::augment`] or
//! [`AppState::fail`].

use crate::layout::merge_nodes;
use crate::model::{Graph, NodeKind, RawNode, SourceKind, ThreadContent};
use crate::view::{self, MAX_DENSITY, RenderedGraph, ViewMode, clamp_density};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Idle,
    Fetching,
    Summarizing,
    Chatting,
    Complete,
    Error,
}

impl Status {
    pub fn is_busy(self) -> bool {
        matches!(self, Status::Fetching | Status::Summarizing | Status::Chatting)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum AppStateError {
    #[error("Another operation is in progress ({0:?})")]
    Busy(Status),

    #[error("There is no graph to chat about yet")]
    NoGraph,
}

#[derive(Debug, Clone)]
pub struct AppState {
    status: Status,
    input: Option<String>,
    thread: Option<ThreadContent>,
    graph: Graph,
    error: Option<String>,
    selected: Option<String>,
    density: u8,
    view_mode: ViewMode,
}

/// Snapshot served to the viewer.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub status: Status,
    pub error: Option<String>,
    pub input: Option<String>,
    pub source: Option<SourceKind>,
    pub title: Option<String>,
    pub topics: usize,
    pub comments: usize,
    pub selected: Option<String>,
    pub density: u8,
    pub view_mode: ViewMode,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            status: Status::Idle,
            input: None,
            thread: None,
            graph: Graph::default(),
            error: None,
            selected: None,
            density: MAX_DENSITY,
            view_mode: ViewMode::Map,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A finished session, e.g. restored from history.
    pub fn with_graph(graph: Graph, thread: Option<ThreadContent>) -> Self {
        Self {
            status: Status::Complete,
            thread,
            graph,
            ..Self::default()
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_busy(&self) -> bool {
        self.status.is_busy()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn thread(&self) -> Option<&ThreadContent> {
        self.thread.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn density(&self) -> u8 {
        self.density
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    fn ensure_idle(&self) -> Result<(), AppStateError> {
        if self.is_busy() {
            return Err(AppStateError::Busy(self.status));
        }
        Ok(())
    }

    pub fn begin_fetch(&mut self, input: &str) -> Result<(), AppStateError> {
        self.ensure_idle()?;
        self.status = Status::Fetching;
        self.input = Some(input.to_string());
        self.error = None;
        self.selected = None;
        Ok(())
    }

    pub fn begin_summarize(&mut self, thread: ThreadContent) {
        self.status = Status::Summarizing;
        self.thread = Some(thread);
    }

    /// Replace the graph with a freshly built one.
    pub fn complete(&mut self, graph: Graph) {
        self.graph = graph;
        self.status = Status::Complete;
        self.selected = None;
        self.error = None;
    }

    pub fn begin_chat(&mut self) -> Result<(), AppStateError> {
        self.ensure_idle()?;
        if self.graph.nodes.is_empty() {
            return Err(AppStateError::NoGraph);
        }
        self.status = Status::Chatting;
        self.error = None;
        Ok(())
    }

    /// Merge chat-proposed nodes into the live graph; returns how many were added.
    pub fn augment(&mut self, new_nodes: &[RawNode]) -> usize {
        let before = self.graph.nodes.len();
        if !new_nodes.is_empty() {
            self.graph = merge_nodes(&self.graph, new_nodes);
        }
        self.status = Status::Complete;
        self.graph.nodes.len() - before
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = Status::Error;
        self.error = Some(message.into());
    }

    /// Select a node by id; unknown ids clear the selection. Returns whether a
    /// node is now selected.
    pub fn select(&mut self, id: Option<&str>) -> bool {
        self.selected = id
            .filter(|id| self.graph.node(id).is_some())
            .map(str::to_string);
        self.selected.is_some()
    }

    pub fn set_density(&mut self, density: u8) {
        self.density = clamp_density(density);
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Text given to the chat model: the fetched thread when available, else
    /// the graph's own comments.
    pub fn thread_context(&self) -> String {
        match &self.thread {
            Some(thread) if !thread.text.is_empty() => thread.text.clone(),
            _ => self.graph.context_text(),
        }
    }

    pub fn render(&self) -> RenderedGraph {
        view::render(&self.graph, self.selected.as_deref(), self.density)
    }

    pub fn report(&self) -> StatusReport {
        StatusReport {
            status: self.status,
            error: self.error.clone(),
            input: self.input.clone(),
            source: self.thread.as_ref().map(|t| t.source),
            title: self.thread.as_ref().map(|t| t.title.clone()),
            topics: self.graph.count(NodeKind::Topic),
            comments: self.graph.count(NodeKind::Comment),
            selected: self.selected.clone(),
            density: self.density,
            view_mode: self.view_mode,
        }
    }
}
