pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod fs;
pub mod gateway;
pub mod graph;
pub mod history;
pub mod layout;
pub mod model;
pub mod output;
pub mod source;
pub mod style;
pub mod view;

pub use api::{
    Answer, DocumentOrigin, WeaveError, Woven, ask, chat, fetch_thread, layout_summary,
    open_document, summarize_thread, weave,
};
pub use app::{AppState, AppStateError, Status};
pub use cli::Cli;
pub use commands::{
    CommandContext, cmd_chat, cmd_fetch, cmd_history, cmd_init, cmd_models, cmd_serve, cmd_weave,
};
pub use config::Config;
pub use gateway::LlmGateway;
pub use history::{HistoryEntry, HistoryStore, NewHistoryEntry};
pub use layout::{RadialLayout, build_graph, merge_nodes};
pub use model::{Graph, RawNode, Summary, ThreadContent, Topic};
pub use output::GraphDocument;
pub use source::ThreadFetcher;
