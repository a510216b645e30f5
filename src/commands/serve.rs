use crate::api::{self, DocumentOrigin};
use crate::app::AppState;
use crate::cli::ServeArgs;
use crate::fs::default_fs;
use crate::graph::{ServerState, serve};
use crate::model::ThreadContent;
use crate::style;

use super::{CommandContext, runtime};

pub fn cmd_serve(args: ServeArgs, ctx: &CommandContext) -> i32 {
    let (document, origin) = match api::open_document(&args.from, default_fs(), &ctx.history()) {
        Ok(found) => found,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };

    if ctx.config.llm.api_key.is_none() {
        style::warning("No API key configured; chat is disabled in the viewer");
    }

    // Only the title survives in a saved document; chat falls back to the graph text.
    let thread = ThreadContent {
        source: document.source,
        title: document.title,
        text: String::new(),
    };
    let app = AppState::with_graph(document.graph, Some(thread));
    let mut state = ServerState::new(app, ctx.config.clone());
    if let DocumentOrigin::History(id) = origin {
        state = state.with_history_id(id);
    }

    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };
    if let Err(e) = rt.block_on(serve(state, args.port, args.open)) {
        style::error(&format!("Server failed: {}", e));
        return 1;
    }
    0
}
