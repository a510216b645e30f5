use crate::api::{self, WeaveError};
use crate::app::AppState;
use crate::cli::WeaveArgs;
use crate::config::Config;
use crate::fs::{FileSystem, default_fs};
use crate::graph::{ServerState, generate_static_html, serve};
use crate::history::NewHistoryEntry;
use crate::model::NodeKind;
use crate::output::GraphDocument;
use crate::style;

use super::{CommandContext, emit_document, runtime};

async fn run(input: &str, config: &Config, app: &mut AppState) -> Result<usize, WeaveError> {
    app.begin_fetch(input)?;

    style::status(&format!("Fetching {}", style::url(input)));
    let thread = match api::fetch_thread(input, config).await {
        Ok(thread) => thread,
        Err(e) => {
            app.fail(e.to_string());
            return Err(e);
        }
    };

    style::status(&format!(
        "Summarizing \"{}\" with {}",
        thread.title, config.llm.model
    ));
    app.begin_summarize(thread.clone());
    let summary = match api::summarize_thread(&thread, config).await {
        Ok(summary) => summary,
        Err(e) => {
            app.fail(e.to_string());
            return Err(e);
        }
    };

    let (graph, unplaced) = api::layout_summary(&summary, &config.layout);
    app.complete(graph);
    Ok(unplaced)
}

pub fn cmd_weave(args: WeaveArgs, ctx: &CommandContext) -> i32 {
    if let Err(code) = ctx.require_api_key() {
        return code;
    }
    let config = ctx.config_with_model(args.model.as_deref());
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    let mut app = AppState::new();
    let unplaced = match rt.block_on(run(&args.input, &config, &mut app)) {
        Ok(unplaced) => unplaced,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };

    let Some(thread) = app.thread().cloned() else {
        style::error("No thread was fetched");
        return 1;
    };
    let graph = app.graph();

    eprintln!("{}", style::metric("topics", graph.count(NodeKind::Topic)));
    eprintln!("{}", style::metric("comments", graph.count(NodeKind::Comment)));
    if unplaced > 0 {
        style::warning(&format!(
            "{} summary node(s) named an unknown topic and were left out",
            unplaced
        ));
    }

    let document = GraphDocument {
        title: thread.title.clone(),
        source: thread.source,
        url: args.input.clone(),
        model: config.llm.model.clone(),
        graph: graph.clone(),
    };

    let mut history_id = None;
    if !args.no_history {
        let saved = ctx.history().save(NewHistoryEntry {
            url: document.url.clone(),
            title: document.title.clone(),
            source: document.source,
            graph: document.graph.clone(),
            model_id: document.model.clone(),
        });
        match saved {
            Ok(entry) => {
                eprintln!("{}", style::metric("history id", &entry.id));
                history_id = Some(entry.id);
            }
            Err(e) => style::warning(&format!("Could not save history: {}", e)),
        }
    }

    if let Some(export_path) = &args.export {
        if let Err(e) = default_fs().write(export_path, &generate_static_html(&document)) {
            style::error(&format!("Failed to write export file: {}", e));
            return 1;
        }
        style::success(&format!("Graph exported to: {}", style::path(export_path)));
    }

    if args.serve {
        let mut state = ServerState::new(app, config);
        if let Some(id) = history_id {
            state = state.with_history_id(id);
        }
        if let Err(e) = rt.block_on(serve(state, args.port, args.open)) {
            style::error(&format!("Server failed: {}", e));
            return 1;
        }
        return 0;
    }

    if args.export.is_some() && args.output.is_none() {
        return 0;
    }
    emit_document(&document, args.format, args.output.as_deref())
}
