use crate::api::{self, DocumentOrigin};
use crate::cli::ChatArgs;
use crate::fs::{FileSystem, default_fs};
use crate::style;

use super::{CommandContext, runtime};

pub fn cmd_chat(args: ChatArgs, ctx: &CommandContext) -> i32 {
    if let Err(code) = ctx.require_api_key() {
        return code;
    }
    let config = ctx.config_with_model(args.model.as_deref());
    let history = ctx.history();

    let (mut document, origin) = match api::open_document(&args.from, default_fs(), &history) {
        Ok(found) => found,
        Err(e) => {
            style::error(&e.to_string());
            style::hint("pass a history id (see `threadweaver history`) or a graph JSON file");
            return 1;
        }
    };

    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    // The raw thread is not kept, so the graph's own comments stand in for it.
    let context = document.graph.context_text();
    style::status(&format!("Asking {}", config.llm.model));
    let answer = match rt.block_on(api::ask(&args.question, &context, &document.graph, &config)) {
        Ok(answer) => answer,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };

    let text = format!("{}\n", answer.answer);
    if let Err(e) = style::render_markdown(&text, &mut std::io::stdout()) {
        style::error(&format!("Failed to write answer: {}", e));
        return 1;
    }

    if answer.added == 0 {
        return 0;
    }
    style::section(&format!("{} new node(s)", answer.added));
    let start = answer.graph.nodes.len() - answer.added;
    for node in &answer.graph.nodes[start..] {
        let mood = node
            .data
            .sentiment
            .map(|s| format!(" ({})", style::sentiment(s)))
            .unwrap_or_default();
        println!(
            "- {}{}: {}",
            node.data.label,
            mood,
            node.data.content.as_deref().unwrap_or_default()
        );
    }
    document.graph = answer.graph;

    if let Some(path) = &args.output {
        let json = match serde_json::to_string_pretty(&document) {
            Ok(json) => json,
            Err(e) => {
                style::error(&format!("Failed to serialize graph: {}", e));
                return 1;
            }
        };
        if let Err(e) = default_fs().write(path, &json) {
            style::error(&format!("Failed to write {}: {}", style::path(path), e));
            return 1;
        }
        style::success(&format!("Wrote {}", style::path(path)));
    } else if let DocumentOrigin::History(id) = &origin {
        if let Err(e) = history.update_graph(id, &document.graph) {
            style::error(&e.to_string());
            return 1;
        }
    } else {
        style::hint("use --output to keep the augmented graph");
    }
    0
}
