use crate::cli::{HistoryAction, HistoryArgs};
use crate::history::{HistoryEntry, now_millis};
use crate::output::GraphDocument;
use crate::style;

use super::{CommandContext, emit_document};

/// "5m ago" style age of a millisecond timestamp.
fn age(timestamp: u64, now: u64) -> String {
    let secs = now.saturating_sub(timestamp) / 1000;
    match secs {
        0..60 => "just now".to_string(),
        60..3600 => format!("{}m ago", secs / 60),
        3600..86_400 => format!("{}h ago", secs / 3600),
        _ => format!("{}d ago", secs / 86_400),
    }
}

fn print_entry(entry: &HistoryEntry, now: u64) {
    let title = if entry.title.is_empty() {
        &entry.url
    } else {
        &entry.title
    };
    println!("{}  {}", entry.id, title);
    println!(
        "    {} | {} | {} topics, {} comments | {}",
        entry.source,
        age(entry.timestamp, now),
        entry.topic_count,
        entry.comment_count,
        entry.model_id
    );
}

pub fn cmd_history(args: HistoryArgs, ctx: &CommandContext) -> i32 {
    let store = ctx.history();

    match args.action.unwrap_or(HistoryAction::List) {
        HistoryAction::List => {
            let entries = store.all();
            if entries.is_empty() {
                style::hint("No saved threads yet. Run `threadweaver weave <URL>` first.");
                return 0;
            }
            style::header(&format!("{} saved thread(s)", entries.len()));
            let now = now_millis();
            for entry in &entries {
                print_entry(entry, now);
            }
            0
        }
        HistoryAction::Show { id, format } => {
            let Some(entry) = store.get(&id) else {
                style::error(&format!("No history entry with id {}", id));
                return 1;
            };
            let document = GraphDocument::from(entry);
            emit_document(&document, format, None)
        }
        HistoryAction::Delete { id } => match store.delete(&id) {
            Ok(remaining) => {
                style::success(&format!("Deleted {} ({} left)", id, remaining.len()));
                0
            }
            Err(e) => {
                style::error(&e.to_string());
                1
            }
        },
        HistoryAction::Clear => match store.clear() {
            Ok(()) => {
                style::success("History cleared");
                0
            }
            Err(e) => {
                style::error(&e.to_string());
                1
            }
        },
    }
}
