mod assets;
mod routes;

pub use routes::{ServerState, router, serve};

use crate::app::AppState;
use crate::output::GraphDocument;
use crate::view::{MAX_DENSITY, feed, render};
use assets::{INDEX_HTML, STATIC_DATA_PLACEHOLDER};

/// Standalone viewer page with the document inlined; selection and density
/// work offline, chat is hidden.
pub fn generate_static_html(document: &GraphDocument) -> String {
    let graph = &document.graph;
    let report = AppState::with_graph(graph.clone(), None).report();
    let data = serde_json::json!({
        "rendered": render(graph, None, MAX_DENSITY),
        "feed": feed(graph),
        "status": {
            "title": document.title,
            "topics": report.topics,
            "comments": report.comments,
        },
    });
    // Keep a `</script>` inside comment text from closing the tag.
    let inline = data.to_string().replace("</", "<\\/");
    INDEX_HTML.replacen(STATIC_DATA_PLACEHOLDER, &inline, 1)
}
