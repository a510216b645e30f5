mod json;
mod markdown;

pub use json::JsonOutput;
pub use markdown::MarkdownOutput;

use crate::model::{Graph, SourceKind};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// A woven thread as written to disk, served and exported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphDocument {
    pub title: String,
    pub source: SourceKind,
    pub url: String,
    pub model: String,
    pub graph: Graph,
}

pub trait OutputFormatter {
    fn format<W: Write>(&self, document: &GraphDocument, writer: &mut W) -> std::io::Result<()>;
}

/// Format into a `String` instead of a writer.
pub fn render_to_string<F: OutputFormatter>(
    formatter: &F,
    document: &GraphDocument,
) -> std::io::Result<String> {
    let mut buffer = Vec::new();
    formatter.format(document, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
