use crate::model::{NodeKind, ThreadNode};
use crate::output::{GraphDocument, OutputFormatter};
use crate::view::feed;
use std::io::Write;

/// Feed-style outline: one section per topic with its comments as bullets.
pub struct MarkdownOutput {
    pub include_links: bool,
}

impl MarkdownOutput {
    pub fn new() -> Self {
        Self {
            include_links: true,
        }
    }

    pub fn without_links(mut self) -> Self {
        self.include_links = false;
        self
    }

    fn write_comment<W: Write>(&self, node: &ThreadNode, writer: &mut W) -> std::io::Result<()> {
        let author = node.data.author.as_deref().unwrap_or(&node.data.label);
        let content = node.data.content.as_deref().unwrap_or_default();
        write!(writer, "- **{}**", author)?;
        if let Some(sentiment) = node.data.sentiment {
            write!(writer, " _({})_", sentiment)?;
        }
        write!(writer, ": {}", content.replace('\n', " "))?;
        if self.include_links {
            if let Some(link) = &node.data.link {
                write!(writer, " [link]({})", link)?;
            }
        }
        writeln!(writer)
    }
}

impl Default for MarkdownOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for MarkdownOutput {
    fn format<W: Write>(&self, document: &GraphDocument, writer: &mut W) -> std::io::Result<()> {
        let graph = &document.graph;
        writeln!(writer, "# {}\n", document.title)?;
        writeln!(
            writer,
            "Source: {} | {} | model `{}`",
            document.source, document.url, document.model
        )?;
        writeln!(
            writer,
            "{} topics, {} comments\n",
            graph.count(NodeKind::Topic),
            graph.count(NodeKind::Comment)
        )?;

        for section in feed(graph) {
            let is_root = section.head.kind == NodeKind::Root;
            if is_root && section.comments.is_empty() {
                continue;
            }

            if is_root {
                writeln!(writer, "## Added in chat\n")?;
            } else {
                writeln!(writer, "## {}\n", section.head.data.label)?;
                let summary = section.head.data.content.as_deref().unwrap_or_default();
                if !summary.is_empty() {
                    writeln!(writer, "{}\n", summary)?;
                }
            }

            if section.comments.is_empty() {
                writeln!(writer, "_No comments._\n")?;
                continue;
            }
            for comment in &section.comments {
                self.write_comment(comment, writer)?;
            }
            writeln!(writer)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{build_graph, merge_nodes};
    use crate::model::{RawNode, Sentiment, SourceKind, Topic};
    use crate::output::render_to_string;

    fn document() -> GraphDocument {
        let topics = vec![Topic {
            id: "t1".into(),
            title: "Memory safety".into(),
            summary: "Why the borrow checker matters".into(),
        }];
        let mut node = RawNode::new("n1", "t1", "It caught my bug").with_author("alice");
        node.sentiment = Some(Sentiment::Positive);
        node.link = Some("https://example.com/c/1".into());
        let graph = merge_nodes(
            &build_graph(&topics, &[node]),
            &[RawNode::new("x", "t1", "late insight")],
        );
        GraphDocument {
            title: "Rust thread".into(),
            source: SourceKind::Reddit,
            url: "https://reddit.com/r/rust/comments/abc".into(),
            model: "m".into(),
            graph,
        }
    }

    #[test]
    fn test_outline_sections() {
        let md = render_to_string(&MarkdownOutput::new(), &document()).unwrap();
        assert!(md.starts_with("# Rust thread\n"));
        assert!(md.contains("1 topics, 2 comments"));
        assert!(md.contains("## Added in chat"));
        assert!(md.contains("## Memory safety\n\nWhy the borrow checker matters"));
        assert!(md.contains(
            "- **alice** _(positive)_: It caught my bug [link](https://example.com/c/1)"
        ));
        assert!(md.contains("- **AI Insight**: late insight"));
    }

    #[test]
    fn test_without_links() {
        let md = render_to_string(&MarkdownOutput::new().without_links(), &document()).unwrap();
        assert!(!md.contains("[link]"));
    }
}
