//! Prompt templates for the summarize and chat calls.

pub const SUMMARY_INPUT_CHARS: usize = 150_000;
pub const CHAT_THREAD_CHARS: usize = 50_000;
pub const CHAT_GRAPH_CHARS: usize = 10_000;

/// Longest prefix of `text` with at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn summarize_prompt(source_label: &str, content: &str) -> String {
    format!(
        r#"You are an expert discussion summarizer. I have a thread from {source_label}.
Your goal is to organize this conversation into a COMPREHENSIVE radial mind-map structure.

CRITICAL INSTRUCTIONS:
1. Extract AS MANY distinct topics and key viewpoints as possible. Aim for 5-10 topics if the thread is long.
2. For each topic, extract MULTIPLE specific comments or quotes (child nodes).
3. Make "who said what" clear.
4. The structure should feel like a dense, rich web of thoughts, not a sparse summary.

OUTPUT FORMAT:
Return a JSON object with this structure (no markdown fences):
{{
  "topics": [
    {{ "id": "topic-1", "title": "Main Topic Name", "summary": "Brief summary of this aspect" }}
  ],
  "nodes": [
    {{
      "id": "node-1",
      "topicId": "topic-1",
      "author": "user1",
      "content": "Direct quote or detailed summary of their argument.",
      "sentiment": "insightful",
      "link": "https://... (if available in text, else null)"
    }}
  ]
}}
"sentiment" is one of: positive, negative, neutral, insightful, controversial.

CONTENT:
{content}
"#
    )
}

pub fn chat_prompt(thread: &str, graph: &str, question: &str) -> String {
    format!(
        r#"You are an intelligent assistant helping a user understand a discussion thread.

CONTEXT:
The user is viewing a visualization of this thread:
{thread}

CURRENT GRAPH NODES:
{graph}

USER QUESTION:
"{question}"

INSTRUCTIONS:
1. Answer the user's question directly and concisely based on the thread content.
2. If the question reveals a new perspective, detail, or comment that is NOT already in the CURRENT GRAPH NODES, add it to "newNodes".
3. If no new nodes are needed, return an empty array.

OUTPUT FORMAT:
Return a JSON object:
{{
  "answer": "Your text answer here...",
  "newNodes": [
    {{
      "id": "new-node-unique-id",
      "topicId": "existing-topic-id-or-null",
      "author": "user",
      "content": "quote or summary",
      "sentiment": "neutral",
      "link": "..."
    }}
  ]
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("", 0), "");
    }

    #[test]
    fn test_summarize_prompt_embeds_source_and_content() {
        let prompt = summarize_prompt("reddit", "User: a\nText: b");
        assert!(prompt.contains("thread from reddit"));
        assert!(prompt.ends_with("User: a\nText: b\n"));
        assert!(prompt.contains(r#""topicId": "topic-1""#));
    }
}
