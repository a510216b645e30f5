use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    HackerNews,
    Reddit,
    Bluesky,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::HackerNews => "hacker-news",
            SourceKind::Reddit => "reddit",
            SourceKind::Bluesky => "bluesky",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fetched thread flattened into one attributed text document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThreadContent {
    pub source: SourceKind,
    pub title: String,
    pub text: String,
}

/// One `User/Text/Link` block of a flattened thread.
pub fn comment_block(author: &str, text: &str, link: &str) -> String {
    format!("User: {}\nText: {}\nLink: {}", author, text, link)
}
