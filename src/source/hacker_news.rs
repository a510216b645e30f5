use super::{SourceError, ThreadFetcher};
use crate::model::{SourceKind, ThreadContent, comment_block};
use serde::Deserialize;
use std::collections::VecDeque;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct Item {
    id: u64,
    #[serde(default)]
    by: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    kids: Vec<u64>,
    #[serde(default)]
    deleted: bool,
    #[serde(default)]
    dead: bool,
}

impl Item {
    fn is_visible(&self) -> bool {
        !self.deleted && !self.dead
    }
}

/// Item id from a bare number or a `news.ycombinator.com/item?id=` URL.
pub(super) fn item_id(input: &str) -> Result<String, SourceError> {
    let trimmed = input.trim();
    if !trimmed.contains("ycombinator.com") {
        return Ok(trimmed.to_string());
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };
    let url = reqwest::Url::parse(&with_scheme).map_err(|e| SourceError::Malformed {
        platform: SourceKind::HackerNews,
        message: format!("invalid URL {}: {}", trimmed, e),
    })?;

    url.query_pairs()
        .find(|(k, _)| k == "id")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SourceError::Malformed {
            platform: SourceKind::HackerNews,
            message: format!("no item id in {}", trimmed),
        })
}

async fn fetch_item(fetcher: &ThreadFetcher, id: &str) -> Result<Option<Item>, SourceError> {
    let url = format!("{}/item/{}.json", fetcher.endpoints.hacker_news, id);
    fetcher.get_json(SourceKind::HackerNews, &url).await
}

pub(super) async fn fetch(
    fetcher: &ThreadFetcher,
    input: &str,
) -> Result<ThreadContent, SourceError> {
    let id = item_id(input)?;
    let root = fetch_item(fetcher, &id)
        .await?
        .ok_or_else(|| SourceError::NotFound(format!("HN item {} not found", id)))?;

    let limits = fetcher.limits;
    let mut queue: VecDeque<(u64, usize)> = root.kids.iter().map(|k| (*k, 1)).collect();
    let mut blocks = Vec::new();

    // Breadth-first; skipped items are dequeued but never counted.
    while blocks.len() < limits.max_comments {
        let Some((kid, depth)) = queue.pop_front() else {
            break;
        };
        let Some(item) = fetch_item(fetcher, &kid.to_string()).await? else {
            debug!(id = kid, "skipping missing item");
            continue;
        };
        if !item.is_visible() {
            debug!(id = kid, "skipping deleted or dead item");
            continue;
        }

        blocks.push(comment_block(
            item.by.as_deref().unwrap_or("anon"),
            item.text.as_deref().unwrap_or_default(),
            &format!("https://news.ycombinator.com/item?id={}", item.id),
        ));
        if depth < limits.max_depth {
            queue.extend(item.kids.iter().map(|k| (*k, depth + 1)));
        }
    }

    Ok(ThreadContent {
        source: SourceKind::HackerNews,
        title: root
            .title
            .unwrap_or_else(|| format!("Hacker News item {}", root.id)),
        text: blocks.join("\n\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_from_number() {
        assert_eq!(item_id(" 8863 ").unwrap(), "8863");
    }

    #[test]
    fn test_item_id_from_url() {
        assert_eq!(
            item_id("https://news.ycombinator.com/item?id=42&p=2").unwrap(),
            "42"
        );
        assert_eq!(item_id("news.ycombinator.com/item?id=7").unwrap(), "7");
    }

    #[test]
    fn test_item_id_missing_from_url() {
        assert!(matches!(
            item_id("https://news.ycombinator.com/news"),
            Err(SourceError::Malformed { .. })
        ));
    }
}
