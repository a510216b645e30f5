use super::{SourceError, ThreadFetcher, TraversalLimits};
use crate::model::{SourceKind, ThreadContent, comment_block};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    kind: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct Post {
    #[serde(default)]
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
struct Comment {
    #[serde(default)]
    author: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    permalink: String,
    /// Either a nested listing or an empty string.
    #[serde(default)]
    replies: Value,
}

/// `.json` endpoint path for a thread URL: query and trailing slash dropped.
pub(super) fn json_path(input: &str) -> Result<String, SourceError> {
    let trimmed = input.trim();
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };
    let url = reqwest::Url::parse(&with_scheme).map_err(|e| SourceError::Malformed {
        platform: SourceKind::Reddit,
        message: format!("invalid URL {}: {}", trimmed, e),
    })?;
    Ok(format!("{}.json", url.path().trim_end_matches('/')))
}

fn malformed(message: impl Into<String>) -> SourceError {
    SourceError::Malformed {
        platform: SourceKind::Reddit,
        message: message.into(),
    }
}

fn collect_comments(
    children: &[Thing],
    depth: usize,
    limits: TraversalLimits,
    out: &mut Vec<String>,
) {
    for child in children {
        if out.len() >= limits.max_comments {
            return;
        }
        // "more" stubs and anything else that is not a comment
        if child.kind != "t1" {
            continue;
        }
        let Ok(comment) = serde_json::from_value::<Comment>(child.data.clone()) else {
            continue;
        };

        out.push(comment_block(
            &comment.author,
            &comment.body,
            &format!("https://reddit.com{}", comment.permalink),
        ));

        if depth >= limits.max_depth || !comment.replies.is_object() {
            continue;
        }
        if let Ok(replies) = serde_json::from_value::<Listing>(comment.replies) {
            collect_comments(&replies.data.children, depth + 1, limits, out);
        }
    }
}

pub(super) async fn fetch(
    fetcher: &ThreadFetcher,
    input: &str,
) -> Result<ThreadContent, SourceError> {
    let url = format!("{}{}", fetcher.endpoints.reddit, json_path(input)?);
    let listings: Vec<Listing> = fetcher.get_json(SourceKind::Reddit, &url).await?;

    let [post_listing, comment_listing, ..] = listings.as_slice() else {
        return Err(malformed("expected post and comment listings"));
    };
    let post_thing = post_listing
        .data
        .children
        .first()
        .ok_or_else(|| SourceError::NotFound("Reddit post not found".to_string()))?;
    let post: Post =
        serde_json::from_value(post_thing.data.clone()).map_err(|e| malformed(e.to_string()))?;

    let mut blocks = Vec::new();
    collect_comments(&comment_listing.data.children, 1, fetcher.limits, &mut blocks);

    let op = if post.selftext.is_empty() {
        &post.url
    } else {
        &post.selftext
    };

    Ok(ThreadContent {
        source: SourceKind::Reddit,
        title: post.title.clone(),
        text: format!("OP: {}\n\nComments:\n{}", op, blocks.join("\n\n")),
    })
}
