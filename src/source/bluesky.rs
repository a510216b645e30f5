use super::{SourceError, ThreadFetcher, TraversalLimits};
use crate::model::{SourceKind, ThreadContent, comment_block};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

static POST_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"bsky\.app/profile/([^/]+)/post/([^/?#]+)").expect("valid post url regex")
});

const TITLE_CHARS: usize = 50;

#[derive(Debug, Deserialize)]
struct ResolvedHandle {
    #[serde(default)]
    did: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ThreadResponse {
    #[serde(default)]
    thread: Option<ThreadView>,
}

/// A thread node; `post` is absent for blocked or deleted replies.
#[derive(Debug, Deserialize)]
struct ThreadView {
    #[serde(default)]
    post: Option<PostView>,
    #[serde(default)]
    replies: Vec<ThreadView>,
}

#[derive(Debug, Deserialize)]
struct PostView {
    uri: String,
    author: Author,
    #[serde(default)]
    record: Record,
}

#[derive(Debug, Deserialize)]
struct Author {
    handle: String,
}

#[derive(Debug, Default, Deserialize)]
struct Record {
    #[serde(default)]
    text: String,
}

/// `(handle, rkey)` from a `bsky.app/profile/{handle}/post/{rkey}` URL.
pub(super) fn parse_post_url(input: &str) -> Result<(String, String), SourceError> {
    let caps = POST_URL
        .captures(input)
        .ok_or_else(|| SourceError::Malformed {
            platform: SourceKind::Bluesky,
            message: format!("invalid Bluesky post URL: {}", input),
        })?;
    Ok((caps[1].to_string(), caps[2].to_string()))
}

fn xrpc_url(base: &str, method: &str, param: (&str, &str)) -> Result<String, SourceError> {
    reqwest::Url::parse_with_params(&format!("{}/{}", base, method), &[param])
        .map(|u| u.to_string())
        .map_err(|e| SourceError::Malformed {
            platform: SourceKind::Bluesky,
            message: e.to_string(),
        })
}

fn post_link(post: &PostView) -> String {
    let rkey = post.uri.rsplit('/').next().unwrap_or_default();
    format!("https://bsky.app/profile/{}/post/{}", post.author.handle, rkey)
}

fn collect_replies(
    replies: &[ThreadView],
    depth: usize,
    limits: TraversalLimits,
    out: &mut Vec<String>,
) {
    for reply in replies {
        if out.len() >= limits.max_comments {
            return;
        }
        let Some(post) = &reply.post else {
            continue;
        };
        out.push(comment_block(&post.author.handle, &post.record.text, &post_link(post)));
        if depth < limits.max_depth {
            collect_replies(&reply.replies, depth + 1, limits, out);
        }
    }
}

fn title_from(text: &str) -> String {
    let head: String = text.chars().take(TITLE_CHARS).collect();
    format!("{}...", head)
}

pub(super) async fn fetch(
    fetcher: &ThreadFetcher,
    input: &str,
) -> Result<ThreadContent, SourceError> {
    let (handle, rkey) = parse_post_url(input)?;
    let base = &fetcher.endpoints.bluesky;

    let did = if handle.starts_with("did:") {
        handle
    } else {
        let url = xrpc_url(base, "com.atproto.identity.resolveHandle", ("handle", &handle))?;
        let resolved: ResolvedHandle = fetcher.get_json(SourceKind::Bluesky, &url).await?;
        resolved
            .did
            .ok_or_else(|| SourceError::NotFound("Could not resolve Bluesky handle".to_string()))?
    };

    let at_uri = format!("at://{}/app.bsky.feed.post/{}", did, rkey);
    let url = xrpc_url(base, "app.bsky.feed.getPostThread", ("uri", &at_uri))?;
    let response: ThreadResponse = fetcher.get_json(SourceKind::Bluesky, &url).await?;

    let thread = response
        .thread
        .ok_or_else(|| SourceError::NotFound("Bluesky thread not found".to_string()))?;
    let root = thread
        .post
        .as_ref()
        .ok_or_else(|| SourceError::NotFound("Bluesky post is unavailable".to_string()))?;

    let mut blocks = Vec::new();
    collect_replies(&thread.replies, 1, fetcher.limits, &mut blocks);

    Ok(ThreadContent {
        source: SourceKind::Bluesky,
        title: title_from(&root.record.text),
        text: format!("OP: {}\n\n{}", root.record.text, blocks.join("\n\n")),
    })
}
