//! Integration tests for the threadweaver library API against mock platform
//! and model endpoints.

use serde_json::json;
use threadweaver::fs::RealFs;
use threadweaver::model::{EdgeStyle, NodeKind, ROOT_ID, SourceKind};
use threadweaver::{
    Config, HistoryStore, NewHistoryEntry, WeaveError, ask, fetch_thread, weave,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.llm.api_key = Some("sk-test".to_string());
    config.llm.base_url = server.uri();
    config.sources.endpoints.hacker_news = server.uri();
    config.sources.endpoints.reddit = server.uri();
    config.sources.endpoints.bluesky = server.uri();
    config
}

fn completion(content: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "role": "assistant", "content": content.to_string() } }]
    }))
}

async fn mount_hn_item(server: &MockServer, id: u64, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/item/{}.json", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_hn_thread(server: &MockServer) {
    mount_hn_item(
        server,
        1,
        json!({ "id": 1, "title": "Show HN: Thread Weaver", "kids": [2, 3, 4] }),
    )
    .await;
    mount_hn_item(
        server,
        2,
        json!({ "id": 2, "by": "alice", "text": "Love the radial layout", "kids": [5] }),
    )
    .await;
    mount_hn_item(server, 3, json!({ "id": 3, "deleted": true })).await;
    mount_hn_item(server, 4, json!(null)).await;
    mount_hn_item(
        server,
        5,
        json!({ "id": 5, "by": "bob", "text": "Density slider is handy" }),
    )
    .await;
}

#[tokio::test]
async fn test_fetch_hacker_news_flattens_visible_comments() {
    let server = MockServer::start().await;
    mount_hn_thread(&server).await;

    let thread = fetch_thread("https://news.ycombinator.com/item?id=1", &config_for(&server))
        .await
        .unwrap();

    assert_eq!(thread.source, SourceKind::HackerNews);
    assert_eq!(thread.title, "Show HN: Thread Weaver");
    assert_eq!(
        thread.text,
        "User: alice\nText: Love the radial layout\nLink: https://news.ycombinator.com/item?id=2\n\n\
         User: bob\nText: Density slider is handy\nLink: https://news.ycombinator.com/item?id=5"
    );
}

#[tokio::test]
async fn test_fetch_respects_comment_limit() {
    let server = MockServer::start().await;
    mount_hn_thread(&server).await;

    let mut config = config_for(&server);
    config.sources.limits.max_comments = 1;
    let thread = fetch_thread("1", &config).await.unwrap();

    assert!(thread.text.contains("alice"));
    assert!(!thread.text.contains("bob"));
}

#[tokio::test]
async fn test_skipped_items_do_not_use_comment_budget() {
    let server = MockServer::start().await;
    mount_hn_thread(&server).await;
    mount_hn_item(
        &server,
        10,
        json!({ "id": 10, "title": "Skips first", "kids": [3, 4, 2] }),
    )
    .await;

    let mut config = config_for(&server);
    config.sources.limits.max_comments = 2;
    let thread = fetch_thread("10", &config).await.unwrap();

    assert!(thread.text.contains("User: alice"));
    assert!(thread.text.contains("User: bob"));
    assert_eq!(thread.text.matches("User: ").count(), 2);
}

#[tokio::test]
async fn test_fetch_reddit_thread() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/rust/comments/abc/weaving.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "kind": "Listing", "data": { "children": [
                { "kind": "t3", "data": { "title": "Weaving threads", "selftext": "Thoughts?", "url": "" } }
            ] } },
            { "kind": "Listing", "data": { "children": [
                { "kind": "t1", "data": {
                    "author": "carol", "body": "Nice", "permalink": "/r/rust/comments/abc/weaving/c1/",
                    "replies": { "kind": "Listing", "data": { "children": [
                        { "kind": "t1", "data": { "author": "dan", "body": "Agreed", "permalink": "/r/rust/comments/abc/weaving/c2/", "replies": "" } }
                    ] } }
                } },
                { "kind": "more", "data": { "count": 12 } }
            ] } }
        ])))
        .mount(&server)
        .await;

    let thread = fetch_thread(
        "https://www.reddit.com/r/rust/comments/abc/weaving/?utm_source=share",
        &config_for(&server),
    )
    .await
    .unwrap();

    assert_eq!(thread.source, SourceKind::Reddit);
    assert_eq!(thread.title, "Weaving threads");
    assert!(thread.text.starts_with("OP: Thoughts?\n\nComments:\nUser: carol"));
    assert!(thread.text.contains("User: dan\nText: Agreed"));
}

#[tokio::test]
async fn test_fetch_bluesky_thread() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/com.atproto.identity.resolveHandle"))
        .and(query_param("handle", "weaver.bsky.social"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "did": "did:plc:abc" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/app.bsky.feed.getPostThread"))
        .and(query_param("uri", "at://did:plc:abc/app.bsky.feed.post/3kx"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "thread": {
                "post": { "uri": "at://did:plc:abc/app.bsky.feed.post/3kx",
                          "author": { "handle": "weaver.bsky.social" },
                          "record": { "text": "What should a thread visualizer show first?" } },
                "replies": [
                    { "post": { "uri": "at://did:plc:xyz/app.bsky.feed.post/r1",
                                "author": { "handle": "erin.bsky.social" },
                                "record": { "text": "The disagreements" } } }
                ]
            }
        })))
        .mount(&server)
        .await;

    let thread = fetch_thread(
        "https://bsky.app/profile/weaver.bsky.social/post/3kx",
        &config_for(&server),
    )
    .await
    .unwrap();

    assert_eq!(thread.source, SourceKind::Bluesky);
    assert_eq!(thread.title, "What should a thread visualizer show first?...");
    assert!(thread.text.contains(
        "User: erin.bsky.social\nText: The disagreements\nLink: https://bsky.app/profile/erin.bsky.social/post/r1"
    ));
}

#[tokio::test]
async fn test_unsupported_input() {
    let server = MockServer::start().await;
    let err = fetch_thread("https://example.com/forum/1", &config_for(&server))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WeaveError::Source(threadweaver::source::SourceError::Unsupported(_))
    ));
}

#[tokio::test]
async fn test_weave_builds_radial_graph() {
    let server = MockServer::start().await;
    mount_hn_thread(&server).await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion(json!({
            "topics": [
                { "id": "topic-1", "title": "Layout", "summary": "How the map is drawn" },
                { "id": "topic-2", "title": "Controls", "summary": "Sliders and filters" }
            ],
            "nodes": [
                { "id": "n1", "topicId": "topic-1", "author": "alice", "content": "Love the radial layout", "sentiment": "positive" },
                { "id": "n2", "topicId": "topic-2", "author": "bob", "content": "Density slider is handy", "sentiment": "neutral" },
                { "id": "n3", "topicId": "topic-9", "author": "ghost", "content": "Orphan" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let woven = weave("1", &config_for(&server)).await.unwrap();
    let graph = &woven.document.graph;

    assert_eq!(woven.document.title, "Show HN: Thread Weaver");
    assert_eq!(woven.unplaced, 1);
    assert_eq!(graph.nodes.len(), 1 + 2 + 2);
    assert_eq!(graph.edges.len(), 2 + 2);
    assert!(graph.dangling_edges().is_empty());
    assert_eq!(graph.root().unwrap().id, ROOT_ID);
    assert_eq!(graph.count(NodeKind::Topic), 2);

    let topic_edges: Vec<_> = graph
        .edges
        .iter()
        .filter(|e| e.style == EdgeStyle::Primary)
        .collect();
    assert_eq!(topic_edges.len(), 2);
    assert!(topic_edges.iter().all(|e| e.source == ROOT_ID));
}

#[tokio::test]
async fn test_weave_surfaces_model_errors() {
    let server = MockServer::start().await;
    mount_hn_thread(&server).await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&server)
        .await;

    let err = weave("1", &config_for(&server)).await.unwrap_err();
    assert!(matches!(err, WeaveError::Gateway(_)));
}

#[tokio::test]
async fn test_ask_merges_chat_nodes_from_root() {
    let server = MockServer::start().await;
    mount_hn_thread(&server).await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion(json!({
            "topics": [{ "id": "t", "title": "Layout", "summary": "" }],
            "nodes": [{ "id": "n", "topicId": "t", "author": "alice", "content": "Love it" }]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion(json!({
            "answer": "People liked the layout.",
            "newNodes": [
                { "author": "bob", "content": "Density slider is handy", "topicId": "t" },
                { "content": "Nobody mentioned mobile support" }
            ]
        })))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let woven = weave("1", &config).await.unwrap();
    let before = woven.document.graph.clone();

    let answer = ask("What did people like?", &woven.thread.text, &before, &config)
        .await
        .unwrap();

    assert_eq!(answer.answer, "People liked the layout.");
    assert_eq!(answer.added, 2);
    assert_eq!(answer.graph.nodes.len(), before.nodes.len() + 2);
    assert_eq!(answer.graph.edges.len(), before.edges.len() + 2);
    assert_eq!(&answer.graph.nodes[..before.nodes.len()], &before.nodes[..]);

    let new_edges = &answer.graph.edges[before.edges.len()..];
    assert!(new_edges.iter().all(|e| e.source == ROOT_ID && e.style == EdgeStyle::Dashed));
    assert!(answer.graph.dangling_edges().is_empty());
    assert_eq!(answer.graph.nodes.last().unwrap().data.label, "AI Insight");
}

#[test]
fn test_history_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let fs = RealFs::new();
    let store = HistoryStore::new(&fs, dir.path().join("nested").join("history.json"), 2);

    for url in ["a", "b", "c"] {
        store
            .save(NewHistoryEntry {
                url: url.to_string(),
                title: format!("Thread {}", url),
                source: SourceKind::Reddit,
                graph: threadweaver::build_graph(&[], &[]),
                model_id: "m".to_string(),
            })
            .unwrap();
    }

    let entries = store.all();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].url, "c");
    assert_eq!(entries[0].flow_data.nodes.len(), 1);

    store.clear().unwrap();
    assert!(store.all().is_empty());
}
