//! Recently woven threads, kept as a JSON array with the newest entry first.

use crate::fs::FileSystem;
use crate::model::{Graph, NodeKind, SourceKind};
use crate::output::GraphDocument;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to access history file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("No history entry with id {0}")]
    NotFound(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub url: String,
    #[serde(default)]
    pub title: String,
    pub source: SourceKind,
    pub topic_count: usize,
    pub comment_count: usize,
    pub flow_data: Graph,
    pub model_id: String,
}

#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub url: String,
    pub title: String,
    pub source: SourceKind,
    pub graph: Graph,
    pub model_id: String,
}

impl From<HistoryEntry> for GraphDocument {
    fn from(entry: HistoryEntry) -> Self {
        let title = if entry.title.is_empty() {
            entry.url.clone()
        } else {
            entry.title
        };
        GraphDocument {
            title,
            source: entry.source,
            url: entry.url,
            model: entry.model_id,
            graph: entry.flow_data,
        }
    }
}

pub struct HistoryStore<'a> {
    fs: &'a dyn FileSystem,
    path: PathBuf,
    max_entries: usize,
}

pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

impl<'a> HistoryStore<'a> {
    pub fn new(fs: &'a dyn FileSystem, path: impl Into<PathBuf>, max_entries: usize) -> Self {
        Self {
            fs,
            path: path.into(),
            max_entries,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries, newest first. An unreadable or corrupt file reads as empty.
    pub fn all(&self) -> Vec<HistoryEntry> {
        if !self.fs.exists(&self.path) {
            return Vec::new();
        }
        let content = match self.fs.read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %self.path.display(), "could not read history: {}", e);
                return Vec::new();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), "ignoring corrupt history file: {}", e);
            Vec::new()
        })
    }

    fn write_all(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let json = serde_json::to_string_pretty(entries)?;
        self.fs.write(&self.path, &json)?;
        Ok(())
    }

    pub fn save(&self, new: NewHistoryEntry) -> Result<HistoryEntry, HistoryError> {
        let entry = HistoryEntry {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: now_millis(),
            topic_count: new.graph.count(NodeKind::Topic),
            comment_count: new.graph.count(NodeKind::Comment),
            url: new.url,
            title: new.title,
            source: new.source,
            flow_data: new.graph,
            model_id: new.model_id,
        };

        let mut entries = self.all();
        entries.insert(0, entry.clone());
        entries.truncate(self.max_entries);
        self.write_all(&entries)?;

        debug!(id = %entry.id, kept = entries.len(), "history entry saved");
        Ok(entry)
    }

    pub fn get(&self, id: &str) -> Option<HistoryEntry> {
        self.all().into_iter().find(|e| e.id == id)
    }

    /// Remove one entry and return the ones left.
    pub fn delete(&self, id: &str) -> Result<Vec<HistoryEntry>, HistoryError> {
        let mut entries = self.all();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Err(HistoryError::NotFound(id.to_string()));
        }
        self.write_all(&entries)?;
        Ok(entries)
    }

    pub fn clear(&self) -> Result<(), HistoryError> {
        if self.fs.exists(&self.path) {
            self.fs.remove_file(&self.path)?;
        }
        Ok(())
    }

    /// Replace an entry's graph, e.g. after chat added nodes to it.
    pub fn update_graph(&self, id: &str, graph: &Graph) -> Result<HistoryEntry, HistoryError> {
        let mut entries = self.all();
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| HistoryError::NotFound(id.to_string()))?;
        entry.flow_data = graph.clone();
        entry.topic_count = graph.count(NodeKind::Topic);
        entry.comment_count = graph.count(NodeKind::Comment);
        let updated = entry.clone();
        self.write_all(&entries)?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFs;
    use crate::layout::build_graph;
    use crate::model::{RawNode, Topic};

    fn sample_graph() -> Graph {
        build_graph(
            &[Topic {
                id: "t1".into(),
                title: "Rust".into(),
                summary: "".into(),
            }],
            &[RawNode::new("n1", "t1", "borrowck").with_author("alice")],
        )
    }

    fn new_entry(url: &str) -> NewHistoryEntry {
        NewHistoryEntry {
            url: url.to_string(),
            title: format!("Thread {}", url),
            source: SourceKind::HackerNews,
            graph: sample_graph(),
            model_id: "m".to_string(),
        }
    }

    #[test]
    fn test_save_prepends_and_counts() {
        let fs = MockFs::new();
        let store = HistoryStore::new(&fs, "/h.json", 20);

        let first = store.save(new_entry("1")).unwrap();
        let second = store.save(new_entry("2")).unwrap();

        let all = store.all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
        assert_eq!(first.topic_count, 1);
        assert_eq!(first.comment_count, 1);
    }

    #[test]
    fn test_save_truncates_to_max() {
        let fs = MockFs::new();
        let store = HistoryStore::new(&fs, "/h.json", 3);
        for i in 0..5 {
            store.save(new_entry(&i.to_string())).unwrap();
        }
        let urls: Vec<_> = store.all().into_iter().map(|e| e.url).collect();
        assert_eq!(urls, vec!["4", "3", "2"]);
    }

    #[test]
    fn test_serialized_field_names() {
        let fs = MockFs::new();
        let store = HistoryStore::new(&fs, "/h.json", 20);
        store.save(new_entry("u")).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs.get(Path::new("/h.json")).unwrap()).unwrap();
        let entry = &raw[0];
        assert!(entry.get("topicCount").is_some());
        assert!(entry.get("flowData").is_some());
        assert_eq!(entry["modelId"], "m");
        assert_eq!(entry["source"], "hacker-news");
    }

    #[test]
    fn test_corrupt_file_reads_empty() {
        let fs = MockFs::with_files([("/h.json", "{not json")]);
        let store = HistoryStore::new(&fs, "/h.json", 20);
        assert!(store.all().is_empty());

        store.save(new_entry("fresh")).unwrap();
        assert_eq!(store.all().len(), 1);
    }

    #[test]
    fn test_delete_and_clear() {
        let fs = MockFs::new();
        let store = HistoryStore::new(&fs, "/h.json", 20);
        let a = store.save(new_entry("a")).unwrap();
        store.save(new_entry("b")).unwrap();

        let remaining = store.delete(&a.id).unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(store.get(&a.id).is_none());
        assert!(matches!(store.delete(&a.id), Err(HistoryError::NotFound(_))));

        store.clear().unwrap();
        assert!(store.all().is_empty());
        store.clear().unwrap();
    }

    #[test]
    fn test_update_graph() {
        let fs = MockFs::new();
        let store = HistoryStore::new(&fs, "/h.json", 20);
        let entry = store.save(new_entry("a")).unwrap();

        let mut graph = entry.flow_data.clone();
        graph.nodes.retain(|n| n.kind != NodeKind::Comment);
        let updated = store.update_graph(&entry.id, &graph).unwrap();

        assert_eq!(updated.comment_count, 0);
        assert_eq!(store.get(&entry.id).unwrap().flow_data, graph);
        assert!(store.update_graph("missing", &graph).is_err());
    }
}
