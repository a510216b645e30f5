mod graph;
mod summary;
mod thread;

pub use graph::{
    Edge, EdgeStyle, Graph, NodeData, NodeKind, Position, ROOT_ID, Sentiment, ThreadNode,
};
pub use summary::{ChatReply, RawNode, Summary, Topic};
pub use thread::{SourceKind, ThreadContent, comment_block};
