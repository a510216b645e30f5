//! Derived views over a graph: neighbour highlighting, density filtering,
//! styled rendering for the map and topic grouping for the feed.

mod density;
mod feed;
mod highlight;
mod render;

pub use density::{MAX_DENSITY, MIN_DENSITY, VisibleGraph, clamp_density, visible};
pub use feed::{FeedSection, feed};
pub use highlight::{Highlight, highlight};
pub use render::{RenderedEdge, RenderedGraph, RenderedNode, render};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Map,
    Feed,
}
