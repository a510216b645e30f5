mod merge;
mod radial;

pub use merge::{SCATTER_EXTENT, merge_nodes, merge_nodes_with_rng};
pub use radial::{
    DEFAULT_CHILD_RADIUS, DEFAULT_STAGGER, DEFAULT_TOPIC_RADIUS, FAN_SPREAD, RadialLayout,
    build_graph,
};
