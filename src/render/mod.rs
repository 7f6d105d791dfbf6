//! CPU rendering: the drawing surface, the graph, the stats panel and the visualizer that
//! combines them.

pub(crate) mod backend;
pub(crate) mod graph;
pub(crate) mod panel;
pub(crate) mod text;
pub(crate) mod visualizer;
