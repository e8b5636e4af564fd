//! Tile streaming: the per-shape sequence protocol and the parallel runner.

pub(crate) mod parallel;
pub(crate) mod sequence;
