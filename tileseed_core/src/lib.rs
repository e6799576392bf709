//! Core domain types for planning tile-cache seed and cleanup jobs:
//! spatial references, bounding boxes, coverages, tile grids, and
//! timestamp helpers.

pub mod time;

mod types;
pub use types::*;
