//! Contains types like spatial references, bounding boxes, coverages and tile grids.

mod bbox;
pub use bbox::*;

mod cache;
pub use cache::*;

mod coverage;
pub use coverage::*;

mod grid;
pub use grid::*;

mod srs;
pub use srs::*;
