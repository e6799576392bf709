//! # TileSeed
//!
//! TileSeed plans seeding and cleanup jobs for map tile caches.
//!
//! A seed specification names which caches to seed, on which grids, down to
//! which levels, inside which coverage areas, and when cached tiles count as
//! stale. TileSeed resolves such a specification against the grids and caches
//! of a tile service and expands it into one concrete job per cache and grid.
//!
//! ## Usage Example
//!
//! ```rust
//! use tileseed::{config::{ServiceConfig, SpecFile}, plan::build_plan};
//!
//! fn main() -> anyhow::Result<()> {
//!     let service = ServiceConfig::from_string(
//!         "
//! grids:
//!   webmercator: {srs: 'EPSG:3857', levels: 19}
//! caches:
//!   osm: {grids: [webmercator], store: 'file://cache_data/osm'}
//! ",
//!     )?
//!     .resolve()?;
//!
//!     let spec = SpecFile::from_string(
//!         "
//! seeds:
//!   world:
//!     caches: [osm]
//!     levels: {from: 0, to: 7}
//! ",
//!     )?;
//!
//!     let plan = build_plan(&spec, &service)?;
//!     assert_eq!(plan.seeds.len(), 1);
//!     assert_eq!(plan.seeds[0].levels, (0..=7).collect::<Vec<u8>>());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod plan;

pub use tileseed_core as core;
