use serde::Serialize;
use std::sync::Arc;
use tileseed_core::{Coverage, TileManager};

/// One planned seeding job: refresh or create the tiles of one cache on
/// one grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedTask {
	/// Name of the entry (or legacy view) this job came from.
	pub name: String,
	pub cache_name: String,
	pub grid_name: String,
	pub tile_manager: Arc<TileManager>,
	/// Levels to work on, sorted and deduplicated.
	pub levels: Vec<u8>,
	/// Only tiles older than this unix timestamp are refreshed; `None`
	/// seeds missing tiles only.
	pub refresh_before: Option<i64>,
	/// Area to seed, already expressed in the grid's reference system.
	/// `None` means the whole grid.
	pub coverage: Option<Coverage>,
}

/// One planned cleanup job: drop stale tiles of one cache on one grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanupTask {
	/// Name of the entry (or legacy view) this job came from.
	pub name: String,
	pub cache_name: String,
	pub grid_name: String,
	pub tile_manager: Arc<TileManager>,
	/// Levels to work on, sorted and deduplicated.
	pub levels: Vec<u8>,
	/// Tiles older than this unix timestamp are removed.
	pub remove_before: i64,
	/// Area to clean up, already expressed in the grid's reference
	/// system. `None` means the whole grid.
	pub coverage: Option<Coverage>,
}

/// The resolved plan: every job a seed specification expands into.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct SeedPlan {
	pub seeds: Vec<SeedTask>,
	pub cleanups: Vec<CleanupTask>,
}

impl SeedPlan {
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.seeds.is_empty() && self.cleanups.is_empty()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.seeds.len() + self.cleanups.len()
	}
}
