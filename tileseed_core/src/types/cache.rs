use serde::Serialize;
use std::fmt::Debug;

/// Handle to the tile store of one cache on one grid.
///
/// Seeding and cleanup jobs run against exactly one of these pairs. The
/// `store` field is the backend descriptor as configured and is passed
/// through untouched; interpreting it is up to the job runner.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct TileManager {
	pub cache_name: String,
	pub grid_name: String,
	pub store: String,
}

impl TileManager {
	#[must_use]
	pub fn new(cache_name: &str, grid_name: &str, store: &str) -> TileManager {
		TileManager {
			cache_name: cache_name.to_string(),
			grid_name: grid_name.to_string(),
			store: store.to_string(),
		}
	}
}

impl Debug for TileManager {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "TileManager({}/{} -> {})", self.cache_name, self.grid_name, self.store)
	}
}
