use std::collections::BTreeMap;
use std::sync::Arc;
use tileseed_core::TileGrid;

/// Bidirectional mapping between grid names and built [`TileGrid`]s.
///
/// Grids are shared via `Arc`, so the reverse lookup identifies a grid by
/// pointer identity: only the instance registered here maps back to its
/// name, not a structurally equal clone.
#[derive(Debug, Default)]
pub struct GridRegistry {
	grids: BTreeMap<String, Arc<TileGrid>>,
}

impl GridRegistry {
	#[must_use]
	pub fn new() -> GridRegistry {
		GridRegistry::default()
	}

	pub fn register(&mut self, name: &str, grid: TileGrid) {
		self.grids.insert(name.to_string(), Arc::new(grid));
	}

	#[must_use]
	pub fn grid_of(&self, name: &str) -> Option<&Arc<TileGrid>> {
		self.grids.get(name)
	}

	/// The name a grid was registered under.
	#[must_use]
	pub fn name_of(&self, grid: &Arc<TileGrid>) -> Option<&str> {
		self
			.grids
			.iter()
			.find(|(_, registered)| Arc::ptr_eq(registered, grid))
			.map(|(name, _)| name.as_str())
	}

	/// Registered grid names in lexical order.
	pub fn names(&self) -> impl Iterator<Item = &String> {
		self.grids.keys()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.grids.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.grids.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tileseed_core::Srs;

	#[test]
	fn test_lookup_both_ways() {
		let mut registry = GridRegistry::new();
		registry.register("webmercator", TileGrid::web_mercator(20).unwrap());
		registry.register("coarse", TileGrid::web_mercator(5).unwrap());

		let grid = registry.grid_of("webmercator").unwrap().clone();
		assert_eq!(grid.srs(), Srs::WEB_MERCATOR);
		assert_eq!(registry.name_of(&grid), Some("webmercator"));
		assert!(registry.grid_of("missing").is_none());

		// a structurally equal grid built elsewhere has no name
		let clone = Arc::new(TileGrid::web_mercator(20).unwrap());
		assert_eq!(registry.name_of(&clone), None);
	}

	#[test]
	fn test_names_sorted() {
		let mut registry = GridRegistry::new();
		registry.register("b", TileGrid::web_mercator(3).unwrap());
		registry.register("a", TileGrid::web_mercator(3).unwrap());
		let names: Vec<_> = registry.names().cloned().collect();
		assert_eq!(names, ["a", "b"]);
	}
}
