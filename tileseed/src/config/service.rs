use crate::plan::GridRegistry;
use anyhow::{Context, Result, bail, ensure};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use tileseed_core::{BBox, Srs, TileGrid, TileManager};

/// The tile managers of one cache, keyed by grid name.
pub type CacheBinding = BTreeMap<String, Arc<TileManager>>;

/// Grid and cache setup of the tile service whose caches get seeded.
///
/// This is the referenced side of seed planning: seed specifications name
/// grids and caches that must exist here.
#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
	/// Named tile grids.
	#[serde(default)]
	pub grids: BTreeMap<String, GridConfig>,

	/// Named caches, each storing tiles on one or more grids.
	#[serde(default)]
	pub caches: BTreeMap<String, CacheConfig>,
}

impl ServiceConfig {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("cannot open {path:?}"))?;
		Self::from_reader(BufReader::new(file)).with_context(|| format!("cannot parse {path:?}"))
	}

	/// Builds every grid and cache and wires the caches to their grids.
	pub fn resolve(&self) -> Result<TileService> {
		let mut grids = GridRegistry::new();
		for (name, config) in &self.grids {
			let grid = config.build().with_context(|| format!("invalid grid '{name}'"))?;
			grids.register(name, grid);
		}

		let mut caches = BTreeMap::new();
		for (cache_name, config) in &self.caches {
			ensure!(!config.grids.is_empty(), "cache '{cache_name}' references no grids");
			let mut binding = CacheBinding::new();
			for grid_name in &config.grids {
				ensure!(
					grids.grid_of(grid_name).is_some(),
					"cache '{cache_name}' references unknown grid '{grid_name}'"
				);
				binding.insert(
					grid_name.clone(),
					Arc::new(TileManager::new(cache_name, grid_name, &config.store)),
				);
			}
			caches.insert(cache_name.clone(), binding);
		}

		Ok(TileService { grids, caches })
	}
}

/// One named grid of the tile service.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
	/// Reference system of the grid, e.g. `EPSG:3857`.
	pub srs: String,

	/// Grid extent as `[west, south, east, north]`. Defaults to the full
	/// extent of `srs` where that is known.
	pub bbox: Option<[f64; 4]>,

	/// Number of levels of a halving pyramid, mutually exclusive with
	/// `resolutions`.
	pub levels: Option<u8>,

	/// Explicit resolutions per level, coarsest first.
	pub resolutions: Option<Vec<f64>>,

	/// Tile edge length in pixels.
	#[serde(default = "default_tile_size")]
	pub tile_size: u32,
}

fn default_tile_size() -> u32 {
	256
}

impl GridConfig {
	pub fn build(&self) -> Result<TileGrid> {
		let srs = Srs::parse(&self.srs)?;
		let bbox = match self.bbox {
			Some(values) => BBox::from_array(values)?,
			None => srs
				.known_extent()
				.with_context(|| format!("no default extent known for {srs}, 'bbox' is required"))?,
		};
		match (&self.resolutions, self.levels) {
			(Some(resolutions), None) => TileGrid::new(srs, bbox, resolutions.clone(), self.tile_size),
			(None, Some(levels)) => TileGrid::with_level_count(srs, bbox, levels, self.tile_size),
			(None, None) => bail!("either 'levels' or 'resolutions' is required"),
			(Some(_), Some(_)) => bail!("'levels' and 'resolutions' are mutually exclusive"),
		}
	}
}

/// One named cache and the grids it stores tiles on.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
	/// Grids this cache stores tiles on.
	pub grids: Vec<String>,

	/// Backend descriptor, passed through to jobs untouched.
	pub store: String,
}

/// A resolved tile service: built grids plus the tile managers of every
/// cache, wired per grid.
#[derive(Debug)]
pub struct TileService {
	grids: GridRegistry,
	caches: BTreeMap<String, CacheBinding>,
}

impl TileService {
	#[must_use]
	pub fn grids(&self) -> &GridRegistry {
		&self.grids
	}

	#[must_use]
	pub fn cache(&self, name: &str) -> Option<&CacheBinding> {
		self.caches.get(name)
	}

	/// Grid/manager pairs of one cache in lexical grid order.
	pub fn grid_managers(&self, cache_name: &str) -> Option<Vec<(Arc<TileGrid>, Arc<TileManager>)>> {
		let binding = self.caches.get(cache_name)?;
		Some(
			binding
				.iter()
				.filter_map(|(grid_name, manager)| {
					self.grids.grid_of(grid_name).map(|grid| (grid.clone(), manager.clone()))
				})
				.collect(),
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	const SERVICE: &str = "
grids:
  webmercator:
    srs: 'EPSG:3857'
    levels: 19
  wgs84:
    srs: 'EPSG:4326'
    levels: 18
caches:
  osm:
    grids: [webmercator, wgs84]
    store: 'file://cache_data/osm'
";

	#[test]
	fn resolve_service() {
		let service = ServiceConfig::from_string(SERVICE).unwrap().resolve().unwrap();
		assert_eq!(service.grids().len(), 2);

		let binding = service.cache("osm").unwrap();
		assert_eq!(binding.len(), 2);
		assert_eq!(
			binding.get("webmercator").unwrap().as_ref(),
			&TileManager::new("osm", "webmercator", "file://cache_data/osm")
		);
		assert!(service.cache("unknown").is_none());

		let pairs = service.grid_managers("osm").unwrap();
		assert_eq!(pairs.len(), 2);
		assert_eq!(service.grids().name_of(&pairs[0].0), Some("webmercator"));
	}

	#[test]
	fn resolve_rejects_unknown_grid_reference() {
		let config = ServiceConfig::from_string("caches:\n  osm:\n    grids: [nope]\n    store: 's'").unwrap();
		let error = config.resolve().unwrap_err();
		assert_eq!(error.to_string(), "cache 'osm' references unknown grid 'nope'");
	}

	#[test]
	fn resolve_rejects_cache_without_grids() {
		let config = ServiceConfig::from_string("caches:\n  osm:\n    grids: []\n    store: 's'").unwrap();
		assert!(config.resolve().is_err());
	}

	#[test]
	fn grid_defaults() {
		let config: GridConfig = serde_yaml_ng::from_str("srs: 'EPSG:4326'\nlevels: 10").unwrap();
		assert_eq!(config.tile_size, 256);
		let grid = config.build().unwrap();
		assert_eq!(grid.bbox().as_tuple(), (-180.0, -90.0, 180.0, 90.0));
		assert_eq!(grid.max_level(), 9);
	}

	#[test]
	fn grid_requires_level_definition() {
		let config: GridConfig = serde_yaml_ng::from_str("srs: 'EPSG:3857'").unwrap();
		assert!(config.build().is_err());

		let config: GridConfig =
			serde_yaml_ng::from_str("srs: 'EPSG:3857'\nlevels: 5\nresolutions: [100.0, 50.0]").unwrap();
		assert!(config.build().is_err());
	}

	#[test]
	fn grid_requires_bbox_for_unknown_srs() {
		let config: GridConfig = serde_yaml_ng::from_str("srs: 'EPSG:25832'\nlevels: 10").unwrap();
		let error = config.build().unwrap_err();
		assert!(error.to_string().contains("'bbox' is required"));

		let config: GridConfig =
			serde_yaml_ng::from_str("srs: 'EPSG:25832'\nlevels: 10\nbbox: [265948, 6421521, 677786, 7288831]")
				.unwrap();
		assert!(config.build().is_ok());
	}
}
