use crate::types::{BBox, Srs};
use anyhow::{Result, ensure};
use itertools::Itertools;
use std::fmt::Debug;

/// Maximum number of levels a grid can have.
pub const MAX_GRID_LEVELS: usize = 32;

const DEFAULT_TILE_SIZE: u32 = 256;

/// A tile grid: a pyramid of zoom levels over a bounding box in one
/// spatial reference system.
///
/// Each level has a resolution in SRS units per pixel. Resolutions are
/// stored from coarsest (level 0) to finest and are strictly descending.
///
/// # Examples
///
/// ```
/// use tileseed_core::{Srs, TileGrid};
///
/// let grid = TileGrid::web_mercator(20).unwrap();
/// assert_eq!(grid.srs(), Srs::WEB_MERCATOR);
/// assert_eq!(grid.max_level(), 19);
/// assert!((grid.resolution(0).unwrap() - 156_543.03).abs() < 0.01);
/// ```
#[derive(Clone, PartialEq)]
pub struct TileGrid {
	srs: Srs,
	bbox: BBox,
	resolutions: Vec<f64>,
	tile_size: u32,
}

impl TileGrid {
	/// Creates a grid from an explicit list of resolutions, coarsest first.
	///
	/// Returns an error if the list is empty, longer than
	/// [`MAX_GRID_LEVELS`], not strictly descending, or contains
	/// non-positive values.
	pub fn new(srs: Srs, bbox: BBox, resolutions: Vec<f64>, tile_size: u32) -> Result<TileGrid> {
		ensure!(!resolutions.is_empty(), "grid needs at least one resolution");
		ensure!(
			resolutions.len() <= MAX_GRID_LEVELS,
			"grid supports at most {MAX_GRID_LEVELS} levels, got {}",
			resolutions.len()
		);
		ensure!(
			resolutions.iter().all(|r| r.is_finite() && *r > 0.0),
			"grid resolutions must be positive"
		);
		ensure!(
			resolutions.iter().tuple_windows().all(|(a, b)| b < a),
			"grid resolutions must be strictly descending"
		);
		ensure!(tile_size > 0, "tile size must be positive");
		Ok(TileGrid {
			srs,
			bbox,
			resolutions,
			tile_size,
		})
	}

	/// Creates a grid with `level_count` levels where every level halves the
	/// resolution of the previous one. Level 0 fits the longer bbox edge into
	/// a single tile.
	pub fn with_level_count(srs: Srs, bbox: BBox, level_count: u8, tile_size: u32) -> Result<TileGrid> {
		ensure!(level_count > 0, "grid needs at least one level");
		ensure!(
			level_count as usize <= MAX_GRID_LEVELS,
			"grid supports at most {MAX_GRID_LEVELS} levels, got {level_count}"
		);
		let base = bbox.width().max(bbox.height()) / f64::from(tile_size);
		let resolutions = (0..level_count).map(|level| base / f64::from(1u32 << level)).collect();
		TileGrid::new(srs, bbox, resolutions, tile_size)
	}

	/// Creates the standard spherical-mercator grid with `level_count` levels.
	pub fn web_mercator(level_count: u8) -> Result<TileGrid> {
		let srs = Srs::WEB_MERCATOR;
		let bbox = srs.known_extent().unwrap();
		TileGrid::with_level_count(srs, bbox, level_count, DEFAULT_TILE_SIZE)
	}

	#[must_use]
	pub fn srs(&self) -> Srs {
		self.srs
	}

	#[must_use]
	pub fn bbox(&self) -> &BBox {
		&self.bbox
	}

	#[must_use]
	pub fn tile_size(&self) -> u32 {
		self.tile_size
	}

	/// The highest zoom level of this grid.
	#[must_use]
	pub fn max_level(&self) -> u8 {
		(self.resolutions.len() - 1) as u8
	}

	/// The resolution of `level` in SRS units per pixel, or `None` if the
	/// grid has no such level.
	#[must_use]
	pub fn resolution(&self, level: u8) -> Option<f64> {
		self.resolutions.get(level as usize).copied()
	}

	/// Returns the level whose resolution is closest to `resolution`.
	///
	/// Ties resolve to the lower (coarser) level.
	#[must_use]
	pub fn closest_level(&self, resolution: f64) -> u8 {
		let mut best = 0;
		let mut best_diff = f64::INFINITY;
		for (level, res) in self.resolutions.iter().enumerate() {
			let diff = (res - resolution).abs();
			if diff < best_diff {
				best_diff = diff;
				best = level;
			}
		}
		best as u8
	}
}

impl Debug for TileGrid {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.debug_struct("TileGrid")
			.field("srs", &self.srs)
			.field("bbox", &self.bbox)
			.field("levels", &self.resolutions.len())
			.field("tile_size", &self.tile_size)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn unit_bbox() -> BBox {
		BBox::new(0.0, 0.0, 256.0, 256.0).unwrap()
	}

	#[test]
	fn test_new_validates_resolutions() {
		let bbox = unit_bbox();
		assert!(TileGrid::new(Srs::WGS84, bbox, vec![], 256).is_err());
		assert!(TileGrid::new(Srs::WGS84, bbox, vec![4.0, 4.0], 256).is_err());
		assert!(TileGrid::new(Srs::WGS84, bbox, vec![2.0, 4.0], 256).is_err());
		assert!(TileGrid::new(Srs::WGS84, bbox, vec![4.0, -2.0], 256).is_err());
		assert!(TileGrid::new(Srs::WGS84, bbox, vec![1.0; 33], 256).is_err());
		assert!(TileGrid::new(Srs::WGS84, bbox, vec![4.0, 2.0, 1.0], 256).is_ok());
	}

	#[test]
	fn test_with_level_count() {
		let grid = TileGrid::with_level_count(Srs::WGS84, unit_bbox(), 3, 256).unwrap();
		assert_eq!(grid.max_level(), 2);
		assert_eq!(grid.resolution(0), Some(1.0));
		assert_eq!(grid.resolution(1), Some(0.5));
		assert_eq!(grid.resolution(2), Some(0.25));
		assert_eq!(grid.resolution(3), None);
		assert!(TileGrid::with_level_count(Srs::WGS84, unit_bbox(), 0, 256).is_err());
		assert!(TileGrid::with_level_count(Srs::WGS84, unit_bbox(), 40, 256).is_err());
	}

	#[test]
	fn test_web_mercator_base_resolution() {
		let grid = TileGrid::web_mercator(20).unwrap();
		assert!((grid.resolution(0).unwrap() - 156_543.033_928_041).abs() < 1e-6);
		assert_eq!(grid.max_level(), 19);
	}

	#[rstest]
	#[case(1.0, 0)]
	#[case(0.6, 1)]
	#[case(0.5, 1)]
	#[case(0.26, 2)]
	#[case(0.001, 2)]
	#[case(100.0, 0)]
	// halfway between two levels resolves to the coarser one
	#[case(0.75, 0)]
	fn test_closest_level(#[case] resolution: f64, #[case] expected: u8) {
		let grid = TileGrid::with_level_count(Srs::WGS84, unit_bbox(), 3, 256).unwrap();
		assert_eq!(grid.closest_level(resolution), expected);
	}
}
