use super::PlanError;
use crate::config::{LevelsParam, ResolutionsParam};
use itertools::Itertools;
use tileseed_core::TileGrid;

/// Turns the level parameters of an entry into concrete grid levels.
///
/// Selections are grid-relative: the same selector can resolve to
/// different levels on grids with different depths or resolutions.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelSelector {
	/// Use the listed levels, dropping those the grid does not have.
	Levels(Vec<u8>),
	/// An inclusive level range, clamped to the grid.
	LevelRange { from: Option<u8>, to: Option<u8> },
	/// The grid levels closest to the listed resolutions.
	Resolutions(Vec<f64>),
	/// Every level between the grid levels closest to the two resolutions.
	ResolutionRange { from: Option<f64>, to: Option<f64> },
}

impl LevelSelector {
	/// Builds the selector of one entry. Configuring both levels and
	/// resolutions is an error; configuring neither selects the full
	/// grid (`Ok(None)`).
	pub fn from_config(
		entry: &str,
		levels: Option<&LevelsParam>,
		resolutions: Option<&ResolutionsParam>,
	) -> Result<Option<LevelSelector>, PlanError> {
		match (levels, resolutions) {
			(Some(_), Some(_)) => Err(PlanError::LevelsAndResolutions {
				entry: entry.to_string(),
			}),
			(Some(LevelsParam::List(list)), None) => Ok(Some(LevelSelector::Levels(list.clone()))),
			(Some(LevelsParam::Range { from, to }), None) => Ok(Some(LevelSelector::LevelRange {
				from: *from,
				to: *to,
			})),
			(None, Some(ResolutionsParam::List(list))) => Ok(Some(LevelSelector::Resolutions(list.clone()))),
			(None, Some(ResolutionsParam::Range { from, to })) => Ok(Some(LevelSelector::ResolutionRange {
				from: *from,
				to: *to,
			})),
			(None, None) => Ok(None),
		}
	}

	/// Every level of `grid`, for entries without level parameters.
	#[must_use]
	pub fn full_range(grid: &TileGrid) -> Vec<u8> {
		(0..=grid.max_level()).collect()
	}

	/// Resolves the selection for one grid into a sorted, deduplicated
	/// list of levels the grid actually has.
	#[must_use]
	pub fn for_grid(&self, grid: &TileGrid) -> Vec<u8> {
		let max = grid.max_level();
		match self {
			LevelSelector::Levels(levels) => levels
				.iter()
				.copied()
				.filter(|level| *level <= max)
				.sorted_unstable()
				.dedup()
				.collect(),
			LevelSelector::LevelRange { from, to } => {
				let from = from.unwrap_or(0);
				let to = to.unwrap_or(max).min(max);
				(from..=to).collect()
			}
			LevelSelector::Resolutions(resolutions) => resolutions
				.iter()
				.map(|res| grid.closest_level(*res))
				.sorted_unstable()
				.dedup()
				.collect(),
			LevelSelector::ResolutionRange { from, to } => {
				let from = from.map_or(0, |res| grid.closest_level(res));
				let to = to.map_or(max, |res| grid.closest_level(res));
				(from..=to).collect()
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use rstest::rstest;
	use tileseed_core::{BBox, Srs};

	fn grid() -> TileGrid {
		// resolutions 1000, 500, 250, 125, 62.5
		TileGrid::new(
			Srs::WEB_MERCATOR,
			BBox::new(0.0, 0.0, 256_000.0, 256_000.0).unwrap(),
			vec![1000.0, 500.0, 250.0, 125.0, 62.5],
			256,
		)
		.unwrap()
	}

	#[test]
	fn levels_list_is_sorted_deduplicated_and_clamped() {
		let selector = LevelSelector::Levels(vec![4, 1, 30, 1, 0]);
		assert_eq!(selector.for_grid(&grid()), [0, 1, 4]);
	}

	#[rstest]
	#[case(None, None, vec![0, 1, 2, 3, 4])]
	#[case(Some(2), None, vec![2, 3, 4])]
	#[case(None, Some(2), vec![0, 1, 2])]
	#[case(Some(1), Some(30), vec![1, 2, 3, 4])]
	#[case(Some(9), Some(12), vec![])]
	fn level_range(#[case] from: Option<u8>, #[case] to: Option<u8>, #[case] expected: Vec<u8>) {
		let selector = LevelSelector::LevelRange { from, to };
		assert_eq!(selector.for_grid(&grid()), expected);
	}

	#[test]
	fn resolutions_map_to_closest_levels() {
		let selector = LevelSelector::Resolutions(vec![1100.0, 490.0, 60.0, 480.0]);
		assert_eq!(selector.for_grid(&grid()), [0, 1, 4]);
	}

	#[rstest]
	#[case(None, None, vec![0, 1, 2, 3, 4])]
	#[case(Some(600.0), None, vec![1, 2, 3, 4])]
	#[case(None, Some(200.0), vec![0, 1, 2])]
	#[case(Some(600.0), Some(130.0), vec![1, 2, 3])]
	fn resolution_range(#[case] from: Option<f64>, #[case] to: Option<f64>, #[case] expected: Vec<u8>) {
		let selector = LevelSelector::ResolutionRange { from, to };
		assert_eq!(selector.for_grid(&grid()), expected);
	}

	#[test]
	fn from_config_rejects_both_parameters() {
		let levels = LevelsParam::List(vec![1]);
		let resolutions = ResolutionsParam::List(vec![500.0]);
		let error = LevelSelector::from_config("osm", Some(&levels), Some(&resolutions)).unwrap_err();
		assert_eq!(
			error,
			PlanError::LevelsAndResolutions {
				entry: "osm".to_string()
			}
		);
	}

	#[test]
	fn from_config_without_parameters_selects_everything() {
		assert_eq!(LevelSelector::from_config("osm", None, None).unwrap(), None);
		assert_eq!(LevelSelector::full_range(&grid()), [0, 1, 2, 3, 4]);
	}
}
