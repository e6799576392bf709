use super::CoverageConfig;
use serde::Deserialize;
use std::collections::BTreeMap;

/// A seed specification: named seeding and cleanup entries plus the
/// coverages they reference.
#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SeedSpec {
	/// Named seeding entries.
	#[serde(default)]
	pub seeds: BTreeMap<String, SeedEntryConfig>,

	/// Named cleanup entries.
	#[serde(default)]
	pub cleanup: BTreeMap<String, CleanupEntryConfig>,

	/// Coverage definitions that entries reference by name.
	#[serde(default)]
	pub coverages: BTreeMap<String, CoverageConfig>,
}

/// Parameters of one `seeds:` entry.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SeedEntryConfig {
	/// Caches to seed. An empty list produces no jobs.
	#[serde(default)]
	pub caches: Vec<String>,

	/// Names of coverages restricting the area to seed. Multiple
	/// coverages are combined into a union.
	#[serde(default)]
	pub coverages: Vec<String>,

	/// Grids to seed on. Defaults to the grids all caches have in
	/// common, which must then be identical across the caches.
	pub grids: Option<Vec<String>>,

	/// Level selection, either a list or a `{from, to}` range.
	pub levels: Option<LevelsParam>,

	/// Level selection by resolution, mutually exclusive with `levels`.
	pub resolutions: Option<ResolutionsParam>,

	/// Only tiles older than this point in time are refreshed.
	pub refresh_before: Option<BeforeParam>,
}

/// Parameters of one `cleanup:` entry.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CleanupEntryConfig {
	/// Caches to clean up. An empty list produces no jobs.
	#[serde(default)]
	pub caches: Vec<String>,

	/// Names of coverages restricting the area to clean up.
	#[serde(default)]
	pub coverages: Vec<String>,

	/// Grids to clean up on. Defaults like in seed entries.
	pub grids: Option<Vec<String>>,

	/// Level selection, either a list or a `{from, to}` range.
	pub levels: Option<LevelsParam>,

	/// Level selection by resolution, mutually exclusive with `levels`.
	pub resolutions: Option<ResolutionsParam>,

	/// Tiles older than this are removed. Defaults to the time the
	/// plan is resolved, removing everything not refreshed since.
	pub remove_before: Option<BeforeParam>,
}

/// Level selection of a seed or cleanup entry.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged, deny_unknown_fields)]
pub enum LevelsParam {
	/// A plain list of levels, e.g. `[2, 3, 4]`.
	List(Vec<u8>),
	/// An inclusive level range; both bounds are optional.
	Range { from: Option<u8>, to: Option<u8> },
}

/// Level selection by resolution in SRS units per pixel.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged, deny_unknown_fields)]
pub enum ResolutionsParam {
	/// Resolutions that map to their closest grid level each.
	List(Vec<f64>),
	/// An inclusive resolution range; both bounds are optional.
	Range { from: Option<f64>, to: Option<f64> },
}

/// A point in time, either absolute or as a span back from now.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged, deny_unknown_fields)]
pub enum BeforeParam {
	/// An absolute ISO 8601 timestamp like `2011-05-12T12:00:00`.
	Time { time: String },
	/// A span measured back from the current time, e.g. `{weeks: 2, hours: 4}`.
	Delta {
		#[serde(default)]
		weeks: u32,
		#[serde(default)]
		days: u32,
		#[serde(default)]
		hours: u32,
		#[serde(default)]
		minutes: u32,
	},
}
