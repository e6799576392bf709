use super::{BeforeParam, CoverageConfig};
use anyhow::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use tileseed_core::{Coverage, Srs};

/// A seed specification in the legacy layout built around `views`.
///
/// The layout is recognized by the presence of a top-level `views` key.
#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LegacySpec {
	/// Seed entries keyed by the cache they work on.
	#[serde(default)]
	pub seeds: BTreeMap<String, LegacySeedConfig>,

	/// Named views that seed entries reference.
	#[serde(default)]
	pub views: BTreeMap<String, ViewConfig>,
}

/// One legacy seed entry. The key in `seeds:` names the cache.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LegacySeedConfig {
	/// Tiles older than this are refreshed while seeding, and a cleanup
	/// job removing them afterwards is planned for every grid.
	pub remove_before: Option<BeforeParam>,

	/// Views to seed.
	#[serde(default)]
	pub views: Vec<String>,
}

/// A named legacy view: area, reference-system filter and level span.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ViewConfig {
	/// Seeded area as `[west, south, east, north]`; the whole grid if omitted.
	pub bbox: Option<[f64; 4]>,

	/// Reference system of `bbox`, defaults to `EPSG:4326`.
	pub bbox_srs: Option<String>,

	/// Only grids in one of these reference systems are seeded.
	pub srs: Option<Vec<String>>,

	/// Inclusive `[from, to]` level span to seed.
	pub level: [u8; 2],
}

impl ViewConfig {
	/// The coverage of this view, or `None` if no area is configured.
	pub fn coverage(&self) -> Result<Option<Coverage>> {
		match self.bbox {
			Some(bbox) => {
				let config = CoverageConfig {
					bbox,
					srs: self.bbox_srs.clone(),
				};
				Ok(Some(config.build()?))
			}
			None => Ok(None),
		}
	}

	/// The parsed reference-system filter, or `None` if every grid matches.
	pub fn srs_filter(&self) -> Result<Option<Vec<Srs>>> {
		match &self.srs {
			Some(names) => names.iter().map(|name| Srs::parse(name)).collect::<Result<Vec<_>>>().map(Some),
			None => Ok(None),
		}
	}
}
